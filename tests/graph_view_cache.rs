use std::collections::HashMap;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vault_ui_core::graph::{forget_layout, store_fresh_graph, store_layout};
use vault_ui_core::{
    clear_cache, get_cache_age_text, is_cache_valid, load_cache, CachedGraph, Graph, GraphEdge,
    GraphNode, GraphSnapshot, GraphCacheStorage, JsonFileStorage, NodePosition, ViewState,
    CACHE_KEY,
};

const MINUTE_MS: i64 = 60_000;

fn node(id: &str, link_count: usize) -> GraphNode {
    GraphNode {
        id: format!("{id}.md"),
        label: id.to_string(),
        link_count,
    }
}

fn vault_graph(extra: bool) -> Graph {
    let mut graph = Graph {
        nodes: vec![node("index", 2), node("ideas", 1), node("daily/2024-01-15", 1)],
        edges: vec![
            GraphEdge {
                source: "index.md".to_string(),
                target: "ideas.md".to_string(),
            },
            GraphEdge {
                source: "index.md".to_string(),
                target: "daily/2024-01-15.md".to_string(),
            },
        ],
    };
    if extra {
        graph.nodes.push(node("new", 0));
    }
    graph
}

fn load_snapshot(storage: &JsonFileStorage) -> Option<CachedGraph<GraphSnapshot>> {
    load_cache(storage)
}

#[test]
fn graph_view_lifecycle_survives_restarts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local-storage.json");
    let t0 = 1_700_000_000_000;

    // First open: nothing cached, fetch and store.
    let mut storage = JsonFileStorage::open(&path).unwrap();
    assert!(!is_cache_valid(load_snapshot(&storage).as_ref()));
    store_fresh_graph(&mut storage, vault_graph(false), t0).unwrap();

    // Closing the view records the simulation layout.
    let positions = HashMap::from([
        ("index.md".to_string(), NodePosition { x: 0.0, y: 0.0 }),
        ("ideas.md".to_string(), NodePosition { x: 40.0, y: -12.5 }),
    ]);
    let view = ViewState {
        zoom: 1.2,
        center_x: 10.0,
        center_y: 5.0,
    };
    assert!(store_layout(&mut storage, positions.clone(), Some(view)).unwrap());

    // Next session: the cache is shown as-is with its age, however old.
    let mut storage = JsonFileStorage::open(&path).unwrap();
    let cached = load_snapshot(&storage).unwrap();
    assert!(is_cache_valid(Some(&cached)));
    assert_eq!(cached.timestamp, t0);
    let age = get_cache_age_text(Some(&cached), t0 + 90 * MINUTE_MS);
    assert_eq!(cached.data.summary(Some(age.as_str())), "3 notes, 2 links (1h ago)");
    assert_eq!(cached.data.node_positions.as_ref(), Some(&positions));

    // Background update brings new notes but keeps the layout.
    let t1 = t0 + 91 * MINUTE_MS;
    let refreshed = store_fresh_graph(&mut storage, vault_graph(true), t1).unwrap();
    assert_eq!(refreshed.stats.node_count, 4);
    assert_eq!(refreshed.node_positions, Some(positions));
    assert_eq!(refreshed.view_state, Some(view));

    // Forced refresh throws the layout away before refetching.
    assert!(forget_layout(&mut storage).unwrap());
    let cached = load_snapshot(&storage).unwrap();
    assert_eq!(cached.timestamp, t1);
    assert_eq!(cached.data.node_positions, None);

    clear_cache(&mut storage);
    clear_cache(&mut storage);
    assert!(load_snapshot(&JsonFileStorage::open(&path).unwrap()).is_none());
}

#[test]
fn stale_format_in_storage_is_refetched() {
    let dir = TempDir::new().unwrap();
    let mut storage = JsonFileStorage::open(dir.path().join("ls.json")).unwrap();
    storage.set(CACHE_KEY, "{\"data\": {\"nodes\": 3}, \"timestamp\": 5}".to_string());

    // Readable as opaque JSON, but not as a snapshot.
    assert!(load_cache::<_, serde_json::Value>(&storage).is_some());
    assert!(load_snapshot(&storage).is_none());

    let snapshot = store_fresh_graph(&mut storage, vault_graph(false), 10).unwrap();
    assert_eq!(snapshot.node_positions, None);
    assert_eq!(load_snapshot(&storage).unwrap().data, snapshot);
}
