//! The link graph as the backend delivers it, plus the layout the graph view
//! remembers between openings. A [`GraphSnapshot`] is what goes into the
//! graph cache.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CacheError;
use crate::graph_cache::{
    create_cache_entry, load_cache, save_cache, CachedGraph, GraphCacheStorage,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Vault-relative note path.
    pub id: String,
    pub label: String,
    pub link_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub zoom: f64,
    pub center_x: f64,
    pub center_y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub graph: Graph,
    pub stats: GraphStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_positions: Option<HashMap<String, NodePosition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_state: Option<ViewState>,
}

impl GraphSnapshot {
    pub fn new(graph: Graph) -> Self {
        Self {
            stats: graph.stats(),
            graph,
            node_positions: None,
            view_state: None,
        }
    }

    /// New graph data that keeps the layout of `previous`, so reopening the
    /// view after a background update does not reshuffle the nodes.
    pub fn refreshed(previous: Option<&GraphSnapshot>, graph: Graph) -> Self {
        let mut snapshot = Self::new(graph);
        if let Some(previous) = previous {
            snapshot.node_positions = previous.node_positions.clone();
            snapshot.view_state = previous.view_state;
        }
        snapshot
    }

    pub fn reset_layout(&mut self) {
        self.node_positions = None;
        self.view_state = None;
    }

    pub fn record_layout(
        &mut self,
        positions: HashMap<String, NodePosition>,
        view_state: Option<ViewState>,
    ) {
        self.node_positions = Some(positions);
        self.view_state = view_state;
    }

    /// Status line under the graph, e.g. `"12 notes, 30 links (5m ago)"`.
    pub fn summary(&self, age: Option<&str>) -> String {
        let base = format!(
            "{} notes, {} links",
            self.stats.node_count, self.stats.edge_count
        );
        match age {
            Some(age) => format!("{base} ({age})"),
            None => base,
        }
    }
}

/// Caches freshly fetched graph data, carrying over the cached layout.
pub fn store_fresh_graph<S>(
    storage: &mut S,
    graph: Graph,
    now: i64,
) -> Result<GraphSnapshot, CacheError>
where
    S: GraphCacheStorage + ?Sized,
{
    let previous: Option<CachedGraph<GraphSnapshot>> = load_cache(&*storage);
    let snapshot = GraphSnapshot::refreshed(previous.as_ref().map(|c| &c.data), graph);
    let entry = create_cache_entry(snapshot, now);
    save_cache(storage, &entry)?;
    Ok(entry.data)
}

/// Stores the current layout into the existing entry. The timestamp is kept:
/// moving nodes around does not make the graph data any fresher.
pub fn store_layout<S>(
    storage: &mut S,
    positions: HashMap<String, NodePosition>,
    view_state: Option<ViewState>,
) -> Result<bool, CacheError>
where
    S: GraphCacheStorage + ?Sized,
{
    update_cached_snapshot(storage, |snapshot| {
        snapshot.record_layout(positions, view_state)
    })
}

/// Drops the cached layout so the next render starts a fresh simulation.
pub fn forget_layout<S>(storage: &mut S) -> Result<bool, CacheError>
where
    S: GraphCacheStorage + ?Sized,
{
    update_cached_snapshot(storage, GraphSnapshot::reset_layout)
}

fn update_cached_snapshot<S, F>(storage: &mut S, update: F) -> Result<bool, CacheError>
where
    S: GraphCacheStorage + ?Sized,
    F: FnOnce(&mut GraphSnapshot),
{
    let Some(mut cached) = load_cache::<_, GraphSnapshot>(&*storage) else {
        return Ok(false);
    };
    update(&mut cached.data);
    save_cache(storage, &create_cache_entry(cached.data, cached.timestamp))?;
    Ok(true)
}
