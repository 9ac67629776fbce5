//! Document and graph helpers behind the vault editor's webview: note
//! outlines, preview rendering with wiki-links, the persistent graph cache and
//! the pan/zoom math of the diagram viewer.

pub mod error;
pub mod graph;
pub mod graph_cache;
pub mod markdown;
pub mod outline;
pub mod settings;
pub mod storage;
pub mod theme;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

pub use error::{CacheError, SettingsError};
pub use graph::{Graph, GraphEdge, GraphNode, GraphSnapshot, GraphStats, NodePosition, ViewState};
pub use graph_cache::{
    clear_cache, create_cache_entry, get_cache_age_ms, get_cache_age_text, is_cache_valid,
    load_cache, save_cache, CachedGraph, GraphCacheStorage, CACHE_KEY,
};
pub use markdown::{convert_wiki_links, parse_markdown};
pub use outline::{extract_headings, render_outline_html, Heading};
pub use settings::ViewerSettings;
pub use storage::{JsonFileStorage, MemoryStorage};
pub use viewport::{
    calculate_centered_position, calculate_fit_zoom, calculate_minimap_scale,
    calculate_zoom_pan, clamp_zoom, Point, Rect, Size, ZoomState,
};
