//! JavaScript surface for the webview. Names follow the host's camelCase
//! helpers so the UI code can call them unchanged.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::graph_cache::{self, CachedGraph, GraphCacheStorage};
use crate::outline::{self, Heading};
use crate::settings::ViewerSettings;
use crate::viewport::{MinimapBounds, Point, Size, ZoomState};
use crate::{markdown, theme, viewport};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// Plain objects rather than `Map`s, so `JSON.stringify` on the JS side
/// still sees the cached graph.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn now_or(now: Option<f64>) -> i64 {
    now.unwrap_or_else(js_sys::Date::now) as i64
}

fn is_present(value: &JsValue) -> bool {
    !(value.is_null() || value.is_undefined())
}

/// Only `timestamp` matters for the age helpers, and the host hands over raw
/// `JSON.parse` output, so nothing else is decoded. A missing or non-numeric
/// timestamp reads as no cache.
fn stamp_from_js(cache: &JsValue) -> Option<CachedGraph<()>> {
    if !is_present(cache) {
        return None;
    }
    js_sys::Reflect::get(cache, &JsValue::from_str("timestamp"))
        .ok()?
        .as_f64()
        .map(CachedGraph::stamped)
}

/// Host settings JSON, or the defaults when none is given.
fn settings_from_js(settings: Option<String>) -> Result<ViewerSettings, JsValue> {
    match settings {
        Some(json) => {
            ViewerSettings::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        None => Ok(ViewerSettings::default()),
    }
}

/// `window.localStorage`, the store the graph cache lives in.
struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    fn open() -> Result<Self, JsValue> {
        web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .local_storage()?
            .map(Self)
            .ok_or_else(|| JsValue::from_str("localStorage is unavailable"))
    }
}

impl GraphCacheStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: String) {
        if let Err(e) = self.0.set_item(key, &value) {
            tracing::error!("Failed to write {}: {:?}", key, e);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(e) = self.0.remove_item(key) {
            tracing::error!("Failed to remove {}: {:?}", key, e);
        }
    }
}

#[wasm_bindgen(js_name = extractHeadings)]
pub fn extract_headings(content: &str) -> Result<JsValue, JsValue> {
    to_js(&outline::extract_headings(content))
}

#[wasm_bindgen(js_name = renderOutlineHTML)]
pub fn render_outline_html(headings: JsValue) -> Result<String, JsValue> {
    let headings: Vec<Heading> = serde_wasm_bindgen::from_value(headings)?;
    Ok(outline::render_outline_html(&headings))
}

#[wasm_bindgen(js_name = convertWikiLinks)]
pub fn convert_wiki_links(html: &str) -> String {
    markdown::convert_wiki_links(html)
}

#[wasm_bindgen(js_name = parseMarkdown)]
pub fn parse_markdown(content: &str) -> String {
    markdown::parse_markdown(content)
}

#[wasm_bindgen(js_name = extractLinkTargets)]
pub fn extract_link_targets(content: &str) -> Result<JsValue, JsValue> {
    to_js(&markdown::extract_link_targets(content))
}

#[wasm_bindgen(js_name = isMermaidSource)]
pub fn is_mermaid_source(language: Option<String>, body: &str) -> bool {
    markdown::is_mermaid_source(language.as_deref(), body)
}

#[wasm_bindgen(js_name = escapeHtml)]
pub fn escape_html(text: &str) -> String {
    markdown::escape_html(text)
}

#[wasm_bindgen(js_name = isCacheValid)]
pub fn is_cache_valid(cache: JsValue) -> bool {
    is_present(&cache)
}

#[wasm_bindgen(js_name = getCacheAgeMs)]
pub fn get_cache_age_ms(cache: JsValue, now: Option<f64>) -> f64 {
    graph_cache::get_cache_age_ms(stamp_from_js(&cache).as_ref(), now_or(now)) as f64
}

#[wasm_bindgen(js_name = getCacheAgeText)]
pub fn get_cache_age_text(cache: JsValue, now: Option<f64>) -> String {
    graph_cache::get_cache_age_text(stamp_from_js(&cache).as_ref(), now_or(now))
}

#[wasm_bindgen(js_name = createCacheEntry)]
pub fn create_cache_entry(data: JsValue, timestamp: Option<f64>) -> Result<JsValue, JsValue> {
    let data: serde_json::Value = serde_wasm_bindgen::from_value(data)?;
    to_js(&graph_cache::create_cache_entry(data, now_or(timestamp)))
}

#[wasm_bindgen(js_name = saveCache)]
pub fn save_cache(cache: JsValue) -> Result<(), JsValue> {
    let cache: CachedGraph = serde_wasm_bindgen::from_value(cache)?;
    let mut storage = LocalStorage::open()?;
    graph_cache::save_cache(&mut storage, &cache).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = loadCache)]
pub fn load_cache() -> Result<JsValue, JsValue> {
    let storage = LocalStorage::open()?;
    match graph_cache::load_cache::<_, serde_json::Value>(&storage) {
        Some(cache) => to_js(&cache),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(js_name = clearCache)]
pub fn clear_cache() -> Result<(), JsValue> {
    let mut storage = LocalStorage::open()?;
    graph_cache::clear_cache(&mut storage);
    Ok(())
}

#[wasm_bindgen(js_name = clampZoom)]
pub fn clamp_zoom(zoom: f64, factor: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    viewport::clamp_zoom_within(
        zoom,
        factor,
        min.unwrap_or(viewport::DEFAULT_MIN_ZOOM),
        max.unwrap_or(viewport::DEFAULT_MAX_ZOOM),
    )
}

#[wasm_bindgen(js_name = calculateZoomPan)]
pub fn calculate_zoom_pan(
    pointer_x: f64,
    pointer_y: f64,
    pan_x: f64,
    pan_y: f64,
    zoom_ratio: f64,
) -> Result<JsValue, JsValue> {
    to_js(&viewport::calculate_zoom_pan(
        pointer_x, pointer_y, pan_x, pan_y, zoom_ratio,
    ))
}

#[wasm_bindgen(js_name = calculateCenteredPosition)]
pub fn calculate_centered_position(
    content_width: f64,
    content_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    zoom: f64,
    offset_x: Option<f64>,
    offset_y: Option<f64>,
) -> Result<JsValue, JsValue> {
    to_js(&viewport::calculate_centered_position(
        content_width,
        content_height,
        viewport_width,
        viewport_height,
        zoom,
        offset_x.unwrap_or(0.0),
        offset_y.unwrap_or(0.0),
    ))
}

#[wasm_bindgen(js_name = calculateFitZoom)]
pub fn calculate_fit_zoom(
    content_width: f64,
    content_height: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> f64 {
    viewport::calculate_fit_zoom(content_width, content_height, viewport_width, viewport_height)
}

#[wasm_bindgen(js_name = calculateMinimapScale)]
pub fn calculate_minimap_scale(
    content_width: f64,
    content_height: f64,
    minimap_width: Option<f64>,
    minimap_height: Option<f64>,
) -> f64 {
    viewport::calculate_minimap_scale_within(
        content_width,
        content_height,
        minimap_width.unwrap_or(viewport::DEFAULT_MINIMAP_WIDTH),
        minimap_height.unwrap_or(viewport::DEFAULT_MINIMAP_HEIGHT),
    )
}

#[wasm_bindgen(js_name = calculateMinimapViewport)]
pub fn calculate_minimap_viewport(
    content: JsValue,
    view: JsValue,
    state: JsValue,
    minimap_scale: f64,
    settings: Option<String>,
) -> Result<JsValue, JsValue> {
    let content: Size = serde_wasm_bindgen::from_value(content)?;
    let view: Size = serde_wasm_bindgen::from_value(view)?;
    let state: ZoomState = serde_wasm_bindgen::from_value(state)?;
    let bounds = MinimapBounds::from_settings(&settings_from_js(settings)?);
    to_js(&viewport::calculate_minimap_viewport(
        content,
        view,
        &state,
        minimap_scale,
        &bounds,
    ))
}

#[wasm_bindgen(js_name = parseSvgSize)]
pub fn parse_svg_size(
    view_box: Option<String>,
    width: Option<String>,
    height: Option<String>,
) -> Result<JsValue, JsValue> {
    to_js(&viewport::parse_svg_size(
        view_box.as_deref(),
        width.as_deref(),
        height.as_deref(),
    ))
}

#[wasm_bindgen(js_name = fitZoomState)]
pub fn fit_zoom_state(
    content: JsValue,
    window: JsValue,
    settings: Option<String>,
) -> Result<JsValue, JsValue> {
    let content: Size = serde_wasm_bindgen::from_value(content)?;
    let window: Size = serde_wasm_bindgen::from_value(window)?;
    to_js(&ZoomState::fit(content, window, &settings_from_js(settings)?))
}

/// Returns the new state; the argument is left as it was.
#[wasm_bindgen(js_name = zoomStateAt)]
pub fn zoom_state_at(
    state: JsValue,
    factor: f64,
    pointer_x: f64,
    pointer_y: f64,
    settings: Option<String>,
) -> Result<JsValue, JsValue> {
    let mut state: ZoomState = serde_wasm_bindgen::from_value(state)?;
    let pointer = Point {
        x: pointer_x,
        y: pointer_y,
    };
    state.zoom_at(factor, pointer, &settings_from_js(settings)?);
    to_js(&state)
}

#[wasm_bindgen(js_name = isDarkTheme)]
pub fn is_dark_theme(theme_id: &str) -> bool {
    theme::is_dark_theme(theme_id)
}
