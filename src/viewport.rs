//! Pan/zoom math for the fullscreen diagram viewer and its minimap.
//!
//! Screen position of a content point `p` is `pan + p * zoom`. Nothing here
//! guards against zero-sized content; callers get `inf`/`NaN` back.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::settings::ViewerSettings;

pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;
pub const DEFAULT_MINIMAP_WIDTH: f64 = 184.0;
pub const DEFAULT_MINIMAP_HEIGHT: f64 = 134.0;

const FALLBACK_SVG_WIDTH: f64 = 800.0;
const FALLBACK_SVG_HEIGHT: f64 = 600.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// `current * factor`, clamped to the default zoom range.
pub fn clamp_zoom(current: f64, factor: f64) -> f64 {
    clamp_zoom_within(current, factor, DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM)
}

pub fn clamp_zoom_within(current: f64, factor: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(current * factor))
}

/// Pan offsets after scaling by `zoom_ratio` (new zoom / old zoom) such that
/// the content under the pointer stays under the pointer.
///
/// Computes `pointer - (pointer - pan) * zoom_ratio`. A ratio of exactly 1
/// returns `pan` untouched.
pub fn calculate_zoom_pan(
    pointer_x: f64,
    pointer_y: f64,
    pan_x: f64,
    pan_y: f64,
    zoom_ratio: f64,
) -> Point {
    if zoom_ratio == 1.0 {
        return Point { x: pan_x, y: pan_y };
    }
    Point {
        x: pointer_x - (pointer_x - pan_x) * zoom_ratio,
        y: pointer_y - (pointer_y - pan_y) * zoom_ratio,
    }
}

pub fn calculate_centered_position(
    content_width: f64,
    content_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
) -> Point {
    Point {
        x: (viewport_width - content_width * zoom) / 2.0 + offset_x,
        y: (viewport_height - content_height * zoom) / 2.0 + offset_y,
    }
}

/// Largest zoom showing the whole content. Not clamped.
pub fn calculate_fit_zoom(
    content_width: f64,
    content_height: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> f64 {
    (viewport_height / content_height).min(viewport_width / content_width)
}

pub fn calculate_minimap_scale(content_width: f64, content_height: f64) -> f64 {
    calculate_minimap_scale_within(
        content_width,
        content_height,
        DEFAULT_MINIMAP_WIDTH,
        DEFAULT_MINIMAP_HEIGHT,
    )
}

pub fn calculate_minimap_scale_within(
    content_width: f64,
    content_height: f64,
    minimap_width: f64,
    minimap_height: f64,
) -> f64 {
    (minimap_width / content_width).min(minimap_height / content_height)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapBounds {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub marker_min_width: f64,
    pub marker_min_height: f64,
}

impl Default for MinimapBounds {
    fn default() -> Self {
        Self::from_settings(&ViewerSettings::default())
    }
}

impl MinimapBounds {
    pub fn from_settings(settings: &ViewerSettings) -> Self {
        Self {
            width: settings.minimap_width,
            height: settings.minimap_height,
            padding: settings.minimap_padding,
            marker_min_width: settings.minimap_marker_min_width,
            marker_min_height: settings.minimap_marker_min_height,
        }
    }

    pub fn scale_for(&self, content: Size) -> f64 {
        calculate_minimap_scale_within(content.width, content.height, self.width, self.height)
    }
}

/// Rectangle marking the visible part of the diagram on the minimap, in
/// minimap pixels.
pub fn calculate_minimap_viewport(
    content: Size,
    viewport: Size,
    state: &ZoomState,
    minimap_scale: f64,
    minimap: &MinimapBounds,
) -> Rect {
    let thumb_width = content.width * minimap_scale;
    let thumb_height = content.height * minimap_scale;
    let thumb_left = (minimap.width - thumb_width) / 2.0 + minimap.padding;
    let thumb_top = (minimap.height - thumb_height) / 2.0 + minimap.padding;

    let visible_left = -state.pan_x / state.zoom;
    let visible_top = -state.pan_y / state.zoom;
    let visible_width = viewport.width / state.zoom;
    let visible_height = viewport.height / state.zoom;

    Rect {
        left: minimap
            .padding
            .max(thumb_left + visible_left * minimap_scale),
        top: minimap.padding.max(thumb_top + visible_top * minimap_scale),
        width: minimap
            .marker_min_width
            .max(minimap.width.min(visible_width * minimap_scale)),
        height: minimap
            .marker_min_height
            .max(minimap.height.min(visible_height * minimap_scale)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ZoomState {
    /// Initial view of a diagram opened fullscreen in a `window`-sized area:
    /// fitted to what remains after the viewer chrome, then centered.
    pub fn fit(content: Size, window: Size, settings: &ViewerSettings) -> Self {
        let viewport_width = window.width - settings.chrome_width;
        let viewport_height = window.height - settings.chrome_height;
        let zoom = calculate_fit_zoom(
            content.width,
            content.height,
            viewport_width,
            viewport_height,
        );
        let pan = calculate_centered_position(
            content.width,
            content.height,
            viewport_width,
            viewport_height,
            zoom,
            settings.center_offset_x,
            settings.center_offset_y,
        );
        Self {
            zoom,
            pan_x: pan.x,
            pan_y: pan.y,
        }
    }

    /// Scales by `factor` around `pointer` (viewer-relative). Once the zoom
    /// hits a bound the pan only moves by the ratio actually applied.
    pub fn zoom_at(&mut self, factor: f64, pointer: Point, settings: &ViewerSettings) {
        let old_zoom = self.zoom;
        self.zoom = clamp_zoom_within(old_zoom, factor, settings.min_zoom, settings.max_zoom);
        let pan = calculate_zoom_pan(
            pointer.x,
            pointer.y,
            self.pan_x,
            self.pan_y,
            self.zoom / old_zoom,
        );
        self.pan_x = pan.x;
        self.pan_y = pan.y;
    }

    pub fn zoom_in_at(&mut self, pointer: Point, settings: &ViewerSettings) {
        self.zoom_at(settings.zoom_in_step, pointer, settings);
    }

    pub fn zoom_out_at(&mut self, pointer: Point, settings: &ViewerSettings) {
        self.zoom_at(settings.zoom_out_step, pointer, settings);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom label shown in the toolbar.
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }

    /// Content coordinates currently under a viewer-relative point.
    pub fn to_content(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }
}

fn leading_number(raw: &str) -> Option<f64> {
    static RE_NUMBER: OnceLock<Regex> = OnceLock::new();
    let re_number = RE_NUMBER
        .get_or_init(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());
    re_number
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn dimension_or(raw: Option<&str>, fallback: f64) -> f64 {
    match raw.and_then(leading_number) {
        Some(value) if value != 0.0 && value.is_finite() => value,
        _ => fallback,
    }
}

/// Natural size of a rendered diagram. The `viewBox` wins when present;
/// otherwise `width`/`height` are read like CSS lengths (`"640px"` → 640).
pub fn parse_svg_size(view_box: Option<&str>, width: Option<&str>, height: Option<&str>) -> Size {
    match view_box {
        Some(view_box) => {
            let parts: Vec<&str> = view_box
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|part| !part.is_empty())
                .collect();
            Size::new(
                dimension_or(parts.get(2).copied(), FALLBACK_SVG_WIDTH),
                dimension_or(parts.get(3).copied(), FALLBACK_SVG_HEIGHT),
            )
        }
        None => Size::new(
            dimension_or(width, FALLBACK_SVG_WIDTH),
            dimension_or(height, FALLBACK_SVG_HEIGHT),
        ),
    }
}
