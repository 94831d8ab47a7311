//! Shared numeric and color constants for the canvas engine.

// ── Hit-testing ─────────────────────────────────────────────────

/// World-space slop added to every element's nominal size when hit-testing.
pub const HIT_SLOP: f64 = 10.0;

/// Estimated glyph advance as a fraction of the font size.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Text and sticky-note font size is this multiple of the element `size`.
pub const TEXT_FONT_SCALE: f64 = 2.0;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom scale.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed zoom scale.
pub const MAX_SCALE: f64 = 10.0;

/// Multiplicative zoom applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of undo snapshots retained.
pub const HISTORY_LIMIT: usize = 50;

// ── Sticky notes ────────────────────────────────────────────────

/// Sticky notes are a fixed square in world units.
pub const STICKY_SIZE: f64 = 200.0;

/// Inner padding between the sticky box edge and its text.
pub const STICKY_PADDING: f64 = 10.0;

/// Drop-shadow offset in world units.
pub const STICKY_SHADOW_OFFSET: f64 = 5.0;

/// Sticky label font size in world units.
pub const STICKY_FONT_PX: f64 = 16.0;

/// Distance between wrapped sticky lines.
pub const STICKY_LINE_HEIGHT: f64 = 20.0;

pub const STICKY_FILL: &str = "#fff59d";
pub const STICKY_SHADOW: &str = "rgba(0, 0, 0, 0.2)";
pub const STICKY_TEXT: &str = "#333333";

// ── Grid ────────────────────────────────────────────────────────

/// Spacing of the fine grid tier in world units.
pub const GRID_FINE_SPACING: f64 = 50.0;

/// Spacing of the coarse grid tier in world units.
pub const GRID_COARSE_SPACING: f64 = 250.0;

pub const GRID_FINE_COLOR: &str = "#eeeeee";
pub const GRID_COARSE_COLOR: &str = "#dddddd";

// ── Palette ─────────────────────────────────────────────────────

/// Surface fill; eraser strokes paint with this color.
pub const BACKGROUND_COLOR: &str = "#ffffff";

/// Substitute ink when the requested color would vanish into the background.
pub const DEFAULT_INK: &str = "#1f1a17";

/// Opacity applied to highlighter strokes.
pub const HIGHLIGHTER_ALPHA: f64 = 0.3;
