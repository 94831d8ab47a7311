//! Element model: the drawable objects that make up a scene.
//!
//! Every element shares an id, an origin and a [`Style`]; the [`Shape`] carries
//! only the fields meaningful for its kind. Consumers (hit-testing, rendering,
//! moves) match on `Shape` exhaustively.
//!
//! The on-disk / history representation lives in [`crate::snapshot`].

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{STICKY_SIZE, TEXT_FONT_SCALE};
use crate::viewport::Point;

/// Unique identifier for an element.
///
/// Backed by a UUIDv7, so ids sort by creation time and carry random bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Mint a fresh, never-reused id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The variant tag of an element, as written in project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Brush,
    Eraser,
    Highlighter,
    Line,
    Rectangle,
    Circle,
    Text,
    #[serde(rename = "sticky")]
    StickyNote,
}

impl ElementKind {
    /// The serialized tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brush => "brush",
            Self::Eraser => "eraser",
            Self::Highlighter => "highlighter",
            Self::Line => "line",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::StickyNote => "sticky",
        }
    }

    /// The stroke flavor, if this kind is a freehand stroke.
    #[must_use]
    pub fn stroke_kind(self) -> Option<StrokeKind> {
        match self {
            Self::Brush => Some(StrokeKind::Brush),
            Self::Eraser => Some(StrokeKind::Eraser),
            Self::Highlighter => Some(StrokeKind::Highlighter),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Freehand stroke flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeKind {
    Brush,
    /// Paints with the background color; the underlying elements are untouched.
    Eraser,
    Highlighter,
}

impl From<StrokeKind> for ElementKind {
    fn from(kind: StrokeKind) -> Self {
        match kind {
            StrokeKind::Brush => Self::Brush,
            StrokeKind::Eraser => Self::Eraser,
            StrokeKind::Highlighter => Self::Highlighter,
        }
    }
}

/// Paint attributes shared by every element.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// CSS color string.
    pub color: String,
    /// Stroke width in world units; text renders at twice this.
    pub size: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Style {
    #[must_use]
    pub fn new(color: impl Into<String>, size: f64) -> Self {
        Self { color: color.into(), size, alpha: 1.0 }
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Variant-specific geometry and content.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Freehand polyline in world space.
    Stroke { kind: StrokeKind, points: Vec<Point> },
    /// Segment from the element origin to `end`.
    Line { end: Point },
    /// Box from the origin; negative extents point toward negative axes.
    Rectangle { width: f64, height: f64 },
    /// Circle centered on the origin passing through `edge`.
    Circle { edge: Point },
    /// Single line of text whose top-left is the origin.
    Text { content: String },
    /// Fixed-size note whose top-left is the origin.
    StickyNote { content: String },
}

/// One drawable object on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub origin: Point,
    pub style: Style,
    pub shape: Shape,
}

impl Element {
    /// Start a new element of `kind` at `origin` with a freshly minted id.
    ///
    /// Strokes begin with the origin as their first point; every other shape
    /// starts degenerate (zero length, zero size, empty text).
    #[must_use]
    pub fn new(kind: ElementKind, origin: Point, style: Style) -> Self {
        let stroke = |kind| Shape::Stroke { kind, points: vec![origin] };
        let shape = match kind {
            ElementKind::Brush => stroke(StrokeKind::Brush),
            ElementKind::Eraser => stroke(StrokeKind::Eraser),
            ElementKind::Highlighter => stroke(StrokeKind::Highlighter),
            ElementKind::Line => Shape::Line { end: origin },
            ElementKind::Rectangle => Shape::Rectangle { width: 0.0, height: 0.0 },
            ElementKind::Circle => Shape::Circle { edge: origin },
            ElementKind::Text => Shape::Text { content: String::new() },
            ElementKind::StickyNote => Shape::StickyNote { content: String::new() },
        };
        Self { id: ElementId::new(), origin, style, shape }
    }

    /// The variant tag.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match &self.shape {
            Shape::Stroke { kind, .. } => (*kind).into(),
            Shape::Line { .. } => ElementKind::Line,
            Shape::Rectangle { .. } => ElementKind::Rectangle,
            Shape::Circle { .. } => ElementKind::Circle,
            Shape::Text { .. } => ElementKind::Text,
            Shape::StickyNote { .. } => ElementKind::StickyNote,
        }
    }

    /// Apply a drag position to an in-progress element.
    ///
    /// Strokes append, lines and circles move their second point, rectangles
    /// recompute their extent from the origin. Text and sticky notes ignore it.
    pub fn extend_to(&mut self, world: Point) {
        match &mut self.shape {
            Shape::Stroke { points, .. } => points.push(world),
            Shape::Line { end } => *end = world,
            Shape::Circle { edge } => *edge = world,
            Shape::Rectangle { width, height } => {
                *width = world.x - self.origin.x;
                *height = world.y - self.origin.y;
            }
            Shape::Text { .. } | Shape::StickyNote { .. } => {}
        }
    }

    /// Replace the text of a text or sticky element. Returns `false` for other shapes.
    pub fn set_content(&mut self, text: &str) -> bool {
        match &mut self.shape {
            Shape::Text { content } | Shape::StickyNote { content } => {
                text.clone_into(content);
                true
            }
            _ => false,
        }
    }

    /// Text carried by the element, if it has any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.shape {
            Shape::Text { content } | Shape::StickyNote { content } => Some(content),
            _ => None,
        }
    }

    /// Shift every coordinate of the element by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.origin = self.origin.offset(dx, dy);
        match &mut self.shape {
            Shape::Stroke { points, .. } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
            Shape::Line { end } => *end = end.offset(dx, dy),
            Shape::Circle { edge } => *edge = edge.offset(dx, dy),
            Shape::Rectangle { .. } | Shape::Text { .. } | Shape::StickyNote { .. } => {}
        }
    }

    /// Radius of a circle element; `None` for other shapes.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match &self.shape {
            Shape::Circle { edge } => Some(self.origin.distance(*edge)),
            _ => None,
        }
    }

    /// Font size used for text elements.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.style.size * TEXT_FONT_SCALE
    }

    /// Box extent `(w, h)` for shapes drawn as boxes.
    #[must_use]
    pub fn box_extent(&self) -> Option<(f64, f64)> {
        match &self.shape {
            Shape::Rectangle { width, height } => Some((*width, *height)),
            Shape::StickyNote { .. } => Some((STICKY_SIZE, STICKY_SIZE)),
            _ => None,
        }
    }
}
