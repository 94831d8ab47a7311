//! Input model: tools, mouse buttons, and the gesture state machine.
//!
//! `Tool` and the active style capture the user's intent at the time of a
//! pointer event. `Gesture` is the interaction tracked between pointer-down
//! and pointer-up; while it is anything other than `Idle` it owns the live
//! element or drag state, and no other gesture may start.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::element::{ElementId, ElementKind};
use crate::viewport::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand ink (default).
    #[default]
    Brush,
    /// Freehand strokes in the background color.
    Eraser,
    /// Translucent freehand strokes.
    Highlighter,
    Line,
    Rectangle,
    Circle,
    /// Place a single line of text.
    Text,
    /// Place a sticky note.
    Sticky,
    /// Drag existing elements.
    Move,
    /// Drag the view.
    Pan,
}

impl Tool {
    /// The element kind this tool draws by dragging, if any.
    #[must_use]
    pub fn drawn_kind(self) -> Option<ElementKind> {
        match self {
            Self::Brush => Some(ElementKind::Brush),
            Self::Eraser => Some(ElementKind::Eraser),
            Self::Highlighter => Some(ElementKind::Highlighter),
            Self::Line => Some(ElementKind::Line),
            Self::Rectangle => Some(ElementKind::Rectangle),
            Self::Circle => Some(ElementKind::Circle),
            Self::Text | Self::Sticky | Self::Move | Self::Pan => None,
        }
    }

    /// The element kind this tool places after the host collects text, if any.
    #[must_use]
    pub fn placed_kind(self) -> Option<ElementKind> {
        match self {
            Self::Text => Some(ElementKind::Text),
            Self::Sticky => Some(ElementKind::StickyNote),
            _ => None,
        }
    }

    /// CSS cursor shown while the tool is idle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Pan => "grab",
            Self::Text | Self::Sticky => "text",
            Self::Brush | Self::Eraser | Self::Highlighter | Self::Line | Self::Rectangle | Self::Circle => {
                "crosshair"
            }
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click); always pans.
    Middle,
    /// Right mouse button; ignored.
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub dy: f64,
}

/// Persistent tool and paint selection.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Tool,
    /// CSS color for new elements.
    pub color: String,
    /// Stroke width for new elements, in world units.
    pub size: f64,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::default(), color: "#000000".to_owned(), size: 4.0 }
    }
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the view.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Shaping the scene's live element.
    Drawing {
        /// Id of the live element.
        id: ElementId,
    },
    /// Moving a committed element.
    DraggingElement {
        id: ElementId,
        /// World position of the previous pointer event.
        last_world: Point,
        /// Whether a history checkpoint was taken for this drag.
        checkpointed: bool,
    },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
