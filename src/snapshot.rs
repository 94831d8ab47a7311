//! Scene serialization: the project file format and undo/redo snapshots.
//!
//! A scene is written as an ordered JSON array of flat records:
//!
//! ```json
//! [{"type":"line","id":"…","x":0,"y":0,"color":"#000","size":2,"alpha":1,"endX":10,"endY":0}]
//! ```
//!
//! Optional fields (`points`, `endX`/`endY`, `w`/`h`, `content`) appear only for
//! the variants that use them. Records are converted into [`Element`]s with
//! per-variant validation, so a parsed scene never carries fields its tag
//! does not use.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::STICKY_SIZE;
use crate::element::{Element, ElementId, ElementKind, Shape, StrokeKind, Style};
use crate::viewport::Point;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed scene json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind} element {id} is missing `{field}`")]
    MissingField { kind: ElementKind, id: ElementId, field: &'static str },
    #[error("element id {id} appears more than once")]
    DuplicateId { id: ElementId },
}

/// Flat wire form of one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementRecord {
    #[serde(rename = "type")]
    kind: ElementKind,
    id: ElementId,
    x: f64,
    y: f64,
    color: String,
    size: f64,
    #[serde(default = "opaque")]
    alpha: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

fn opaque() -> f64 {
    1.0
}

impl From<&Element> for ElementRecord {
    fn from(el: &Element) -> Self {
        let mut record = Self {
            kind: el.kind(),
            id: el.id,
            x: el.origin.x,
            y: el.origin.y,
            color: el.style.color.clone(),
            size: el.style.size,
            alpha: el.style.alpha,
            points: None,
            end_x: None,
            end_y: None,
            w: None,
            h: None,
            content: None,
        };
        match &el.shape {
            Shape::Stroke { points, .. } => record.points = Some(points.clone()),
            Shape::Line { end: p } | Shape::Circle { edge: p } => {
                record.end_x = Some(p.x);
                record.end_y = Some(p.y);
            }
            Shape::Rectangle { width, height } => {
                record.w = Some(*width);
                record.h = Some(*height);
            }
            Shape::Text { content } => record.content = Some(content.clone()),
            Shape::StickyNote { content } => {
                record.w = Some(STICKY_SIZE);
                record.h = Some(STICKY_SIZE);
                record.content = Some(content.clone());
            }
        }
        record
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = SnapshotError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let (kind, id) = (record.kind, record.id);
        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or(SnapshotError::MissingField { kind, id, field })
        };

        let stroke = |kind: StrokeKind, points: Option<Vec<Point>>| Shape::Stroke {
            kind,
            points: points.unwrap_or_default(),
        };
        let shape = match kind {
            ElementKind::Brush => stroke(StrokeKind::Brush, record.points),
            ElementKind::Eraser => stroke(StrokeKind::Eraser, record.points),
            ElementKind::Highlighter => stroke(StrokeKind::Highlighter, record.points),
            ElementKind::Line => Shape::Line {
                end: Point::new(require(record.end_x, "endX")?, require(record.end_y, "endY")?),
            },
            ElementKind::Circle => Shape::Circle {
                edge: Point::new(require(record.end_x, "endX")?, require(record.end_y, "endY")?),
            },
            ElementKind::Rectangle => Shape::Rectangle {
                width: require(record.w, "w")?,
                height: require(record.h, "h")?,
            },
            ElementKind::Text => Shape::Text { content: record.content.unwrap_or_default() },
            ElementKind::StickyNote => Shape::StickyNote { content: record.content.unwrap_or_default() },
        };

        Ok(Self {
            id,
            origin: Point::new(record.x, record.y),
            style: Style { color: record.color, size: record.size, alpha: record.alpha },
            shape,
        })
    }
}

/// Encode elements, in order, as the project JSON format.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn serialize(elements: &[Element]) -> Result<String, SnapshotError> {
    let records: Vec<ElementRecord> = elements.iter().map(ElementRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Decode the project JSON format into elements, preserving order.
///
/// Either every record converts or nothing is returned.
///
/// # Errors
///
/// Returns `Json` for unparseable text or unknown type tags, `MissingField`
/// when a record lacks a field its type requires, `DuplicateId` when two
/// records share an id.
pub fn deserialize(text: &str) -> Result<Vec<Element>, SnapshotError> {
    let records: Vec<ElementRecord> = serde_json::from_str(text)?;
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id) {
            return Err(SnapshotError::DuplicateId { id: record.id });
        }
    }
    records.into_iter().map(Element::try_from).collect()
}

/// A serialized full-scene copy held by the undo/redo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    /// Serialize the current element list.
    ///
    /// # Errors
    ///
    /// Propagates [`serialize`] failures.
    pub fn capture(elements: &[Element]) -> Result<Self, SnapshotError> {
        serialize(elements).map(Self)
    }

    /// Deserialize a fresh copy of the captured elements.
    ///
    /// # Errors
    ///
    /// Propagates [`deserialize`] failures.
    pub fn restore(&self) -> Result<Vec<Element>, SnapshotError> {
        deserialize(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
