//! Scene store: the committed elements, the live element, and undo/redo.
//!
//! DESIGN
//! ======
//! All scene mutation goes through [`SceneStore`]. Committed elements are kept
//! in draw order (last = topmost). At most one live element exists at a time;
//! it is owned by the active gesture until committed or cancelled.
//!
//! History is snapshot based: before each undoable mutation the whole element
//! list is serialized onto the undo stack, and undo/redo replace the element
//! list with a freshly deserialized copy. Restores parse before touching any
//! state, so a failed restore leaves the scene and both stacks as they were.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use tracing::debug;

use crate::element::{Element, ElementId, ElementKind, Style};
use crate::history::History;
use crate::snapshot::{self, Snapshot, SnapshotError};
use crate::viewport::Point;

#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    elements: Vec<Element>,
    live: Option<Element>,
    history: History,
}

impl SceneStore {
    /// An empty scene with the default history depth.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty scene retaining at most `limit` undo snapshots.
    #[must_use]
    pub fn with_history_limit(limit: usize) -> Self {
        Self { history: History::new(limit), ..Self::default() }
    }

    // --- Queries ---

    /// Committed elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The in-progress element, if a gesture is drawing one.
    #[must_use]
    pub fn live_element(&self) -> Option<&Element> {
        self.live.as_ref()
    }

    /// Look up a committed element by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    // --- Live element ---

    /// Start drawing a new element. Returns `None` if one is already live.
    pub fn begin_element(&mut self, kind: ElementKind, origin: Point, style: Style) -> Option<ElementId> {
        if self.live.is_some() {
            return None;
        }
        let element = Element::new(kind, origin, style);
        let id = element.id;
        self.live = Some(element);
        Some(id)
    }

    /// Feed the current drag position to the live element. Returns `false` if none is live.
    pub fn update_live_element(&mut self, world: Point) -> bool {
        let Some(live) = self.live.as_mut() else {
            return false;
        };
        live.extend_to(world);
        true
    }

    /// Set the text of a live text or sticky element.
    pub fn set_live_content(&mut self, content: &str) -> bool {
        self.live.as_mut().is_some_and(|live| live.set_content(content))
    }

    /// Drop the live element without recording anything.
    pub fn cancel_live_element(&mut self) -> Option<Element> {
        self.live.take()
    }

    /// Move the live element into the scene, recording the prior scene for undo.
    ///
    /// Returns the committed id, or `None` if nothing was live.
    ///
    /// # Errors
    ///
    /// Returns an error if the pre-commit scene cannot be serialized; the live
    /// element stays live in that case.
    pub fn commit_live_element(&mut self) -> Result<Option<ElementId>, SnapshotError> {
        if self.live.is_none() {
            return Ok(None);
        }
        self.checkpoint()?;
        let Some(element) = self.live.take() else {
            return Ok(None);
        };
        let id = element.id;
        debug!(%id, kind = %element.kind(), "element committed");
        self.elements.push(element);
        Ok(Some(id))
    }

    // --- Committed mutations ---

    /// Record the current scene on the undo stack and invalidate redo.
    ///
    /// Callers use this before a series of un-recorded edits such as a drag.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be serialized.
    pub fn checkpoint(&mut self) -> Result<(), SnapshotError> {
        let before = Snapshot::capture(&self.elements)?;
        self.history.record(before);
        Ok(())
    }

    /// Translate a committed element. Does not record history.
    pub fn move_element(&mut self, id: ElementId, dx: f64, dy: f64) -> bool {
        let Some(element) = self.elements.iter_mut().find(|el| el.id == id) else {
            return false;
        };
        element.translate(dx, dy);
        true
    }

    /// Restore the previous snapshot. Returns `false` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot fails to round-trip; nothing changes then.
    pub fn undo(&mut self) -> Result<bool, SnapshotError> {
        if self.history.undo_depth() == 0 {
            return Ok(false);
        }
        let current = Snapshot::capture(&self.elements)?;
        let Some(restored) = self.history.step_back(current)? else {
            return Ok(false);
        };
        self.elements = restored;
        debug!(undo = self.undo_depth(), redo = self.redo_depth(), "undo");
        Ok(true)
    }

    /// Re-apply the most recently undone snapshot. Returns `false` when there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot fails to round-trip; nothing changes then.
    pub fn redo(&mut self) -> Result<bool, SnapshotError> {
        if self.history.redo_depth() == 0 {
            return Ok(false);
        }
        let current = Snapshot::capture(&self.elements)?;
        let Some(restored) = self.history.step_forward(current)? else {
            return Ok(false);
        };
        self.elements = restored;
        debug!(undo = self.undo_depth(), redo = self.redo_depth(), "redo");
        Ok(true)
    }

    /// Remove every committed element; undoable.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be serialized; nothing is removed then.
    pub fn clear(&mut self) -> Result<(), SnapshotError> {
        self.checkpoint()?;
        debug!(removed = self.elements.len(), "scene cleared");
        self.elements.clear();
        Ok(())
    }

    // --- Persistence ---

    /// Replace the scene with a serialized project and start a fresh history.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed text; the scene, live element and
    /// history are untouched then.
    pub fn load_snapshot(&mut self, text: &str) -> Result<(), SnapshotError> {
        let elements = snapshot::deserialize(text)?;
        debug!(count = elements.len(), "scene loaded");
        self.elements = elements;
        self.live = None;
        self.history.reset();
        Ok(())
    }

    /// Serialize the committed elements as a project file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        snapshot::serialize(&self.elements)
    }
}
