use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::EngineConfig;
use crate::element::{ElementId, ElementKind, Style};
use crate::hit;
use crate::input::{Button, Gesture, Tool, UiState, WheelDelta};
use crate::render::{self, RenderError, Surface};
use crate::scene::SceneStore;
use crate::snapshot::SnapshotError;
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Requests returned from input handlers for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open a text overlay at `screen`; the host answers with
    /// [`EngineCore::place_text`] using `kind` and `world`.
    EditTextRequested { kind: ElementKind, world: Point, screen: Point },
    /// Change the CSS cursor of the canvas element.
    SetCursor(String),
}

/// Coalesces redraw requests into at most one pending frame.
///
/// The hook (typically scheduling `requestAnimationFrame`) fires only on the
/// transition from clean to pending; further requests are absorbed until the
/// frame is rendered.
#[derive(Default)]
pub struct RedrawSignal {
    pending: bool,
    hook: Option<Box<dyn FnMut()>>,
}

impl RedrawSignal {
    /// Install the callback that schedules a frame.
    pub fn set_hook(&mut self, hook: impl FnMut() + 'static) {
        self.hook = Some(Box::new(hook));
    }

    /// Mark the surface dirty. Returns `true` if this request scheduled a frame.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        if let Some(hook) = self.hook.as_mut() {
            hook();
        }
        true
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The scheduled frame has been drawn.
    pub fn frame_rendered(&mut self) {
        self.pending = false;
    }
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub scene: SceneStore,
    pub viewport: Viewport,
    pub ui: UiState,
    pub gesture: Gesture,
    pub config: EngineConfig,
    pub redraw: RedrawSignal,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            scene: SceneStore::with_history_limit(config.history_limit),
            viewport: Viewport::default(),
            ui: UiState::default(),
            gesture: Gesture::Idle,
            config,
            redraw: RedrawSignal::default(),
        }
    }

    fn request_redraw(&mut self) {
        self.redraw.request();
    }

    // --- Tool / style ---

    pub fn set_tool(&mut self, tool: Tool) {
        debug!(?tool, "tool selected");
        self.ui.tool = tool;
    }

    pub fn set_color(&mut self, color: &str) {
        color.clone_into(&mut self.ui.color);
    }

    /// Set the stroke width for new elements. Non-positive or non-finite sizes are ignored.
    pub fn set_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.ui.size = size;
        }
    }

    /// Style for a new element of `kind` from the current selection.
    ///
    /// A color matching the background would be invisible, so non-eraser
    /// elements fall back to the default ink. Highlighters are translucent.
    #[must_use]
    pub fn style_for(&self, kind: ElementKind) -> Style {
        let color = if kind != ElementKind::Eraser && self.config.matches_background(&self.ui.color) {
            self.config.default_ink.clone()
        } else {
            self.ui.color.clone()
        };
        let style = Style::new(color, self.ui.size);
        if kind == ElementKind::Highlighter {
            style.with_alpha(self.config.highlighter_alpha)
        } else {
            style
        }
    }

    // --- Viewport ---

    pub fn resize(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport.resize(width_css, height_css, dpr);
        self.request_redraw();
    }

    /// Return to the identity view. Refused mid-gesture.
    pub fn reset_view(&mut self) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        self.viewport.reset_view();
        self.request_redraw();
        true
    }

    // --- Pointer input ---

    /// Start a gesture. Ignored while another gesture is active.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Primary => {}
            Button::Middle => return self.begin_pan(screen),
            Button::Secondary => return Vec::new(),
        }

        let world = self.viewport.screen_to_world(screen);
        let tool = self.ui.tool;
        match tool {
            Tool::Pan => self.begin_pan(screen),
            Tool::Move => {
                let Some(id) = hit::pick_topmost(self.scene.elements(), world).map(|el| el.id) else {
                    return Vec::new();
                };
                self.gesture = Gesture::DraggingElement { id, last_world: world, checkpointed: false };
                vec![Action::SetCursor("move".into())]
            }
            Tool::Text | Tool::Sticky => tool
                .placed_kind()
                .map(|kind| vec![Action::EditTextRequested { kind, world, screen }])
                .unwrap_or_default(),
            Tool::Brush | Tool::Eraser | Tool::Highlighter | Tool::Line | Tool::Rectangle | Tool::Circle => {
                let Some(kind) = tool.drawn_kind() else {
                    return Vec::new();
                };
                let style = self.style_for(kind);
                if let Some(id) = self.scene.begin_element(kind, world, style) {
                    self.gesture = Gesture::Drawing { id };
                    self.request_redraw();
                }
                Vec::new()
            }
        }
    }

    fn begin_pan(&mut self, screen: Point) -> Vec<Action> {
        self.gesture = Gesture::Panning { last_screen: screen };
        vec![Action::SetCursor("grabbing".into())]
    }

    /// Continue the active gesture.
    ///
    /// The first real movement of an element drag records one undo checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the drag checkpoint cannot be captured; the element
    /// is not moved then.
    pub fn on_pointer_move(&mut self, screen: Point) -> Result<Vec<Action>, SnapshotError> {
        let world = self.viewport.screen_to_world(screen);
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last_screen } => {
                self.viewport.pan(screen.x - last_screen.x, screen.y - last_screen.y);
                self.gesture = Gesture::Panning { last_screen: screen };
                self.request_redraw();
            }
            Gesture::Drawing { .. } => {
                if self.scene.update_live_element(world) {
                    self.request_redraw();
                }
            }
            Gesture::DraggingElement { id, last_world, checkpointed } => {
                if world == last_world {
                    return Ok(Vec::new());
                }
                if !checkpointed {
                    self.scene.checkpoint()?;
                }
                self.gesture = Gesture::DraggingElement { id, last_world: world, checkpointed: true };
                if self.scene.move_element(id, world.x - last_world.x, world.y - last_world.y) {
                    self.request_redraw();
                }
            }
        }
        Ok(Vec::new())
    }

    /// Finish the active gesture, committing any live element.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit snapshot cannot be captured; the live
    /// element is discarded and the scene is left unchanged.
    pub fn on_pointer_up(&mut self) -> Result<Vec<Action>, SnapshotError> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(Vec::new()),
            Gesture::Drawing { .. } => {
                let committed = self.scene.commit_live_element();
                if let Err(err) = &committed {
                    warn!(error = %err, "commit failed; discarding live element");
                    self.scene.cancel_live_element();
                }
                self.request_redraw();
                committed.map(|_| Vec::new())
            }
            Gesture::Panning { .. } | Gesture::DraggingElement { .. } => {
                Ok(vec![Action::SetCursor(self.ui.tool.cursor().into())])
            }
        }
    }

    /// Zoom at the cursor: scrolling up zooms in, down zooms out.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) {
        if delta.dy == 0.0 {
            return;
        }
        let factor = if delta.dy < 0.0 { self.config.zoom_step } else { 1.0 / self.config.zoom_step };
        self.viewport.zoom_at(screen, factor);
        self.request_redraw();
    }

    // --- Text placement ---

    /// Commit a text or sticky element with host-collected `content` at `world`.
    ///
    /// Blank content, non-text kinds, and calls during a gesture place nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit snapshot cannot be captured.
    pub fn place_text(
        &mut self,
        kind: ElementKind,
        world: Point,
        content: &str,
    ) -> Result<Option<ElementId>, SnapshotError> {
        if !matches!(kind, ElementKind::Text | ElementKind::StickyNote)
            || content.trim().is_empty()
            || !self.gesture.is_idle()
        {
            return Ok(None);
        }
        let style = self.style_for(kind);
        if self.scene.begin_element(kind, world, style).is_none() {
            return Ok(None);
        }
        if !self.scene.set_live_content(content) {
            self.scene.cancel_live_element();
            return Ok(None);
        }
        let committed = self.scene.commit_live_element();
        if committed.is_err() {
            self.scene.cancel_live_element();
        }
        self.request_redraw();
        committed
    }

    // --- History / persistence ---

    /// Undo the last change. Refused (`Ok(false)`) mid-gesture.
    ///
    /// # Errors
    ///
    /// Propagates snapshot restore failures.
    pub fn undo(&mut self) -> Result<bool, SnapshotError> {
        if !self.gesture.is_idle() {
            return Ok(false);
        }
        let changed = self.scene.undo()?;
        if changed {
            self.request_redraw();
        }
        Ok(changed)
    }

    /// Redo the last undone change. Refused (`Ok(false)`) mid-gesture.
    ///
    /// # Errors
    ///
    /// Propagates snapshot restore failures.
    pub fn redo(&mut self) -> Result<bool, SnapshotError> {
        if !self.gesture.is_idle() {
            return Ok(false);
        }
        let changed = self.scene.redo()?;
        if changed {
            self.request_redraw();
        }
        Ok(changed)
    }

    /// Remove everything (undoable). Refused (`Ok(false)`) mid-gesture.
    ///
    /// # Errors
    ///
    /// Propagates snapshot capture failures.
    pub fn clear(&mut self) -> Result<bool, SnapshotError> {
        if !self.gesture.is_idle() {
            return Ok(false);
        }
        self.scene.clear()?;
        self.request_redraw();
        Ok(true)
    }

    /// Open a project file, starting a fresh history. Refused (`Ok(false)`) mid-gesture.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed project; nothing changes then.
    pub fn load_json(&mut self, text: &str) -> Result<bool, SnapshotError> {
        if !self.gesture.is_idle() {
            return Ok(false);
        }
        if let Err(err) = self.scene.load_snapshot(text) {
            warn!(error = %err, "project load rejected");
            return Err(err);
        }
        self.request_redraw();
        Ok(true)
    }

    /// Serialize the committed scene as a project file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn save_json(&self) -> Result<String, SnapshotError> {
        self.scene.to_json()
    }

    // --- Queries ---

    /// The topmost element under a screen position.
    #[must_use]
    pub fn element_at(&self, screen: Point) -> Option<ElementId> {
        let world = self.viewport.screen_to_world(screen);
        hit::pick_topmost(self.scene.elements(), world).map(|el| el.id)
    }

    // --- Render ---

    /// Draw the current state to `surface` and settle the pending redraw.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any surface call fails.
    pub fn render_to<S: Surface + ?Sized>(&mut self, surface: &S) -> Result<(), RenderError> {
        self.redraw.frame_rendered();
        render::draw(surface, self.scene.elements(), self.scene.live_element(), &self.viewport, &self.config)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self::with_config(canvas, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(canvas: HtmlCanvasElement, config: EngineConfig) -> Self {
        Self { canvas, core: EngineCore::with_config(config) }
    }

    /// Install the callback that schedules a frame (usually `requestAnimationFrame`).
    pub fn set_redraw_hook(&mut self, hook: impl FnMut() + 'static) {
        self.core.redraw.set_hook(hook);
    }

    // --- Viewport ---

    /// Update viewport dimensions and size the backing store by device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.resize(width_css, height_css, dpr);
        let vp = self.core.viewport;
        self.canvas.set_width(backing_px(vp.width, vp.dpr));
        self.canvas.set_height(backing_px(vp.height, vp.dpr));
    }

    pub fn reset_view(&mut self) -> bool {
        self.core.reset_view()
    }

    // --- Delegated input ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen, button)
    }

    /// # Errors
    ///
    /// See [`EngineCore::on_pointer_move`].
    pub fn on_pointer_move(&mut self, screen: Point) -> Result<Vec<Action>, SnapshotError> {
        self.core.on_pointer_move(screen)
    }

    /// # Errors
    ///
    /// See [`EngineCore::on_pointer_up`].
    pub fn on_pointer_up(&mut self) -> Result<Vec<Action>, SnapshotError> {
        self.core.on_pointer_up()
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) {
        self.core.on_wheel(screen, delta);
    }

    /// # Errors
    ///
    /// See [`EngineCore::place_text`].
    pub fn place_text(
        &mut self,
        kind: ElementKind,
        world: Point,
        content: &str,
    ) -> Result<Option<ElementId>, SnapshotError> {
        self.core.place_text(kind, world, content)
    }

    // --- Delegated history / persistence ---

    /// # Errors
    ///
    /// See [`EngineCore::undo`].
    pub fn undo(&mut self) -> Result<bool, SnapshotError> {
        self.core.undo()
    }

    /// # Errors
    ///
    /// See [`EngineCore::redo`].
    pub fn redo(&mut self) -> Result<bool, SnapshotError> {
        self.core.redo()
    }

    /// # Errors
    ///
    /// See [`EngineCore::clear`].
    pub fn clear(&mut self) -> Result<bool, SnapshotError> {
        self.core.clear()
    }

    /// # Errors
    ///
    /// See [`EngineCore::load_json`].
    pub fn load_json(&mut self, text: &str) -> Result<bool, SnapshotError> {
        self.core.load_json(text)
    }

    /// # Errors
    ///
    /// See [`EngineCore::save_json`].
    pub fn save_json(&self) -> Result<String, SnapshotError> {
        self.core.save_json()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `NoContext` if the canvas has no 2D context, or the first failing
    /// Canvas2D call.
    pub fn render(&mut self) -> Result<(), RenderError> {
        let ctx = self.context()?;
        let result = self.core.render_to(&ctx);
        if let Err(err) = &result {
            warn!(error = %err, "render failed");
        }
        result
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, RenderError> {
        self.canvas
            .get_context("2d")?
            .ok_or(RenderError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::NoContext)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_px(css: f64, dpr: f64) -> u32 {
    (css * dpr).round().max(1.0) as u32
}
