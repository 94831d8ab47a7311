//! Infinite-canvas drawing engine for the whiteboard.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! scene (the ordered list of drawn elements), the viewport that maps the
//! unbounded world plane onto the canvas, snapshot-based undo/redo, and
//! rendering. The host JavaScript layer wires DOM events to the engine,
//! schedules frames when asked, and handles the [`engine::Action`]s it returns
//! (cursor changes, text entry overlays).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser-bound [`engine::Engine`] and testable [`engine::EngineCore`] |
//! | [`scene`] | Committed elements, the live element, and history |
//! | [`element`] | Element model: ids, kinds, styles, shapes |
//! | [`snapshot`] | JSON project format and history snapshots |
//! | [`history`] | Bounded undo/redo stacks |
//! | [`viewport`] | Pan/zoom viewport and coordinate conversions |
//! | [`input`] | Tools, buttons, and the gesture state machine |
//! | [`hit`] | Hit-testing against elements |
//! | [`render`] | Frame pipeline over a Canvas2D-like [`render::Surface`] |
//! | [`config`] | Host-supplied engine configuration |
//! | [`consts`] | Shared numeric and color constants |

pub mod config;
pub mod consts;
pub mod element;
pub mod engine;
pub mod history;
pub mod hit;
pub mod input;
pub mod render;
pub mod scene;
pub mod snapshot;
pub mod viewport;
