//! Presentation logic for a Matrix client's room-creation events modal
//! and its space list, designed for use within a Makepad + Robius app.
//!
//! None of the types here are widgets: they produce plain data
//! and send updates that a widget renders on the UI thread.

pub mod errors;
pub mod settings;

/// The room-creation events modal and the room data it consumes.
pub mod room;
/// The space list entries and "feature unavailable" dialogs.
pub mod spaces;
/// Generating text of the events that set up a room.
pub mod event_preview;

pub mod avatar;
pub mod avatar_cache;
pub mod operation;

pub mod utils;
