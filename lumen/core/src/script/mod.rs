//! Host Command Scripts
//!
//! Builders that turn Rust calls into the Lua call statements the host
//! executes. Nothing here performs I/O; a finished script is handed to a
//! [`LumenInstance`](crate::LumenInstance) to be sent.
//!
//! # Modules
//!
//! - [`builder`]: [`Script`], the statement buffer and draw calls
//! - [`gui`]: [`GuiScript`], window widgets and the callback handler slot
//! - [`events`]: [`GuiEvent`], decoding of the host's widget reports
//! - [`param`]: [`Param`], argument serialization
//! - [`types`]: vectors, colours and text alignment

pub mod builder;
pub mod events;
pub mod gui;
pub mod param;
pub mod types;

pub use builder::{Script, ScriptKind, EXECUTABLE_SCRIPT_MARKER, GUI_SCRIPT_MARKER};
pub use events::GuiEvent;
pub use gui::GuiScript;
pub use param::Param;
pub use types::{Color, HorizontalAlign, Vec2, Vec3, VerticalAlign};
