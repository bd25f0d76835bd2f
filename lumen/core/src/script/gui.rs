//! GUI Scripts
//!
//! A [`GuiScript`] describes a window the host builds from ImGui-style calls.
//! The host identifies it by the `-- LUA_SCRIPT_GUI` marker, names the window
//! from the `-- Gui Name: '<name>'` line and connects back to the
//! `-- Websocket: '<host>:<port>'.` announcement to report widget events.
//!
//! The announcement is added by
//! [`LumenInstance::start_server`](crate::LumenInstance::start_server) once the
//! callback server has a port.

use std::fmt;
use std::net::SocketAddrV4;

use super::builder::{Script, ScriptKind};
use super::param::Param;
use super::types::Vec2;
use crate::transport::MessageHandler;

/// Builder for a host GUI window
#[derive(Clone)]
pub struct GuiScript {
    name: String,
    script: Script,
    announced: Option<SocketAddrV4>,
    server_handler: Option<MessageHandler>,
}

impl fmt::Debug for GuiScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuiScript")
            .field("name", &self.name)
            .field("script", &self.script)
            .field("announced", &self.announced)
            .field("server_handler", &self.server_handler.is_some())
            .finish()
    }
}

impl GuiScript {
    /// Create an empty GUI script for a window called `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut script = Script::with_kind(ScriptKind::Gui);
        script.push_header_line(&format!("-- Gui Name: '{name}'"));
        Self {
            name,
            script,
            announced: None,
            server_handler: None,
        }
    }

    /// Window name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address announced to the host, if any
    #[must_use]
    pub fn announced_endpoint(&self) -> Option<SocketAddrV4> {
        self.announced
    }

    /// Append the callback announcement to the header
    ///
    /// Calling this again with the same address is a no-op; a different
    /// address replaces the previous announcement. The host splits the
    /// announcement at the first `:`, so only IPv4 addresses can be expressed.
    pub fn announce_endpoint(&mut self, addr: SocketAddrV4) {
        if self.announced == Some(addr) {
            return;
        }
        self.script.reset_header();
        self.script
            .push_header_line(&format!("-- Gui Name: '{}'", self.name));
        self.script
            .push_header_line(&format!("-- Websocket: '{}:{}'.", addr.ip(), addr.port()));
        self.announced = Some(addr);
    }

    /// Store the callback invoked for every message the host sends back
    ///
    /// Nothing runs until the callback server is started.
    pub fn set_server_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.server_handler = Some(std::sync::Arc::new(handler));
        self
    }

    /// The stored callback, if one was set
    #[must_use]
    pub fn server_handler(&self) -> Option<MessageHandler> {
        self.server_handler.clone()
    }

    /// The underlying script
    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Header followed by every GUI statement; does not modify the script
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.script.snapshot()
    }

    /// Return the full text and clear the statements
    pub fn take(&mut self) -> String {
        self.script.take()
    }

    /// Drop all statements, keeping the header
    pub fn clear(&mut self) {
        self.script.clear();
    }

    /// Whether no statement has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// Append an arbitrary call
    pub fn call<I>(&mut self, name: &str, params: I) -> &mut Self
    where
        I: IntoIterator<Item = Param>,
    {
        self.script.call(name, params);
        self
    }

    /// Push button; reports `[Button] <label> : Pressed.`
    pub fn button(&mut self, label: &str, size: Vec2) -> &mut Self {
        self.call("Button", [label.into(), size.into()])
    }

    /// Button that closes the window after reporting the press
    pub fn close_button(&mut self, label: &str, size: Vec2) -> &mut Self {
        self.call("CloseButton", [label.into(), size.into()])
    }

    /// Button that reports the press and waits for a new script on the connection
    pub fn clear_await_script_button(&mut self, label: &str, size: Vec2) -> &mut Self {
        self.call("ClearAwaitScriptButton", [label.into(), size.into()])
    }

    /// Static text
    pub fn text(&mut self, content: &str) -> &mut Self {
        self.call("Text", [content.into()])
    }

    /// Keep the next widget on the current line
    pub fn same_line(&mut self, offset: f64) -> &mut Self {
        self.call("SameLine", [offset.into()])
    }

    /// Horizontal rule
    pub fn separator(&mut self) -> &mut Self {
        self.call("Separator", [])
    }

    /// Checkbox with its initial state
    pub fn checkbox(&mut self, label: &str, value: bool) -> &mut Self {
        self.call("Checkbox", [label.into(), value.into()])
    }

    /// Single-line text input
    pub fn input_text(&mut self, label: &str, initial: &str) -> &mut Self {
        self.call("InputText", [label.into(), initial.into()])
    }

    /// Drop-down list; `visible` is the number of rows shown when open
    pub fn combo<I, S>(&mut self, label: &str, selected: usize, options: I, visible: usize) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call(
            "Combo",
            [
                label.into(),
                selected.into(),
                Param::strings(options),
                visible.into(),
            ],
        )
    }

    /// Table whose columns are keyed by header, one value per row
    pub fn table<I, K, V, S>(&mut self, label: &str, height: f64, data: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = data
            .into_iter()
            .map(|(key, values)| (key.into(), Param::strings(values)))
            .collect();
        self.call("Table", [label.into(), height.into(), Param::Dict(columns)])
    }
}
