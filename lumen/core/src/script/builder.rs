//! Script Builder
//!
//! [`Script`] accumulates host calls as Lua statements, one per line.
//!
//! A script is split into a fixed header and a body. The header holds the
//! marker lines the host dispatches on (see [`ScriptKind`]) and survives
//! [`Script::clear`]. The body holds the calls appended since the last clear.
//!
//! ```
//! use lumen_core::script::{Color, Script, Vec3};
//!
//! let mut script = Script::new();
//! script
//!     .begin_scene_2d("Test")
//!     .draw_quad_2d(
//!         Vec3::new(0.0, 0.0, 0.0),
//!         Vec3::new(1.0, 1.0, 0.0),
//!         Color::rgba(1.0, 0.0, 0.0, 1.0),
//!     );
//!
//! assert_eq!(
//!     script.snapshot(),
//!     "BeginScene2D(\"Test\")\nDrawQuad2D({0,0,0}, {1,1,0}, {1,0,0,1})\n"
//! );
//! ```

use super::param::Param;
use super::types::{Color, HorizontalAlign, Vec3, VerticalAlign};

/// Marker the host looks for before running a script as a drawing script
pub const EXECUTABLE_SCRIPT_MARKER: &str = "LUA_EXECUTABLE_SCRIPT";

/// Marker the host looks for before building a GUI window from a script
pub const GUI_SCRIPT_MARKER: &str = "LUA_SCRIPT_GUI";

/// Which header, if any, a script is seeded with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptKind {
    /// No header; the body is sent as-is
    #[default]
    Plain,
    /// `-- LUA_EXECUTABLE_SCRIPT`
    Executable,
    /// `-- LUA_SCRIPT_GUI`
    Gui,
}

impl ScriptKind {
    /// The marker line for this kind, without the trailing newline
    #[must_use]
    pub fn header_line(self) -> Option<String> {
        match self {
            Self::Plain => None,
            Self::Executable => Some(format!("-- {EXECUTABLE_SCRIPT_MARKER}")),
            Self::Gui => Some(format!("-- {GUI_SCRIPT_MARKER}")),
        }
    }
}

/// An ordered buffer of host call statements
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    kind: ScriptKind,
    header: String,
    body: String,
}

impl Script {
    /// Create an empty script with no header
    #[must_use]
    pub fn new() -> Self {
        Self::with_kind(ScriptKind::Plain)
    }

    /// Create a script prefixed with `-- LUA_EXECUTABLE_SCRIPT`
    #[must_use]
    pub fn executable() -> Self {
        Self::with_kind(ScriptKind::Executable)
    }

    /// Create a script seeded with the header for `kind`
    #[must_use]
    pub fn with_kind(kind: ScriptKind) -> Self {
        let mut script = Self {
            kind,
            header: String::new(),
            body: String::new(),
        };
        if let Some(line) = kind.header_line() {
            script.push_header_line(&line);
        }
        script
    }

    /// Wrap existing Lua source, e.g. a script file read from disk
    ///
    /// The source is kept verbatim as the body. A trailing newline is added
    /// when missing so later calls start on their own line.
    #[must_use]
    pub fn from_source(kind: ScriptKind, source: &str) -> Self {
        let mut script = Self::with_kind(kind);
        if let Some(line) = kind.header_line() {
            // The file may already carry the marker.
            if source.lines().any(|l| l.trim() == line) {
                script.header.clear();
            }
        }
        script.body.push_str(source);
        if !source.is_empty() && !source.ends_with('\n') {
            script.body.push('\n');
        }
        script
    }

    /// The header this script was seeded with
    #[must_use]
    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// Reset the body, keeping the header
    pub fn clear(&mut self) {
        self.body.clear();
    }

    /// The full script text: header followed by every statement in call order
    ///
    /// Reading does not modify the script; repeated calls return the same
    /// text until the next mutation.
    #[must_use]
    pub fn snapshot(&self) -> String {
        let mut text = String::with_capacity(self.header.len() + self.body.len());
        text.push_str(&self.header);
        text.push_str(&self.body);
        text
    }

    /// Return the full script text and clear the body
    pub fn take(&mut self) -> String {
        let text = self.snapshot();
        self.clear();
        text
    }

    /// Whether any statement has been appended since the last clear
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Number of statements in the body
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.lines().count()
    }

    /// The header lines, including their newlines
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The statements appended since the last clear
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Drop every header line except the kind marker
    pub(crate) fn reset_header(&mut self) {
        self.header.clear();
        if let Some(line) = self.kind.header_line() {
            self.push_header_line(&line);
        }
    }

    pub(crate) fn push_header_line(&mut self, line: &str) {
        self.header.push_str(line);
        self.header.push('\n');
    }

    /// Append a `-- text` comment line
    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.body.push_str("-- ");
        self.body.push_str(text);
        self.body.push('\n');
        self
    }

    /// Append `name(p1, p2, ..., pN)` as one statement
    pub fn call<I>(&mut self, name: &str, params: I) -> &mut Self
    where
        I: IntoIterator<Item = Param>,
    {
        self.body.push_str(name);
        self.body.push('(');
        for (i, param) in params.into_iter().enumerate() {
            if i > 0 {
                self.body.push_str(", ");
            }
            param.write_to(&mut self.body);
        }
        self.body.push_str(")\n");
        self
    }

    // -------------------------------------------------------------------------
    // Scenes
    // -------------------------------------------------------------------------

    /// Open a new 2D scene; following draw calls render into it
    pub fn begin_scene_2d(&mut self, name: &str) -> &mut Self {
        self.call("BeginScene2D", [Param::from(name)])
    }

    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    /// Axis-aligned quad spanning two opposite corners
    pub fn draw_quad_2d(&mut self, vertex1: Vec3, vertex2: Vec3, color: Color) -> &mut Self {
        self.call(
            "DrawQuad2D",
            [vertex1.into(), vertex2.into(), color.into()],
        )
    }

    /// Quad rotated about its centre by `degrees`
    pub fn draw_rotated_quad_2d(
        &mut self,
        vertex1: Vec3,
        vertex2: Vec3,
        color: Color,
        degrees: f64,
    ) -> &mut Self {
        self.call(
            "DrawRotatedQuad2D",
            [vertex1.into(), vertex2.into(), color.into(), degrees.into()],
        )
    }

    /// Line segment of the given thickness
    pub fn draw_line_2d(
        &mut self,
        vertex1: Vec3,
        vertex2: Vec3,
        thickness: f64,
        color: Color,
    ) -> &mut Self {
        self.call(
            "DrawLine2D",
            [vertex1.into(), vertex2.into(), thickness.into(), color.into()],
        )
    }

    /// Circle; `thickness` of 1 fills it, `fade` softens the edge
    pub fn draw_circle_2d(
        &mut self,
        center: Vec3,
        radius: f64,
        color: Color,
        thickness: f64,
        fade: f64,
    ) -> &mut Self {
        self.call(
            "DrawCircle2D",
            [
                center.into(),
                radius.into(),
                color.into(),
                thickness.into(),
                fade.into(),
            ],
        )
    }

    /// Filled triangle
    pub fn draw_triangle_2d(
        &mut self,
        vertex1: Vec3,
        vertex2: Vec3,
        vertex3: Vec3,
        color: Color,
    ) -> &mut Self {
        self.call(
            "DrawTriangle2D",
            [vertex1.into(), vertex2.into(), vertex3.into(), color.into()],
        )
    }

    /// Text anchored at `position`
    pub fn draw_text_2d(
        &mut self,
        text: &str,
        position: Vec3,
        color: Color,
        scale: f64,
        horizontal: HorizontalAlign,
        vertical: VerticalAlign,
    ) -> &mut Self {
        self.call(
            "DrawText2D",
            [
                text.into(),
                position.into(),
                color.into(),
                scale.into(),
                horizontal.into(),
                vertical.into(),
            ],
        )
    }

    /// Text anchored at `position` and rotated by `degrees`
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rotated_text_2d(
        &mut self,
        text: &str,
        position: Vec3,
        color: Color,
        scale: f64,
        horizontal: HorizontalAlign,
        vertical: VerticalAlign,
        degrees: f64,
    ) -> &mut Self {
        self.call(
            "DrawRotatedText2D",
            [
                text.into(),
                position.into(),
                color.into(),
                scale.into(),
                horizontal.into(),
                vertical.into(),
                degrees.into(),
            ],
        )
    }
}
