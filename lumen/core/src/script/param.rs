//! Script Parameters
//!
//! Every argument passed to a host call is converted into a [`Param`] before
//! it is written to the script. Each variant has exactly one rendering in the
//! host's Lua notation:
//!
//! | Variant | Rendering |
//! |---------|-----------|
//! | `Number(0.5)` | `0.5` |
//! | `Bool(true)` | `true` |
//! | `Text("a")` | `"a"` |
//! | `Table([1, 2])` | `{1,2}` |
//! | `Dict([("k", ["v"])])` | `{["k"]={"v"}}` |
//!
//! Text is wrapped in double quotes without escaping. A string that contains
//! a double quote produces a statement the host cannot parse.

use std::fmt::{self, Write};

use super::types::{Color, HorizontalAlign, Vec2, Vec3, VerticalAlign};

/// A single argument of a host call
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    /// Numeric scalar
    Number(f64),
    /// Lua boolean literal
    Bool(bool),
    /// Quoted string literal
    Text(String),
    /// Brace-delimited sequence, e.g. a position or a colour
    Table(Vec<Param>),
    /// Brace-delimited keyed table, keys rendered as `["key"]=`
    Dict(Vec<(String, Param)>),
}

impl Param {
    /// Build a table from numeric components
    pub fn numbers<I, N>(components: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<f64>,
    {
        Self::Table(
            components
                .into_iter()
                .map(|n| Self::Number(n.into()))
                .collect(),
        )
    }

    /// Build a table of string literals
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Table(items.into_iter().map(|s| Self::Text(s.into())).collect())
    }

    /// Write the Lua rendering of this parameter into `out`
    pub fn write_to(&self, out: &mut String) {
        match self {
            Self::Number(n) => write_number(*n, out),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::Text(s) => write_text(s, out),
            Self::Table(items) => write_table(items, out),
            Self::Dict(entries) => write_dict(entries, out),
        }
    }

    /// Render this parameter to a new string
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn write_number(n: f64, out: &mut String) {
    if n.is_nan() {
        out.push_str("(0/0)");
    } else if n.is_infinite() {
        out.push_str(if n > 0.0 { "math.huge" } else { "-math.huge" });
    } else {
        // Writing into a String cannot fail.
        let _ = write!(out, "{n}");
    }
}

fn write_text(s: &str, out: &mut String) {
    out.push('"');
    out.push_str(s);
    out.push('"');
}

fn write_table(items: &[Param], out: &mut String) {
    out.push('{');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        item.write_to(out);
    }
    out.push('}');
}

fn write_dict(entries: &[(String, Param)], out: &mut String) {
    out.push('{');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('[');
        write_text(key, out);
        out.push_str("]=");
        value.write_to(out);
    }
    out.push('}');
}

macro_rules! number_param {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Param {
                fn from(value: $t) -> Self {
                    Self::Number(f64::from(value))
                }
            }
        )*
    };
}

number_param!(f64, f32, i32, u32, i16, u16, i8, u8);

impl From<usize> for Param {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i64> for Param {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Vec<Param>> for Param {
    fn from(value: Vec<Param>) -> Self {
        Self::Table(value)
    }
}

impl<const N: usize> From<[f64; N]> for Param {
    fn from(value: [f64; N]) -> Self {
        Self::numbers(value)
    }
}

impl From<Vec2> for Param {
    fn from(v: Vec2) -> Self {
        Self::numbers([v.x, v.y])
    }
}

impl From<Vec3> for Param {
    fn from(v: Vec3) -> Self {
        Self::numbers([v.x, v.y, v.z])
    }
}

impl From<Color> for Param {
    fn from(c: Color) -> Self {
        Self::numbers([c.r, c.g, c.b, c.a])
    }
}

impl From<HorizontalAlign> for Param {
    fn from(align: HorizontalAlign) -> Self {
        Self::Text(align.code().to_string())
    }
}

impl From<VerticalAlign> for Param {
    fn from(align: VerticalAlign) -> Self {
        Self::Text(align.code().to_string())
    }
}
