//! Decoding of widget events the host reports over the callback connection.

/// A widget event reported by a host GUI window
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuiEvent {
    /// `[Button] <label> : Pressed.`
    Button {
        /// Widget label
        label: String,
    },
    /// `[CloseButton] <label> : Pressed.`
    CloseButton {
        /// Widget label
        label: String,
    },
    /// `[ClearAwaitScriptButton] <label> : Pressed.`
    ClearAwaitScriptButton {
        /// Widget label
        label: String,
    },
    /// `[Combo] <label> : Item <item>.`
    Combo {
        /// Widget label
        label: String,
        /// Selected option text
        item: String,
    },
    /// `[Checkbox] <label> : 1.`
    Checkbox {
        /// Widget label
        label: String,
        /// New state
        checked: bool,
    },
    /// `[InputText] <label> : <text>`
    InputText {
        /// Widget label
        label: String,
        /// Current contents
        text: String,
    },
    /// `[Table] <label> : [Key] <key> [Value <row>] : <value>`
    TableCell {
        /// Widget label
        label: String,
        /// Column key
        key: String,
        /// Row index
        row: usize,
        /// Cell contents
        value: String,
    },
}

impl GuiEvent {
    /// Decode a callback message; `None` if the format is not recognised
    #[must_use]
    pub fn parse(message: &str) -> Option<Self> {
        let message = message.trim_end_matches(['\r', '\n']);
        let rest = message.strip_prefix('[')?;
        let (widget, rest) = rest.split_once("] ")?;
        let (label, payload) = rest.split_once(" : ")?;
        let label = label.to_string();

        match widget {
            "Button" if payload == "Pressed." => Some(Self::Button { label }),
            "CloseButton" if payload == "Pressed." => Some(Self::CloseButton { label }),
            "ClearAwaitScriptButton" if payload == "Pressed." => {
                Some(Self::ClearAwaitScriptButton { label })
            }
            "Combo" => {
                let item = payload.strip_prefix("Item ")?.strip_suffix('.')?;
                Some(Self::Combo {
                    label,
                    item: item.to_string(),
                })
            }
            "Checkbox" => {
                let checked = match payload {
                    "1." => true,
                    "0." => false,
                    _ => return None,
                };
                Some(Self::Checkbox { label, checked })
            }
            "InputText" => Some(Self::InputText {
                label,
                text: payload.to_string(),
            }),
            "Table" => parse_table_cell(label, payload),
            _ => None,
        }
    }

    /// Label of the widget that produced the event
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Button { label }
            | Self::CloseButton { label }
            | Self::ClearAwaitScriptButton { label }
            | Self::Combo { label, .. }
            | Self::Checkbox { label, .. }
            | Self::InputText { label, .. }
            | Self::TableCell { label, .. } => label,
        }
    }
}

fn parse_table_cell(label: String, payload: &str) -> Option<GuiEvent> {
    let rest = payload.strip_prefix("[Key] ")?;
    let (key, rest) = rest.split_once(" [Value ")?;
    let (row, value) = rest.split_once("] : ")?;
    Some(GuiEvent::TableCell {
        label,
        key: key.to_string(),
        row: row.trim().parse().ok()?,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_buttons() {
        assert_eq!(
            GuiEvent::parse("[Button] OK : Pressed."),
            Some(GuiEvent::Button { label: "OK".into() })
        );
        assert_eq!(
            GuiEvent::parse("[CloseButton] Done : Pressed.\n"),
            Some(GuiEvent::CloseButton { label: "Done".into() })
        );
        assert_eq!(
            GuiEvent::parse("[ClearAwaitScriptButton] Next : Pressed."),
            Some(GuiEvent::ClearAwaitScriptButton { label: "Next".into() })
        );
    }

    #[test]
    fn test_value_widgets() {
        assert_eq!(
            GuiEvent::parse("[Combo] Color : Item Green."),
            Some(GuiEvent::Combo {
                label: "Color".into(),
                item: "Green".into()
            })
        );
        assert_eq!(
            GuiEvent::parse("[Checkbox] Enabled : 0."),
            Some(GuiEvent::Checkbox {
                label: "Enabled".into(),
                checked: false
            })
        );
        assert_eq!(
            GuiEvent::parse("[InputText] Name : a : b"),
            Some(GuiEvent::InputText {
                label: "Name".into(),
                text: "a : b".into()
            })
        );
    }

    #[test]
    fn test_table_cell() {
        let event = GuiEvent::parse("[Table] Transformers : [Key] Rating [Value 1] : 1MVA").unwrap();
        assert_eq!(
            event,
            GuiEvent::TableCell {
                label: "Transformers".into(),
                key: "Rating".into(),
                row: 1,
                value: "1MVA".into()
            }
        );
        assert_eq!(event.label(), "Transformers");
    }

    #[test]
    fn test_unrecognised_messages() {
        assert_eq!(GuiEvent::parse("hello"), None);
        assert_eq!(GuiEvent::parse("[Button] OK : Released."), None);
        assert_eq!(GuiEvent::parse("[Checkbox] X : maybe."), None);
        assert_eq!(GuiEvent::parse("[Slider] S : 3."), None);
    }
}
