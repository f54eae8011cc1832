#![forbid(unsafe_code)]

//! Caller-facing popup options.

/// Labels and behaviour flags of a popup.
///
/// With the `serde` feature every field is optional when deserializing;
/// missing fields take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopupConfig {
    /// Header title. No title node is created when `None`.
    pub title: Option<String>,
    /// Close when a click lands on the overlay itself.
    pub close_on_overlay_click: bool,
    /// Close on Escape.
    pub close_on_escape: bool,
    /// Extra class appended to the panel's class list.
    pub class_name: String,
    pub confirm_text: String,
    pub cancel_text: String,
    /// Accessible label of the close control.
    pub close_label: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            title: None,
            close_on_overlay_click: true,
            close_on_escape: true,
            class_name: String::new(),
            confirm_text: "Confirmer".to_string(),
            cancel_text: "Annuler".to_string(),
            close_label: "Fermer".to_string(),
        }
    }
}

impl PopupConfig {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = close;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    #[must_use]
    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    #[must_use]
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    #[must_use]
    pub fn close_label(mut self, label: impl Into<String>) -> Self {
        self.close_label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PopupConfig::default();
        assert_eq!(config.title, None);
        assert!(config.close_on_overlay_click);
        assert!(config.close_on_escape);
        assert_eq!(config.class_name, "");
        assert_eq!(config.confirm_text, "Confirmer");
        assert_eq!(config.cancel_text, "Annuler");
        assert_eq!(config.close_label, "Fermer");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let config: PopupConfig =
            serde_json::from_str(r#"{"title":"Delete?","close_on_escape":false}"#).unwrap();
        assert_eq!(config.title.as_deref(), Some("Delete?"));
        assert!(!config.close_on_escape);
        assert!(config.close_on_overlay_click);
        assert_eq!(config.cancel_text, "Annuler");
    }
}
