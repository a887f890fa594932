use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DrawerError;

/// Timing, class names and selectors for one drawer instance.
///
/// Delays are in milliseconds and mirror the CSS transition durations of the
/// stylesheet: the opening delay lets the browser lay out the active panel
/// before the visible class starts the slide-in, the closing delay keeps the
/// panel in the layout until the slide-out has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawerSettings {
    pub speed_open: u64,
    pub speed_close: u64,
    pub active_class: String,
    pub visible_class: String,
    pub selector_target: String,
    pub selector_trigger: String,
    pub selector_close: String,
}

impl Default for DrawerSettings {
    fn default() -> Self {
        Self {
            speed_open: 50,
            speed_close: 350,
            active_class: "is-active".into(),
            visible_class: "is-visible".into(),
            selector_target: "[data-drawer-target]".into(),
            selector_trigger: "[data-drawer-trigger]".into(),
            selector_close: "[data-drawer-close]".into(),
        }
    }
}

impl DrawerSettings {
    pub fn from_json(json: &str) -> Result<Self, DrawerError> {
        let settings: DrawerSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DrawerError> {
        for (name, class) in [
            ("activeClass", &self.active_class),
            ("visibleClass", &self.visible_class),
        ] {
            if class.is_empty() {
                return Err(DrawerError::InvalidSettings(format!("{name} is empty")));
            }
            if class.chars().any(char::is_whitespace) {
                return Err(DrawerError::InvalidSettings(format!(
                    "{name} {class:?} must be a single class name"
                )));
            }
        }
        if self.active_class == self.visible_class {
            return Err(DrawerError::InvalidSettings(
                "activeClass and visibleClass must differ".into(),
            ));
        }
        for (name, selector) in [
            ("selectorTarget", &self.selector_target),
            ("selectorTrigger", &self.selector_trigger),
            ("selectorClose", &self.selector_close),
        ] {
            if selector.trim().is_empty() {
                return Err(DrawerError::InvalidSettings(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.speed_open)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.speed_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_markup_contract() {
        let s = DrawerSettings::default();
        assert_eq!(s.open_delay(), Duration::from_millis(50));
        assert_eq!(s.close_delay(), Duration::from_millis(350));
        assert_eq!(s.selector_trigger, "[data-drawer-trigger]");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s = DrawerSettings::from_json(r#"{"speedClose": 500, "visibleClass": "shown"}"#)
            .unwrap();
        assert_eq!(s.speed_close, 500);
        assert_eq!(s.visible_class, "shown");
        assert_eq!(s.speed_open, 50);
        assert_eq!(s.active_class, "is-active");
    }

    #[test]
    fn rejects_bad_class_names() {
        let err = DrawerSettings::from_json(r#"{"activeClass": "is active"}"#).unwrap_err();
        assert!(matches!(err, DrawerError::InvalidSettings(_)));

        let err = DrawerSettings::from_json(r#"{"visibleClass": "is-active"}"#).unwrap_err();
        assert!(matches!(err, DrawerError::InvalidSettings(_)));
    }

    #[test]
    fn rejects_empty_selector() {
        let err = DrawerSettings::from_json(r#"{"selectorClose": "  "}"#).unwrap_err();
        assert!(matches!(err, DrawerError::InvalidSettings(_)));
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let err = DrawerSettings::from_json("{speedOpen: 1").unwrap_err();
        assert!(matches!(err, DrawerError::SettingsFormat(_)));
    }
}
