use serde::{Deserialize, Serialize};

/// Color theme preference for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// User preferences persisted in the key-value store.
///
/// `advanced_mode` gates the multi-line credit view. It is loaded once,
/// owned by the application state, and threaded explicitly into whatever
/// needs it rather than read from a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub advanced_mode: bool,
    #[serde(default)]
    pub theme: Theme,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_settings_are_basic_mode_system_theme() {
        let settings = Settings::default();

        assert!(!settings.advanced_mode);
        assert_eq!(settings.theme, Theme::System);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn round_trips_through_json() {
        let settings = Settings {
            advanced_mode: true,
            theme: Theme::Dark,
        };

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();

        assert_eq!(back, settings);
    }
}
