//! Panel settings schema and loading.
//!
//! Settings live in the host's key-value store and arrive here as a JSON
//! value. The core itself only consumes the retention window; the JWT header
//! names and token prefixes are carried for the presentation layer, which
//! uses them to decide where to look for tokens worth decoding. Missing or
//! invalid user settings fall back to defaults rather than failing the
//! panel.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User-configurable panel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSettings {
    /// Header names to scan for JWTs. Consumed by the presentation layer,
    /// not by the core pipeline.
    #[serde(default = "default_jwt_header_names")]
    pub jwt_header_names: Vec<String>,

    /// Token prefixes stripped before decoding (e.g. `"Bearer "`). Consumed
    /// by the presentation layer.
    #[serde(default = "default_token_prefixes")]
    pub token_prefixes: Vec<String>,

    /// Maximum session age in hours before a session becomes eligible for
    /// eviction. Must be at least 1.
    #[serde(default = "default_session_retention_hours")]
    pub session_retention_hours: u32,
}

fn default_jwt_header_names() -> Vec<String> {
    vec!["authorization".to_string(), "x-auth-token".to_string()]
}

fn default_token_prefixes() -> Vec<String> {
    vec!["Bearer ".to_string()]
}

fn default_session_retention_hours() -> u32 {
    24
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            jwt_header_names: default_jwt_header_names(),
            token_prefixes: default_token_prefixes(),
            session_retention_hours: default_session_retention_hours(),
        }
    }
}

impl PanelSettings {
    /// Validates the settings.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive
    /// message.
    pub fn validate(&self) -> Result<(), String> {
        if self.session_retention_hours == 0 {
            return Err("sessionRetentionHours must be at least 1".to_string());
        }
        Ok(())
    }

    /// Merges this settings object with another, the other taking
    /// precedence. Used to apply user settings on top of defaults.
    pub fn merge(&self, other: &PanelSettings) -> Self {
        Self {
            jwt_header_names: other.jwt_header_names.clone(),
            token_prefixes: other.token_prefixes.clone(),
            session_retention_hours: other.session_retention_hours,
        }
    }

    /// The retention window as a duration.
    pub fn retention_window(&self) -> Duration {
        Duration::hours(i64::from(self.session_retention_hours))
    }
}

/// Loads panel settings from the host's settings JSON.
///
/// Reads the `"netpanel"` key, merges user values over defaults, and
/// validates the result. A malformed settings blob is logged and replaced by
/// defaults; only a structurally valid blob with out-of-range values is
/// reported as an error.
///
/// # Arguments
///
/// * `settings_json` - Optional JSON value containing user settings under
///   the `"netpanel"` key
///
/// # Example
///
/// ```
/// use netpanel::settings::load_settings;
/// use serde_json::json;
///
/// let settings = load_settings(Some(json!({
///     "netpanel": { "sessionRetentionHours": 48 }
/// }))).unwrap();
/// assert_eq!(settings.session_retention_hours, 48);
/// ```
pub fn load_settings(settings_json: Option<Value>) -> Result<PanelSettings, String> {
    let mut settings = PanelSettings::default();

    if let Some(json) = settings_json {
        if let Some(panel_json) = json.get("netpanel") {
            match serde_json::from_value::<PanelSettings>(panel_json.clone()) {
                Ok(user_settings) => {
                    settings = settings.merge(&user_settings);
                }
                Err(e) => {
                    log::warn!("failed to parse netpanel settings, using defaults: {}", e);
                }
            }
        }
    }

    settings
        .validate()
        .map_err(|e| format!("Invalid settings: {}", e))?;

    Ok(settings)
}
