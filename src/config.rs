use std::fmt;
use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Symptom Checker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sampling temperature for analysis requests. Fixed low for near-deterministic output.
pub const GENERATION_TEMPERATURE: f32 = 0.2;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Credential variables, checked in order.
const API_KEY_VARS: &[&str] = &["SYMPTOM_CHECKER_API_KEY", "GEMINI_API_KEY", "API_KEY"];

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "symptom_checker_lib=info,symptom_checker=info,tower_http=info"
}

/// Runtime settings (env-driven).
#[derive(Clone)]
pub struct Settings {
    /// Credential for the analysis service. `None` degrades every check to the fallback result.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub bind_addr: SocketAddr,
    pub max_sessions: usize,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = API_KEY_VARS.iter().find_map(|name| var(name));

        let bind_addr = match var("SYMPTOM_CHECKER_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid SYMPTOM_CHECKER_BIND, using default");
                default_bind_addr()
            }),
            None => default_bind_addr(),
        };

        let max_sessions = var("SYMPTOM_CHECKER_MAX_SESSIONS")
            .and_then(|v| v.parse::<usize>().ok())
            .map(|v| v.clamp(1, 100_000))
            .unwrap_or(DEFAULT_MAX_SESSIONS);

        Self {
            api_key,
            model: var("SYMPTOM_CHECKER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: var("SYMPTOM_CHECKER_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            bind_addr,
            max_sessions,
        }
    }

    pub fn credential_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// The credential must never reach logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("bind_addr", &self.bind_addr)
            .field("max_sessions", &self.max_sessions)
            .finish()
    }
}

fn default_bind_addr() -> SocketAddr {
    DEFAULT_BIND_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_with(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let settings = Settings::default();
        assert!(settings.api_key.is_none());
        assert!(!settings.credential_configured());
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.endpoint, "https://generativelanguage.googleapis.com");
        assert_eq!(settings.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.max_sessions, 1000);
    }

    #[test]
    fn api_key_prefers_app_specific_variable() {
        let settings = settings_with(&[
            ("API_KEY", "generic"),
            ("GEMINI_API_KEY", "gemini"),
            ("SYMPTOM_CHECKER_API_KEY", "specific"),
        ]);
        assert_eq!(settings.api_key.as_deref(), Some("specific"));
    }

    #[test]
    fn api_key_falls_back_to_generic_variable() {
        let settings = settings_with(&[("API_KEY", "generic")]);
        assert_eq!(settings.api_key.as_deref(), Some("generic"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = settings_with(&[
            ("SYMPTOM_CHECKER_API_KEY", "   "),
            ("SYMPTOM_CHECKER_MODEL", ""),
        ]);
        assert!(settings.api_key.is_none());
        assert_eq!(settings.model, "gemini-2.5-flash");
    }

    #[test]
    fn invalid_bind_falls_back_to_default() {
        let settings = settings_with(&[("SYMPTOM_CHECKER_BIND", "not-an-address")]);
        assert_eq!(settings.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn custom_bind_is_parsed() {
        let settings = settings_with(&[("SYMPTOM_CHECKER_BIND", "0.0.0.0:9000")]);
        assert_eq!(settings.bind_addr.port(), 9000);
    }

    #[test]
    fn max_sessions_is_clamped() {
        assert_eq!(settings_with(&[("SYMPTOM_CHECKER_MAX_SESSIONS", "0")]).max_sessions, 1);
        assert_eq!(
            settings_with(&[("SYMPTOM_CHECKER_MAX_SESSIONS", "5000000")]).max_sessions,
            100_000
        );
        assert_eq!(
            settings_with(&[("SYMPTOM_CHECKER_MAX_SESSIONS", "abc")]).max_sessions,
            1000
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let settings = settings_with(&[("SYMPTOM_CHECKER_API_KEY", "super-secret")]);
        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
