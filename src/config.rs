//! Build-time configuration for the backend API with an optional runtime
//! override read from `window.AMAL_CONFIG`, so static deployments can repoint
//! the backend without rebuilding. Values are public; do not store secrets here.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://localhost:44332/api";
/// Name of the server-set session cookie.
pub const DEFAULT_SESSION_COOKIE: &str = ".AspNetCore.Identity.Application";

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_cookie: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_owned(),
        }
    }
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let mut config = Self {
            api_base_url: option_env!("AMAL_API_BASE_URL")
                .and_then(normalize_value)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned()),
            session_cookie: option_env!("AMAL_SESSION_COOKIE")
                .and_then(normalize_value)
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_owned()),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    session_cookie: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.session_cookie {
        config.session_cookie = value;
    }
}

#[cfg(feature = "csr")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("AMAL_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_base_url"),
        session_cookie: read_runtime_value(&object, "session_cookie"),
    })
}

#[cfg(not(feature = "csr"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(feature = "csr")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_value(&value)
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
