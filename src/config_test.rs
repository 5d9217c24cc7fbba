use super::*;

fn base_config() -> AppConfig {
    AppConfig {
        api_base_url: "https://api.default".to_owned(),
        session_cookie: "default-cookie".to_owned(),
    }
}

#[test]
fn normalize_value_trims_and_rejects_empty() {
    assert_eq!(normalize_value(""), None);
    assert_eq!(normalize_value("   "), None);
    assert_eq!(
        normalize_value("  https://api.example.org "),
        Some("https://api.example.org".to_owned())
    );
}

#[test]
fn default_config_points_at_local_backend() {
    let config = AppConfig::default();
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.session_cookie, DEFAULT_SESSION_COOKIE);
}

#[test]
fn load_without_browser_uses_build_time_values() {
    let config = AppConfig::load();
    assert!(!config.api_base_url.is_empty());
    assert!(!config.session_cookie.is_empty());
}

#[test]
fn apply_runtime_overrides_ignores_missing_values() {
    let mut config = base_config();
    let runtime = RuntimeConfig {
        api_base_url: normalize_value(" "),
        session_cookie: None,
    };

    apply_runtime_overrides(&mut config, runtime);

    assert_eq!(config, base_config());
}

#[test]
fn apply_runtime_overrides_overwrites_when_present() {
    let mut config = base_config();
    let runtime = RuntimeConfig {
        api_base_url: normalize_value("https://api.override"),
        session_cookie: normalize_value("override-cookie"),
    };

    apply_runtime_overrides(&mut config, runtime);

    assert_eq!(config.api_base_url, "https://api.override");
    assert_eq!(config.session_cookie, "override-cookie");
}
