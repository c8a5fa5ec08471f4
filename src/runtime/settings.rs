use encore::config::{Settings, resolve_config_path};

/// Load settings, falling back to defaults. The second value describes why
/// the defaults were used; it is logged once the subscriber is installed.
pub fn load_settings() -> (Settings, Option<String>) {
    match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        Err(e) => {
            let origin = resolve_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "environment".to_string());
            (
                Settings::default(),
                Some(format!("failed to load config from {origin}, using defaults: {e}")),
            )
        }
    }
}
