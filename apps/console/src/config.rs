use std::collections::HashMap;

#[derive(Debug)]
pub struct Settings {
    pub server_url: String,
    pub refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            refresh_secs: 60,
        }
    }
}

/// Layered settings: defaults, then `clinic.toml`, then environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = std::fs::read_to_string("clinic.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("CLINIC_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("CLINIC_REFRESH_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.refresh_secs = parsed;
        }
    }

    settings
}
