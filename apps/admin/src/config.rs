use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::CascadeConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "authors-admin.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub log_filter: String,
    pub cascade: CascadeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".into(),
            log_filter: "info".into(),
            cascade: CascadeConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    log_filter: Option<String>,
    cascade: Option<CascadeConfig>,
}

/// Defaults, then the TOML file, then environment, then `api_url_flag`.
///
/// The default file is optional; an explicitly named one must exist.
pub fn load_settings(
    config_path: Option<&Path>,
    api_url_flag: Option<&str>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => {
            settings = apply_file(settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        Err(err) if required => {
            return Err(err).with_context(|| format!("failed to read config '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings = apply_env(settings, |key| std::env::var(key).ok());

    if let Some(url) = api_url_flag {
        settings.api_url = url.to_string();
    }

    Ok(settings)
}

fn apply_file(mut settings: Settings, raw: &str) -> anyhow::Result<Settings> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file.cascade {
        settings.cascade = v;
    }
    Ok(settings)
}

fn apply_env(mut settings: Settings, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    if let Some(v) = lookup("AUTHORS_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    settings
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use client_core::PutShape;

    use super::*;

    #[test]
    fn file_overrides_defaults_and_keeps_unset_fields() {
        let settings = apply_file(
            Settings::default(),
            r#"
            api_url = "https://backend.example.com/api"

            [cascade]
            book_author_field = "writers"
            prize_patch_bodies = ['{"owner": null}']
            prize_put_shapes = [{ kind = "id_only", field = "owner" }]
            "#,
        )
        .expect("settings");

        assert_eq!(settings.api_url, "https://backend.example.com/api");
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.cascade.book_author_field, "writers");
        assert_eq!(
            settings.cascade.prize_patch_bodies,
            vec![serde_json::json!({"owner": null})]
        );
        assert_eq!(
            settings.cascade.prize_put_shapes,
            vec![PutShape::IdOnly {
                field: "owner".into()
            }]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(apply_file(Settings::default(), "server_bind = \"0.0.0.0\"").is_err());
    }

    #[test]
    fn app_prefixed_env_wins_over_plain() {
        let env = HashMap::from([
            ("AUTHORS_API_URL", "http://plain/api"),
            ("APP__API_URL", "http://prefixed/api"),
            ("APP__LOG_FILTER", "debug"),
        ]);

        let settings = apply_env(Settings::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(settings.api_url, "http://prefixed/api");
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let missing = Path::new("definitely/not/here/authors-admin.toml");
        assert!(load_settings(Some(missing), None).is_err());
    }
}
