use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::GateConfig;
use crate::errors::{GateError, GateResult};

pub const DEFAULT_CONFIG_FILE: &str = "watchgate.toml";
pub const ENV_PREFIX: &str = "WATCHGATE_";

/// Defaults, then the TOML file, then `WATCHGATE_*` environment variables.
pub fn figment(path: Option<&str>) -> Figment {
    Figment::from(Serialized::defaults(GateConfig::default()))
        .merge(Toml::file(path.unwrap_or(DEFAULT_CONFIG_FILE)))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn load_config(path: Option<&str>) -> GateResult<GateConfig> {
    extract(figment(path))
}

pub fn extract(figment: Figment) -> GateResult<GateConfig> {
    let config: GateConfig = figment
        .extract()
        .map_err(|e| GateError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;

    #[test]
    fn toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(GateConfig::default())).merge(Toml::string(
            r#"
            backend = "memory"
            port = 9090
            cors_origins = []
            "#,
        ));
        let cfg = extract(figment).expect("config should load");
        assert_eq!(cfg.backend, StoreBackend::Memory);
        assert_eq!(cfg.port, 9090);
        assert!(cfg.cors_origins.is_empty());
        assert_eq!(cfg.data_dir, "./data");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let figment = Figment::from(Serialized::defaults(GateConfig::default()))
            .merge(Toml::string(r#"backend = "postgres""#));
        assert!(matches!(extract(figment), Err(GateError::Config { .. })));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let figment = Figment::from(Serialized::defaults(GateConfig::default()))
            .merge(Toml::file("definitely/not/here.toml"));
        let cfg = extract(figment).expect("defaults should load");
        assert_eq!(cfg, GateConfig::default());
    }
}
