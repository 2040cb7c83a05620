//! BaaS connection settings, baked into the bundle at build time.
//!
//! ```text
//! COLMEIA_BAAS_URL=https://xyz.example.co COLMEIA_BAAS_ANON_KEY=... trunk build
//! ```

use thiserror::Error;

pub const URL_VAR: &str = "COLMEIA_BAAS_URL";
pub const ANON_KEY_VAR: &str = "COLMEIA_BAAS_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("variável de ambiente {0} não definida no build")]
    Missing(&'static str),
    #[error("{var} inválida: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL without trailing slash
    pub baas_url: String,
    /// Public (anon) key, sent as `apikey` and as bearer before login
    pub anon_key: String,
}

fn required(var: &'static str, value: Option<&str>) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::Missing(var))
}

impl AppConfig {
    pub fn from_values(url: Option<&str>, anon_key: Option<&str>) -> Result<Self, ConfigError> {
        let url = required(URL_VAR, url)?;
        let anon_key = required(ANON_KEY_VAR, anon_key)?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: URL_VAR,
                reason: format!("esperado http:// ou https://, recebido '{}'", url),
            });
        }

        Ok(Self {
            baas_url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    /// Values captured by `option_env!` when the crate was compiled
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_values(option_env!("COLMEIA_BAAS_URL"), option_env!("COLMEIA_BAAS_ANON_KEY"))
    }

    /// `{url}/rest/v1/{table}`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.baas_url, table)
    }

    /// `{url}/auth/v1/{path}`
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.baas_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_trims_slash() {
        let cfg = AppConfig::from_values(Some("https://abc.example.co/"), Some(" key ")).unwrap();
        assert_eq!(cfg.baas_url, "https://abc.example.co");
        assert_eq!(cfg.anon_key, "key");
        assert_eq!(cfg.rest_url("produtores"), "https://abc.example.co/rest/v1/produtores");
        assert_eq!(
            cfg.auth_url("token?grant_type=password"),
            "https://abc.example.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn test_missing_or_blank_is_fatal() {
        assert_eq!(
            AppConfig::from_values(None, Some("k")),
            Err(ConfigError::Missing(URL_VAR))
        );
        assert_eq!(
            AppConfig::from_values(Some("https://x"), Some("  ")),
            Err(ConfigError::Missing(ANON_KEY_VAR))
        );
    }

    #[test]
    fn test_url_scheme_required() {
        let err = AppConfig::from_values(Some("ftp://x"), Some("k")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: URL_VAR, .. }));
        assert!(err.to_string().contains("COLMEIA_BAAS_URL"));
    }
}
