use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry_seconds: i64,
    /// Skips token verification and treats every caller as SuperAdmin.
    /// Local development only.
    #[serde(default)]
    pub bypass: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Credentials for a SuperAdmin ensured at startup. Both must be set.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl SeedConfig {
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}

fn default_database_url() -> String {
    "sqlite://stockroom.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

/// Plain variables honoured on top of the prefixed ones.
const LEGACY_ENV: [(&str, &str); 4] = [
    ("JWT_SECRET", "auth.jwt_secret"),
    ("DATABASE_URL", "database.url"),
    ("PORT", "server.port"),
    ("BYPASS_AUTH", "auth.bypass"),
];

/// Apply the plain variables found by `lookup`. `BYPASS_AUTH` turns bypass
/// on only when it is exactly `"true"`; any other value turns it off.
fn with_legacy_overrides<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<(ConfigBuilder<DefaultState>, Vec<String>), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut overrides = Vec::new();
    for (env_var, config_key) in LEGACY_ENV {
        let Some(value) = lookup(env_var) else {
            continue;
        };
        builder = if env_var == "BYPASS_AUTH" {
            builder.set_override(config_key, value == "true")?
        } else {
            builder.set_override(config_key, value)?
        };
        overrides.push(config_key.to_string());
    }
    Ok((builder, overrides))
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Load configuration from `stockroom.toml` (optional), `.env`, and the
    /// environment. Prefixed variables look like `STOCKROOM__AUTH__JWT_SECRET`;
    /// `JWT_SECRET`, `DATABASE_URL`, `PORT` and `BYPASS_AUTH` override them.
    ///
    /// Returns the config and the list of keys that came from the environment.
    pub fn load_with_env() -> Result<(Self, Vec<String>), ConfigError> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name("stockroom").required(false))
            .add_source(
                Environment::with_prefix("STOCKROOM")
                    .prefix_separator("__")
                    .separator("__"),
            );

        let (builder, mut overrides) =
            with_legacy_overrides(builder, |name| std::env::var(name).ok())?;
        for (key, _) in std::env::vars() {
            if let Some(rest) = key.strip_prefix("STOCKROOM__") {
                let config_key = rest.to_lowercase().replace("__", ".");
                if !overrides.contains(&config_key) {
                    overrides.push(config_key);
                }
            }
        }

        let app_config: Self = builder.build()?.try_deserialize()?;
        app_config.validate()?;
        Ok((app_config, overrides))
    }

    /// Reject settings that would leave the service unable to verify its own tokens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set (JWT_SECRET)".to_string(),
            ));
        }
        if self.auth.token_expiry_seconds <= 0 {
            return Err(ConfigError::Message(
                "auth.token_expiry_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_token_expiry(), 3600);
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 3000);
        assert_eq!(default_database_url(), "sqlite://stockroom.db");
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let file = write_config("[auth]\njwt_secret = \"s3cret\"\n");
        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.token_expiry_seconds, 3600);
        assert!(!config.auth.bypass);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.seed.admin_credentials().is_none());
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_secret_fails_fast() {
        let file = write_config("[server]\nport = 8080\n[auth]\nbypass = true\n");
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let file = write_config("[auth]\njwt_secret = \"x\"\ntoken_expiry_seconds = 0\n");
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    fn load_with(file: &tempfile::NamedTempFile, vars: &[(&str, &str)]) -> AppConfig {
        let builder = Config::builder().add_source(File::from(file.path()));
        let (builder, _) = with_legacy_overrides(builder, |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        })
        .unwrap();
        builder.build().unwrap().try_deserialize().unwrap()
    }

    #[test]
    fn test_bypass_variable_only_enables_on_exact_true() {
        let file = write_config("[auth]\njwt_secret = \"x\"\nbypass = true\n");

        assert!(load_with(&file, &[]).auth.bypass);
        assert!(load_with(&file, &[("BYPASS_AUTH", "true")]).auth.bypass);
        assert!(!load_with(&file, &[("BYPASS_AUTH", "")]).auth.bypass);
        assert!(!load_with(&file, &[("BYPASS_AUTH", "TRUE")]).auth.bypass);
        assert!(!load_with(&file, &[("BYPASS_AUTH", "yes please")]).auth.bypass);
    }

    #[test]
    fn test_plain_variables_override_file() {
        let file = write_config("[auth]\njwt_secret = \"x\"\n");
        let config = load_with(&file, &[("JWT_SECRET", "from-env"), ("PORT", "8081")]);

        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_seed_requires_both_fields() {
        let seed = SeedConfig {
            admin_email: Some("root@stockroom.local".to_string()),
            admin_password: None,
        };
        assert!(seed.admin_credentials().is_none());

        let seed = SeedConfig {
            admin_email: Some("root@stockroom.local".to_string()),
            admin_password: Some("hunter2".to_string()),
        };
        assert_eq!(
            seed.admin_credentials(),
            Some(("root@stockroom.local", "hunter2"))
        );
    }
}
