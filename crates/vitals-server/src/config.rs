use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// SQLite url, e.g. `sqlite://vitals.db`
    pub url: String,
}

/// Admin account to seed on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialAdminConfig {
    #[serde(default = "default_admin_name")]
    pub name: String,
    pub email: String,
    pub password: String,
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

fn default_session_ttl() -> u64 {
    12 * 60 * 60
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session and flash cookies
    pub session_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// Registrations with exactly this email get the admin role. Unset disables the rule.
    pub admin_email: Option<String>,
    pub initial_admin: Option<InitialAdminConfig>,
}

/// Server configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:8080"
    pub db: DbConfig,
    pub auth: AuthConfig,
}

/// Load server config from a YAML file with VITALS__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    use anyhow::Context;
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("VITALS")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
listen: "0.0.0.0:8080"
db:
  url: "sqlite://vitals.db"
auth:
  session_secret: "s3cret"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.db.url, "sqlite://vitals.db");
        assert_eq!(config.auth.session_secret, "s3cret");
        assert_eq!(config.auth.session_ttl_secs, 43200);
        assert!(config.auth.admin_email.is_none());
        assert!(config.auth.initial_admin.is_none());
    }

    #[test]
    fn test_parse_config_with_admin_settings() {
        let yaml = r#"
listen: "127.0.0.1:3000"
db:
  url: "sqlite:///var/lib/vitals/vitals.db"
auth:
  session_secret: "s3cret"
  session_ttl_secs: 600
  admin_email: "admin@example.com"
  initial_admin:
    name: "Root"
    email: "root@example.com"
    password: "changeme"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.auth.session_ttl_secs, 600);
        assert_eq!(config.auth.admin_email.as_deref(), Some("admin@example.com"));
        let admin = config.auth.initial_admin.unwrap();
        assert_eq!(admin.name, "Root");
        assert_eq!(admin.email, "root@example.com");
        assert_eq!(admin.password, "changeme");
    }

    #[test]
    fn test_parse_initial_admin_default_name() {
        let yaml = r#"
listen: "0.0.0.0:8080"
db:
  url: "sqlite://vitals.db"
auth:
  session_secret: "s3cret"
  initial_admin:
    email: "root@example.com"
    password: "changeme"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.auth.initial_admin.unwrap().name, "Administrator");
    }

    #[test]
    fn test_parse_missing_auth_fails() {
        let yaml = r#"
listen: "0.0.0.0:8080"
db:
  url: "sqlite://vitals.db"
"#;
        let result: Result<ServerConfig, _> = serde_yml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_missing_session_secret_fails() {
        let yaml = r#"
listen: "0.0.0.0:8080"
db:
  url: "sqlite://vitals.db"
auth:
  admin_email: "admin@example.com"
"#;
        let result: Result<ServerConfig, _> = serde_yml::from_str(yaml);
        assert!(result.is_err());
    }

    /// Serialize access to env vars in tests to avoid races between parallel tests
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_env_override_db_url_and_secret() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let yaml = r#"
listen: "0.0.0.0:8080"
db:
  url: "sqlite://placeholder.db"
auth:
  session_secret: "yaml-secret"
"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, yaml.as_bytes()).unwrap();
        std::io::Write::flush(&mut file).unwrap();

        // SAFETY: test-only, serialized by ENV_MUTEX
        unsafe {
            std::env::set_var("VITALS__DB__URL", "sqlite://overridden.db");
            std::env::set_var("VITALS__AUTH__SESSION_SECRET", "env-secret");
        }

        let config = load_config(file.path().to_str().unwrap()).unwrap();

        unsafe {
            std::env::remove_var("VITALS__DB__URL");
            std::env::remove_var("VITALS__AUTH__SESSION_SECRET");
        }

        assert_eq!(config.db.url, "sqlite://overridden.db");
        assert_eq!(config.auth.session_secret, "env-secret");
        // Non-overridden values preserved from YAML
        assert_eq!(config.listen, "0.0.0.0:8080");
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let result = load_config("/nonexistent/vitals.yaml");
        assert!(result.is_err());
    }
}
