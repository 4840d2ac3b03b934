//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Admin site configuration.
    #[serde(default)]
    pub admin: AdminSiteConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as read from configuration sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// Static branding for the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct AdminSiteConfig {
    /// Header shown on every admin page.
    #[serde(default = "default_site_header")]
    pub site_header: String,
    /// Browser title suffix.
    #[serde(default = "default_site_title")]
    pub site_title: String,
    /// Title of the admin index page.
    #[serde(default = "default_index_title")]
    pub index_title: String,
}

impl Default for AdminSiteConfig {
    fn default() -> Self {
        Self {
            site_header: default_site_header(),
            site_title: default_site_title(),
            index_title: default_index_title(),
        }
    }
}

fn default_site_header() -> String {
    "Finance Dashboard Administration".to_string()
}

fn default_site_title() -> String {
    "Finance Admin".to_string()
}

fn default_index_title() -> String {
    "Financial Management Dashboard".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINTRACK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", Some("postgres://localhost/fintrack")),
                ("FINTRACK__JWT__SECRET", Some("env-secret")),
                ("FINTRACK__SERVER__PORT", Some("9090")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();

                assert_eq!(config.database.url, "postgres://localhost/fintrack");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "env-secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert_eq!(config.jwt.refresh_token_expiry_secs, 604_800);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.admin, AdminSiteConfig::default());
            },
        );
    }

    #[test]
    fn test_admin_site_override() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", Some("postgres://localhost/fintrack")),
                ("FINTRACK__JWT__SECRET", Some("env-secret")),
                ("FINTRACK__ADMIN__SITE_HEADER", Some("Household Books")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().unwrap();

                assert_eq!(config.admin.site_header, "Household Books");
                assert_eq!(config.admin.site_title, "Finance Admin");
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("FINTRACK__DATABASE__URL", None::<&str>),
                ("FINTRACK__JWT__SECRET", Some("env-secret")),
                ("RUN_MODE", Some("test-nonexistent")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
