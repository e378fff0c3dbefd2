use campus_db::DbSettings;

/// Inbound feed root used when `ICS_BASE_URL` is unset.
pub const DEFAULT_ICS_BASE_URL: &str = "https://cis.nordakademie.de/fileadmin/Infos/Stundenplaene";

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Tenant resolution settings.
#[derive(Debug, Clone)]
pub struct TenantConfig {
    /// Slug used when subdomain routing is disabled.
    pub default_slug: String,
    /// Derive the tenant from the first label of the `Host` header.
    pub subdomain_routing: bool,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    pub environment: Environment,
    /// Raw `LOG_LEVEL` value, if set.
    pub log_level: Option<String>,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Link base for emails (default: `http://localhost:5173`).
    pub frontend_url: String,
    /// Identity-provider base URL for tenants that don't carry their own.
    pub idp_url: Option<String>,
    pub tenant: TenantConfig,
    /// Inbound feed root.
    pub ics_base_url: String,
    /// Start the scheduler with an immediate run.
    pub ingest_run_immediately: bool,
    pub database: DbSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `8000`                     |
    /// | `APP_ENV`                  | `development`              |
    /// | `LOG_LEVEL`                | derived from `APP_ENV`     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `FRONTEND_URL`             | `http://localhost:5173`    |
    /// | `IDP_URL`                  | --                         |
    /// | `TENANT_DEFAULT_SLUG`      | `default`                  |
    /// | `TENANT_SUBDOMAIN_ROUTING` | `false`                    |
    /// | `ICS_BASE_URL`             | institutional feed root    |
    /// | `INGEST_RUN_IMMEDIATELY`   | `true`                     |
    /// | `DATABASE_URL`             | --                         |
    /// | `DB_HOST`                  | `localhost`                |
    /// | `DB_PORT`                  | `5432`                     |
    /// | `DB_USER`                  | `postgres`                 |
    /// | `DB_PASSWORD`              | --                         |
    /// | `DB_NAME`                  | `postgres`                 |
    /// | `DB_SSLMODE`               | `disable`                  |
    /// | `DB_TIMEZONE`              | `Europe/Berlin`            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let environment = match or("APP_ENV", "development").to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "production" | "prod" => Environment::Production,
            other => {
                return Err(ConfigError::Invalid {
                    var: "APP_ENV",
                    expected: "environment (development|production)",
                    value: other.to_string(),
                })
            }
        };

        let log_level = var("LOG_LEVEL");
        if let Some(level) = &log_level {
            if !matches!(
                level.to_lowercase().as_str(),
                "debug" | "info" | "warn" | "warning" | "error"
            ) {
                return Err(ConfigError::Invalid {
                    var: "LOG_LEVEL",
                    expected: "log level (debug|info|warning|error)",
                    value: level.clone(),
                });
            }
        }

        let cors_origins: Vec<String> = or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            if origin.parse::<axum::http::HeaderValue>().is_err() {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    expected: "origin list",
                    value: origin.clone(),
                });
            }
        }

        let database = DbSettings {
            url: var("DATABASE_URL"),
            host: or("DB_HOST", "localhost"),
            port: parse("DB_PORT", &or("DB_PORT", "5432"), "port number")?,
            user: or("DB_USER", "postgres"),
            password: var("DB_PASSWORD"),
            name: or("DB_NAME", "postgres"),
            sslmode: or("DB_SSLMODE", "disable"),
            timezone: or("DB_TIMEZONE", "Europe/Berlin"),
        };

        Ok(Self {
            host: or("HOST", "0.0.0.0"),
            port: parse("PORT", &or("PORT", "8000"), "port number")?,
            environment,
            log_level,
            cors_origins,
            request_timeout_secs: parse(
                "REQUEST_TIMEOUT_SECS",
                &or("REQUEST_TIMEOUT_SECS", "30"),
                "number of seconds",
            )?,
            frontend_url: or("FRONTEND_URL", "http://localhost:5173")
                .trim_end_matches('/')
                .to_string(),
            idp_url: var("IDP_URL").map(|u| u.trim_end_matches('/').to_string()),
            tenant: TenantConfig {
                default_slug: or("TENANT_DEFAULT_SLUG", "default"),
                subdomain_routing: parse_bool(
                    "TENANT_SUBDOMAIN_ROUTING",
                    &or("TENANT_SUBDOMAIN_ROUTING", "false"),
                )?,
            },
            ics_base_url: or("ICS_BASE_URL", DEFAULT_ICS_BASE_URL),
            ingest_run_immediately: parse_bool(
                "INGEST_RUN_IMMEDIATELY",
                &or("INGEST_RUN_IMMEDIATELY", "true"),
            )?,
            database,
        })
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> String {
        let level = match self.log_level.as_deref().map(str::to_lowercase) {
            Some(level) if level == "warning" => "warn".to_string(),
            Some(level) => level,
            None => match self.environment {
                Environment::Development => "debug".to_string(),
                Environment::Production => "info".to_string(),
            },
        };
        format!("campus_api={level},campus_pipeline={level},campus_db={level},tower_http={level}")
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "boolean",
            value: value.to_string(),
        }),
    }
}
