//! PostgreSQL persistence: connection pool, migrations, row models, and
//! repositories.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Upper bound on open connections.
const MAX_CONNECTIONS: u32 = 100;

/// Idle connections above zero are closed after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Connections are recycled after this long.
const MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// Prepared statements cached per connection.
const STATEMENT_CACHE_CAPACITY: usize = 256;

/// Store connection settings.
#[derive(Debug, Clone)]
pub struct DbSettings {
    /// A full connection string. When set, the discrete fields below are
    /// ignored except for `timezone`.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub sslmode: String,
    pub timezone: String,
}

impl DbSettings {
    /// Build connection options for these settings.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)?,
            None => {
                let ssl_mode = PgSslMode::from_str(&self.sslmode)?;
                let mut options = PgConnectOptions::new()
                    .host(&self.host)
                    .port(self.port)
                    .username(&self.user)
                    .database(&self.name)
                    .ssl_mode(ssl_mode);
                if let Some(password) = &self.password {
                    options = options.password(password);
                }
                options
            }
        };

        Ok(options
            .options([("timezone", self.timezone.as_str())])
            .statement_cache_capacity(STATEMENT_CACHE_CAPACITY))
    }
}

/// Create a connection pool.
pub async fn create_pool(settings: &DbSettings) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect_with(settings.connect_options()?)
        .await
}

/// Verify the database answers queries.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DbSettings {
        DbSettings {
            url: None,
            host: "db.internal".to_string(),
            port: 5433,
            user: "campus".to_string(),
            password: Some("secret".to_string()),
            name: "campus".to_string(),
            sslmode: "disable".to_string(),
            timezone: "Europe/Berlin".to_string(),
        }
    }

    #[test]
    fn discrete_settings_build_options() {
        let options = settings().connect_options().unwrap();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_username(), "campus");
        assert_eq!(options.get_database(), Some("campus"));
    }

    #[test]
    fn url_overrides_discrete_settings() {
        let mut s = settings();
        s.url = Some("postgres://other@elsewhere:6000/otherdb".to_string());
        let options = s.connect_options().unwrap();
        assert_eq!(options.get_host(), "elsewhere");
        assert_eq!(options.get_port(), 6000);
    }

    #[test]
    fn invalid_sslmode_is_rejected() {
        let mut s = settings();
        s.sslmode = "sometimes".to_string();
        assert!(s.connect_options().is_err());
    }
}
