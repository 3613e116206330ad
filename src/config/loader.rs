//! Read settings from the process environment (after `.env`) or from any
//! key/value lookup.

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::fmt::Display;
use std::str::FromStr;

/// Load `.env` into the environment if present. A missing file is fine; a
/// malformed one is not.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Load(e.to_string())),
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from `lookup`, falling back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Settings::default();
        let settings = Settings {
            app_name: text(&lookup, "APP_NAME", d.app_name),
            app_version: text(&lookup, "APP_VERSION", d.app_version),
            debug: flag(&lookup, "DEBUG", d.debug)?,
            host: text(&lookup, "HOST", d.host),
            port: parsed(&lookup, "PORT", d.port)?,
            mongodb: MongoSettings {
                url: text(&lookup, "MONGODB_URL", d.mongodb.url),
                database: text(&lookup, "MONGODB_DATABASE", d.mongodb.database),
            },
            mysql: SqlSettings {
                host: text(&lookup, "MYSQL_HOST", d.mysql.host),
                port: parsed(&lookup, "MYSQL_PORT", d.mysql.port)?,
                user: text(&lookup, "MYSQL_USER", d.mysql.user),
                password: text(&lookup, "MYSQL_PASSWORD", d.mysql.password),
                database: text(&lookup, "MYSQL_DATABASE", d.mysql.database),
            },
            postgresql: SqlSettings {
                host: text(&lookup, "POSTGRESQL_HOST", d.postgresql.host),
                port: parsed(&lookup, "POSTGRESQL_PORT", d.postgresql.port)?,
                user: text(&lookup, "POSTGRESQL_USER", d.postgresql.user),
                password: text(&lookup, "POSTGRESQL_PASSWORD", d.postgresql.password),
                database: text(&lookup, "POSTGRESQL_DATABASE", d.postgresql.database),
            },
            pool: PoolSettings {
                min_connections: parsed(&lookup, "DB_POOL_MIN", d.pool.min_connections)?,
                max_connections: parsed(&lookup, "DB_POOL_MAX", d.pool.max_connections)?,
            },
            security: SecuritySettings {
                secret_key: text(&lookup, "SECRET_KEY", d.security.secret_key),
                algorithm: text(&lookup, "ALGORITHM", d.security.algorithm),
                access_token_expire_minutes: parsed(
                    &lookup,
                    "ACCESS_TOKEN_EXPIRE_MINUTES",
                    d.security.access_token_expire_minutes,
                )?,
            },
        };
        validate(&settings)?;
        Ok(settings)
    }
}

fn text<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: String) -> String {
    lookup(key).unwrap_or(default)
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn flag<F: Fn(&str) -> Option<String>>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected a boolean".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
        assert_eq!(settings.mysql.port, 3306);
        assert_eq!(settings.postgresql.user, "postgres");
    }

    #[test]
    fn overrides_are_applied() {
        let settings = Settings::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("DEBUG", "False"),
            ("MYSQL_HOST", "db.internal"),
            ("DB_POOL_MAX", "20"),
        ]))
        .unwrap();
        assert_eq!(settings.port, 9000);
        assert!(!settings.debug);
        assert_eq!(settings.mysql.host, "db.internal");
        assert_eq!(settings.pool.max_connections, 20);
        assert_eq!(settings.log_filter(), "multidb_api=info");
    }

    #[test]
    fn bad_number_names_the_key() {
        let err = Settings::from_lookup(lookup(&[("POSTGRESQL_PORT", "five")])).unwrap_err();
        match err {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(key, "POSTGRESQL_PORT");
                assert_eq!(value, "five");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_flag_is_rejected() {
        assert!(Settings::from_lookup(lookup(&[("DEBUG", "maybe")])).is_err());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let settings = Settings::from_lookup(lookup(&[
            ("MYSQL_PASSWORD", "hunter2"),
            ("SECRET_KEY", "s3cr3t"),
        ]))
        .unwrap();
        let shown = format!("{:?}", settings);
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("s3cr3t"));
        assert!(shown.contains("***"));
    }
}
