//! Settings validation: values that parse but cannot work.

use crate::config::Settings;
use crate::error::ConfigError;

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let pool = &settings.pool;
    if pool.min_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "DB_POOL_MIN",
            value: pool.min_connections.to_string(),
            reason: "must be at least 1".into(),
        });
    }
    if pool.min_connections > pool.max_connections {
        return Err(ConfigError::Invalid {
            key: "DB_POOL_MAX",
            value: pool.max_connections.to_string(),
            reason: format!("must not be below DB_POOL_MIN ({})", pool.min_connections),
        });
    }
    for (key, value) in [
        ("MONGODB_DATABASE", &settings.mongodb.database),
        ("MYSQL_DATABASE", &settings.mysql.database),
        ("POSTGRESQL_DATABASE", &settings.postgresql.database),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key,
                value: value.clone(),
                reason: "database name required".into(),
            });
        }
    }
    Ok(())
}
