//! Runtime settings. Plain data; see `loader` for how they are read.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            min_connections: 1,
            max_connections: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoSettings {
    pub url: String,
    pub database: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        MongoSettings {
            url: "mongodb://localhost:27017".into(),
            database: "app_db".into(),
        }
    }
}

/// Connection parameters shared by MySQL and PostgreSQL.
#[derive(Clone, PartialEq, Eq)]
pub struct SqlSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl SqlSettings {
    pub fn mysql_default() -> Self {
        SqlSettings {
            host: "localhost".into(),
            port: 3306,
            user: "root".into(),
            password: "password".into(),
            database: "app_db".into(),
        }
    }

    pub fn postgres_default() -> Self {
        SqlSettings {
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: "password".into(),
            database: "app_db".into(),
        }
    }
}

impl fmt::Debug for SqlSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Token settings. Loaded for parity with deployments that set them; nothing
/// reads them yet.
#[derive(Clone, PartialEq, Eq)]
pub struct SecuritySettings {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: u32,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        SecuritySettings {
            secret_key: "your-secret-key-here".into(),
            algorithm: "HS256".into(),
            access_token_expire_minutes: 30,
        }
    }
}

impl fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("secret_key", &"***")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub mongodb: MongoSettings,
    pub mysql: SqlSettings,
    pub postgresql: SqlSettings,
    pub pool: PoolSettings,
    pub security: SecuritySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            app_name: "Multi-Database API".into(),
            app_version: "1.0.0".into(),
            debug: true,
            host: "0.0.0.0".into(),
            port: 8000,
            mongodb: MongoSettings::default(),
            mysql: SqlSettings::mysql_default(),
            postgresql: SqlSettings::postgres_default(),
            pool: PoolSettings::default(),
            security: SecuritySettings::default(),
        }
    }
}

impl Settings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "multidb_api=debug,tower_http=debug"
        } else {
            "multidb_api=info"
        }
    }
}
