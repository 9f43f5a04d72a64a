//! Storage configuration.
//!
//! The backend implementation is selected once, at process start, and the
//! resulting store handle is passed into services at construction. Domain
//! services never branch on the backend type.

use std::path::PathBuf;

/// Environment variable selecting the storage backend (`sqlite` or `json`).
pub const STORAGE_BACKEND_ENV: &str = "HOMEBUDGET_STORAGE";

/// Environment variable overriding the data location (a database file for
/// the SQLite backend, a directory for the JSON document backend).
pub const DATA_PATH_ENV: &str = "HOMEBUDGET_DATA_PATH";

const DEFAULT_SQLITE_PATH: &str = "homebudget.db";
const DEFAULT_JSON_DIR: &str = "homebudget_data";

/// Which storage engine backs the entity store, and where its data lives.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    /// Relational backend: a single SQLite database file.
    Sqlite { path: PathBuf },
    /// Document backend: one JSON collection file per entity type.
    Json { dir: PathBuf },
}

impl StorageConfig {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        StorageConfig::Sqlite { path: path.into() }
    }

    pub fn json(dir: impl Into<PathBuf>) -> Self {
        StorageConfig::Json { dir: dir.into() }
    }

    /// Read the backend selection from the environment, defaulting to the
    /// SQLite backend with a database file in the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var(DATA_PATH_ENV).ok();
        match std::env::var(STORAGE_BACKEND_ENV).as_deref() {
            Ok("json") => StorageConfig::json(path.unwrap_or_else(|| DEFAULT_JSON_DIR.to_string())),
            _ => StorageConfig::sqlite(path.unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_constructors() {
        assert_eq!(
            StorageConfig::sqlite("a.db"),
            StorageConfig::Sqlite { path: PathBuf::from("a.db") }
        );
        assert_eq!(
            StorageConfig::json("data"),
            StorageConfig::Json { dir: PathBuf::from("data") }
        );
    }
}
