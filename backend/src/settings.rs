//! Application settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags and `USER_RECORDS_*` environment
//! variables; unset values fall back to the defaults below.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_COLLECTION: &str = "users";

/// Settings rejected after loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("bind address {value:?} is invalid: {source}")]
    InvalidBindAddr {
        /// Rejected input.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },
    /// `collection` is empty or contains `/`.
    #[error("collection name {value:?} must be non-empty and must not contain '/'")]
    InvalidCollection {
        /// Rejected input.
        value: String,
    },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_RECORDS")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Document collection holding user records.
    pub collection: Option<String>,
}

impl AppSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Configured collection name, falling back to `users`.
    pub fn collection(&self) -> Result<&str, SettingsError> {
        let name = self.collection.as_deref().unwrap_or(DEFAULT_COLLECTION);
        if name.trim().is_empty() || name.contains('/') {
            return Err(SettingsError::InvalidCollection {
                value: name.to_owned(),
            });
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("user-records")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("USER_RECORDS_BIND_ADDR", None::<String>),
            ("USER_RECORDS_COLLECTION", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal parses")
        );
        assert_eq!(settings.collection().expect("default is valid"), "users");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("USER_RECORDS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("USER_RECORDS_COLLECTION", Some("staff".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal parses")
        );
        assert_eq!(settings.collection().expect("override is valid"), "staff");
    }

    #[rstest]
    #[case("localhost")]
    #[case("8080")]
    fn malformed_bind_addresses_are_rejected(#[case] raw: &str) {
        let settings = AppSettings {
            bind_addr: Some(raw.to_owned()),
            collection: None,
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
    }

    #[rstest]
    #[case("")]
    #[case("users/archive")]
    fn malformed_collections_are_rejected(#[case] raw: &str) {
        let settings = AppSettings {
            bind_addr: None,
            collection: Some(raw.to_owned()),
        };
        assert!(matches!(
            settings.collection(),
            Err(SettingsError::InvalidCollection { .. })
        ));
    }
}
