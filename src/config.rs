// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and is
//! immutable afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret for token signatures | Required |
//! | `BCRYPT_SALT_ROUNDS` | bcrypt cost for the token identity hash | `10` |
//! | `JWT_EXPIRY_DAYS` | Token lifetime in days | `1` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DB_PATH` | redb database file | `{APP_NAME}.redb` |
//! | `APP_NAME` | Application name (default database file name) | `portal` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::AuthSettings;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const BCRYPT_SALT_ROUNDS_ENV: &str = "BCRYPT_SALT_ROUNDS";
pub const JWT_EXPIRY_DAYS_ENV: &str = "JWT_EXPIRY_DAYS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DB_PATH_ENV: &str = "DB_PATH";
pub const APP_NAME_ENV: &str = "APP_NAME";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_EXPIRY_DAYS: u32 = 1;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_APP_NAME: &str = "portal";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthSettings,
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let cost = parse_or(&lookup, BCRYPT_SALT_ROUNDS_ENV, DEFAULT_BCRYPT_COST)?;
        let validity_days = parse_or(&lookup, JWT_EXPIRY_DAYS_ENV, DEFAULT_EXPIRY_DAYS)?;

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: host,
            })?;

        let db_path = match lookup(DB_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => {
                let app_name =
                    lookup(APP_NAME_ENV).unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
                PathBuf::from(format!("{app_name}.redb"))
            }
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            auth: AuthSettings::new(secret, cost, validity_days),
            bind_addr,
            db_path,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(JWT_SECRET_ENV, "s3cr3t")]).unwrap();
        assert_eq!(config.auth.secret, b"s3cr3t");
        assert_eq!(config.auth.cost, DEFAULT_BCRYPT_COST);
        assert_eq!(config.auth.validity_days, DEFAULT_EXPIRY_DAYS);
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.db_path, PathBuf::from("portal.redb"));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV))));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "")]),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        ));
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            (JWT_SECRET_ENV, "s3cr3t"),
            (BCRYPT_SALT_ROUNDS_ENV, "4"),
            (JWT_EXPIRY_DAYS_ENV, "7"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (LOG_FORMAT_ENV, "json"),
            (APP_NAME_ENV, "ignored"),
            (DB_PATH_ENV, "/tmp/users.redb"),
        ])
        .unwrap();
        assert_eq!(config.auth.cost, 4);
        assert_eq!(config.auth.validity_days, 7);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.db_path, PathBuf::from("/tmp/users.redb"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn app_name_picks_default_database_file() {
        let config = load(&[(JWT_SECRET_ENV, "s"), (APP_NAME_ENV, "crm")]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("crm.redb"));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let err = load(&[(JWT_SECRET_ENV, "s"), (JWT_EXPIRY_DAYS_ENV, "-1")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: JWT_EXPIRY_DAYS_ENV,
                ..
            }
        ));

        let err = load(&[(JWT_SECRET_ENV, "s"), (BCRYPT_SALT_ROUNDS_ENV, "ten")]).unwrap_err();
        assert!(err.to_string().contains(BCRYPT_SALT_ROUNDS_ENV));
    }

    #[test]
    fn unknown_log_format_is_an_error() {
        assert!(load(&[(JWT_SECRET_ENV, "s"), (LOG_FORMAT_ENV, "xml")]).is_err());
    }
}
