// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and is
//! read-only afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_ENV` | `development` or `production` | `development` |
//! | `JWT_SECRET` | Credential secret for session tokens | Required for production |
//! | `JWT_ISSUER` | Issuer claim of session tokens | `fansly-api` |
//! | `SESSION_TTL_SECS` | Session credential lifetime | `86400` |
//! | `AUTH_CODE_TTL_SECS` | Pending auth code lifetime | `600` |
//! | `AUTH_CODE_SWEEP_SECS` | Expired code purge interval (`0` disables) | `300` |
//! | `UPSTREAM_SECURITY_URL` | Page where users find their platform token | `https://fansly.com/account/security` |
//! | `API_KEYS` | Comma-separated accepted API keys | Any non-empty key |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM certificate and key for HTTPS | Plain HTTP |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;
use url::Url;

use crate::auth::pending::DEFAULT_CODE_TTL_SECS;
use crate::auth::session::{DEFAULT_ISSUER, DEFAULT_SESSION_TTL_SECS};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const SESSION_TTL_ENV: &str = "SESSION_TTL_SECS";
pub const AUTH_CODE_TTL_ENV: &str = "AUTH_CODE_TTL_SECS";
pub const AUTH_CODE_SWEEP_ENV: &str = "AUTH_CODE_SWEEP_SECS";
pub const UPSTREAM_SECURITY_URL_ENV: &str = "UPSTREAM_SECURITY_URL";
pub const API_KEYS_ENV: &str = "API_KEYS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SWEEP_SECS: u64 = 300;
const DEFAULT_UPSTREAM_SECURITY_URL: &str = "https://fansly.com/account/security";

/// Upper bound for any configured lifetime (one year).
const MAX_TTL_SECS: i64 = 366 * 24 * 60 * 60;

/// Length of the generated development secret.
const DEV_SECRET_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is required in production")]
    MissingSecret,
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{name} must be between 1 second and one year")]
    TtlOutOfRange { name: &'static str },
    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
    #[error("failed to generate a development secret")]
    SecretGeneration,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Certificate and key for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub jwt_secret: Option<String>,
    pub jwt_issuer: String,
    pub session_ttl_secs: i64,
    pub auth_code_ttl_secs: i64,
    /// `0` disables the background purge.
    pub sweep_interval_secs: u64,
    pub upstream_security_url: Url,
    pub api_keys: Option<Vec<String>>,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::Development,
            jwt_secret: None,
            jwt_issuer: DEFAULT_ISSUER.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            auth_code_ttl_secs: DEFAULT_CODE_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_SECS,
            upstream_security_url: default_upstream_url(),
            api_keys: None,
            tls: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let environment = match get(APP_ENV_ENV) {
            Some(value) => Environment::parse(&value).ok_or(ConfigError::InvalidValue {
                name: APP_ENV_ENV,
                value,
            })?,
            None => defaults.environment,
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) if v == "pretty" => LogFormat::Pretty,
            Some(value) => {
                return Err(ConfigError::InvalidValue {
                    name: LOG_FORMAT_ENV,
                    value,
                })
            }
            None => defaults.log_format,
        };

        let upstream_security_url = match get(UPSTREAM_SECURITY_URL_ENV) {
            Some(value) => Url::parse(&value).map_err(|_| ConfigError::InvalidValue {
                name: UPSTREAM_SECURITY_URL_ENV,
                value,
            })?,
            None => defaults.upstream_security_url,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let api_keys = get(API_KEYS_ENV).map(|keys| {
            keys.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let config = Self {
            host: get(HOST_ENV).unwrap_or(defaults.host),
            port: parse_or(get(PORT_ENV), PORT_ENV, defaults.port)?,
            environment,
            jwt_secret: get(JWT_SECRET_ENV),
            jwt_issuer: get(JWT_ISSUER_ENV).unwrap_or(defaults.jwt_issuer),
            session_ttl_secs: parse_or(get(SESSION_TTL_ENV), SESSION_TTL_ENV, defaults.session_ttl_secs)?,
            auth_code_ttl_secs: parse_or(
                get(AUTH_CODE_TTL_ENV),
                AUTH_CODE_TTL_ENV,
                defaults.auth_code_ttl_secs,
            )?,
            sweep_interval_secs: parse_or(
                get(AUTH_CODE_SWEEP_ENV),
                AUTH_CODE_SWEEP_ENV,
                defaults.sweep_interval_secs,
            )?,
            upstream_security_url,
            api_keys,
            tls,
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment == Environment::Production && self.jwt_secret.is_none() {
            return Err(ConfigError::MissingSecret);
        }
        check_ttl(self.session_ttl_secs, SESSION_TTL_ENV)?;
        check_ttl(self.auth_code_ttl_secs, AUTH_CODE_TTL_ENV)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Parse the bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidValue {
            name: HOST_ENV,
            value: addr,
        })
    }

    /// Resolve the credential secret.
    ///
    /// Returns the configured secret, or outside production a random
    /// per-process secret. The flag is `true` when the secret was generated.
    pub fn credential_secret(&self) -> Result<(Vec<u8>, bool), ConfigError> {
        if let Some(secret) = &self.jwt_secret {
            return Ok((secret.as_bytes().to_vec(), false));
        }
        if self.is_production() {
            return Err(ConfigError::MissingSecret);
        }

        let mut secret = vec![0u8; DEV_SECRET_BYTES];
        SystemRandom::new()
            .fill(&mut secret)
            .map_err(|_| ConfigError::SecretGeneration)?;
        Ok((secret, true))
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

fn check_ttl(secs: i64, name: &'static str) -> Result<(), ConfigError> {
    if (1..=MAX_TTL_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(ConfigError::TtlOutOfRange { name })
    }
}

fn default_upstream_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_SECURITY_URL).expect("default upstream URL is valid")
}
