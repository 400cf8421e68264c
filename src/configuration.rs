use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use axum::http::Uri;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8888;
const DEFAULT_DATABASE_PATH: &str = "demo_questionnaires.db";

#[derive(Error, Debug)]
pub(crate) enum ConfigurationError {
    #[error("Error parsing HOST \"{value}\": {source}")]
    BadHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("Error parsing PORT \"{value}\": {source}")]
    BadPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Error parsing SERVER_URL \"{value}\": {source}")]
    BadServerUrl {
        value: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
}

/// Where the questionnaire table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DatabaseLocation {
    Local(PathBuf),
    Remote { url: String, auth_token: String },
}

#[derive(Debug, Clone)]
pub(crate) struct Configuration {
    pub(crate) listen_address: SocketAddr,
    /// Base of the invitation links handed out to au pairs
    pub(crate) server_url: Uri,
    pub(crate) database: DatabaseLocation,
}

impl Configuration {
    pub(crate) fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigurationError> {
        let host = match lookup("HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|source| ConfigurationError::BadHost { value, source })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|source| ConfigurationError::BadPort { value, source })?,
            None => DEFAULT_PORT,
        };

        let server_url = lookup("SERVER_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let server_url = server_url
            .parse::<Uri>()
            .map_err(|source| ConfigurationError::BadServerUrl {
                value: server_url.clone(),
                source,
            })?;

        let database = match lookup("TURSO_DATABASE_URL") {
            Some(url) => DatabaseLocation::Remote {
                url,
                auth_token: lookup("TURSO_AUTH_TOKEN").unwrap_or_default(),
            },
            None => DatabaseLocation::Local(
                lookup("DATABASE_PATH")
                    .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_owned())
                    .into(),
            ),
        };

        Ok(Self {
            listen_address: SocketAddr::new(host, port),
            server_url,
            database,
        })
    }
}
