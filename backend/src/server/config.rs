//! HTTP server configuration object and helpers.

use std::env;
use std::io;
use std::net::SocketAddr;

use backend::domain::DiagnosticsMode;
use backend::outbound::persistence::DbPool;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Environment variable naming the PostgreSQL connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable overriding the listen address.
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";
/// Environment variable holding the bearer-token signing secret.
pub const TOKEN_SECRET_VAR: &str = "TOKEN_SECRET";
/// Environment variable selecting the diagnostics mode (`verbose` or
/// anything else for redacted).
pub const DIAGNOSTICS_VAR: &str = "CURBSIDE_DIAGNOSTICS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings resolved from the process environment before any I/O happens.
#[derive(Debug)]
pub struct AppSettings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub token_secret: Zeroizing<String>,
    pub diagnostics: DiagnosticsMode,
}

impl AppSettings {
    /// Resolve settings from the environment.
    ///
    /// `DATABASE_URL` is required. `TOKEN_SECRET` is required in release
    /// builds; debug builds fall back to an ephemeral secret so local
    /// development works without one, at the cost of tokens not surviving a
    /// restart.
    ///
    /// # Errors
    /// Returns [`io::Error`] when a required variable is missing or the bind
    /// address does not parse.
    pub fn from_env() -> io::Result<Self> {
        let database_url = env::var(DATABASE_URL_VAR).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{DATABASE_URL_VAR} must be set"),
            )
        })?;
        if database_url.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{DATABASE_URL_VAR} must not be empty"),
            ));
        }

        let bind_addr = env::var(BIND_ADDR_VAR)
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|error| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{BIND_ADDR_VAR} is not a valid socket address: {error}"),
                )
            })?;

        let token_secret = match env::var(TOKEN_SECRET_VAR) {
            Ok(secret) if !secret.trim().is_empty() => Zeroizing::new(secret),
            _ if cfg!(debug_assertions) => {
                warn!("using ephemeral token secret (dev only); tokens will not survive restart");
                Zeroizing::new(format!(
                    "{}{}",
                    Uuid::new_v4().simple(),
                    Uuid::new_v4().simple()
                ))
            }
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{TOKEN_SECRET_VAR} must be set"),
                ));
            }
        };

        let diagnostics =
            DiagnosticsMode::from_config_value(env::var(DIAGNOSTICS_VAR).ok().as_deref());

        Ok(Self {
            database_url,
            bind_addr,
            token_secret,
            diagnostics,
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) token_secret: Zeroizing<String>,
}

impl ServerConfig {
    /// Construct a server configuration from resolved settings and a pool.
    #[must_use]
    pub fn new(settings: &AppSettings, db_pool: DbPool) -> Self {
        Self {
            bind_addr: settings.bind_addr,
            db_pool,
            token_secret: settings.token_secret.clone(),
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
