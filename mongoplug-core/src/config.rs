//! Connection configuration model and parsing.
//!
//! [`MongoConfig`] captures everything the bootstrapper needs to resolve a
//! live database handle: either a full connection string URI, or a
//! comma-separated server list plus a database name, with an optional
//! default write concern and an (inert, reserved) credential pair.
//!
//! Parsing is strict where it matters: a malformed server-list entry or
//! credential string fails the whole bootstrap with a
//! [`Configuration`](crate::error::MongoPlugError::Configuration) error
//! before any connection attempt. Write-concern names are the opposite:
//! an unrecognized name parses to `None` and is silently ignored.

use crate::error::{MongoPlugError, MongoPlugResult};

/// Database name used when neither the configuration nor the URI names one.
pub const DEFAULT_DATABASE: &str = "play";

/// Server list used when none is configured.
pub const DEFAULT_SERVERS: &str = "localhost";

/// Immutable connection configuration.
///
/// When `uri` is present it takes priority over the server-list settings.
/// `credentials` is parsed and validated but deliberately not applied to
/// the connection (reserved pending an intentional redesign of auth
/// handling).
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Full connection string; wins over `servers`/`database`.
    pub uri: Option<String>,
    /// Comma-separated `host[:port]` list; defaults to [`DEFAULT_SERVERS`].
    pub servers: Option<String>,
    /// Database name; defaults to [`DEFAULT_DATABASE`].
    pub database: Option<String>,
    /// Named write-concern constant; unrecognized names are ignored.
    pub default_write_concern: Option<String>,
    /// `username:password` pair; validated but currently inert.
    pub credentials: Option<String>,
    /// Disable switch for the whole integration.
    pub enabled: bool,
    /// When false, `dispose` leaves the shared client connection open.
    /// Useful for test harnesses that share one connection across runs.
    pub close_on_dispose: bool,
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: None,
            servers: None,
            database: None,
            default_write_concern: None,
            credentials: None,
            enabled: true,
            close_on_dispose: true,
        }
    }
}

impl MongoConfig {
    /// Loads configuration from `MONGODB_*` environment variables.
    ///
    /// Recognized variables: `MONGODB_URI`, `MONGODB_SERVERS`,
    /// `MONGODB_DATABASE`, `MONGODB_DEFAULT_WRITE_CONCERN`,
    /// `MONGODB_CREDENTIALS`, `MONGODB_ENABLED`, `MONGODB_CLOSE_ON_DISPOSE`.
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.is_empty())
        }

        MongoConfig {
            uri: var("MONGODB_URI"),
            servers: var("MONGODB_SERVERS"),
            database: var("MONGODB_DATABASE"),
            default_write_concern: var("MONGODB_DEFAULT_WRITE_CONCERN"),
            credentials: var("MONGODB_CREDENTIALS"),
            enabled: var("MONGODB_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            close_on_dispose: var("MONGODB_CLOSE_ON_DISPOSE")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    /// The configured database name, or [`DEFAULT_DATABASE`].
    pub fn database_or_default(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    /// The configured server list, or [`DEFAULT_SERVERS`].
    pub fn servers_or_default(&self) -> &str {
        self.servers.as_deref().unwrap_or(DEFAULT_SERVERS)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

/// One parsed `host[:port]` server-list entry. A missing port defers to the
/// driver's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub host: String,
    pub port: Option<u16>,
}

/// Parses a comma-separated `host[:port]` server list, preserving order.
///
/// Any malformed entry (empty host, empty entry, non-numeric or
/// out-of-range port) fails the whole parse; there is no silent skip.
pub fn parse_server_list(list: &str) -> MongoPlugResult<Vec<ServerEntry>> {
    list.split(',')
        .map(|raw| {
            let entry = raw.trim();
            if entry.is_empty() {
                log::error!("empty entry in server list `{list}`");
                return Err(MongoPlugError::Configuration(format!(
                    "empty entry in server list `{list}`"
                )));
            }
            match entry.split_once(':') {
                None => Ok(ServerEntry {
                    host: entry.to_string(),
                    port: None,
                }),
                Some((host, port)) if !host.is_empty() => {
                    let port = port.parse::<u16>().map_err(|_| {
                        log::error!("invalid port `{port}` in server entry `{entry}`");
                        MongoPlugError::Configuration(format!(
                            "invalid port `{port}` in server entry `{entry}`"
                        ))
                    })?;
                    Ok(ServerEntry {
                        host: host.to_string(),
                        port: Some(port),
                    })
                }
                Some(_) => {
                    log::error!("missing host in server entry `{entry}`");
                    Err(MongoPlugError::Configuration(format!(
                        "missing host in server entry `{entry}`"
                    )))
                }
            }
        })
        .collect()
}

/// A named write-concern policy, mirroring the driver's named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConcernPolicy {
    Acknowledged,
    Unacknowledged,
    Journaled,
    Majority,
    Nodes(u32),
}

/// Resolves a named write-concern constant, case-insensitively.
///
/// Returns `None` for unrecognized names; the bootstrapper treats that as
/// "no default write concern", never as an error.
pub fn parse_write_concern(name: &str) -> Option<WriteConcernPolicy> {
    match name.trim().to_ascii_uppercase().as_str() {
        "ACKNOWLEDGED" => Some(WriteConcernPolicy::Acknowledged),
        "UNACKNOWLEDGED" => Some(WriteConcernPolicy::Unacknowledged),
        "JOURNALED" => Some(WriteConcernPolicy::Journaled),
        "MAJORITY" => Some(WriteConcernPolicy::Majority),
        "W1" => Some(WriteConcernPolicy::Nodes(1)),
        "W2" => Some(WriteConcernPolicy::Nodes(2)),
        "W3" => Some(WriteConcernPolicy::Nodes(3)),
        _ => None,
    }
}

/// A parsed `username:password` credential pair.
///
/// Validated at bootstrap but not applied to the connection; the field is
/// reserved until credential application is intentionally enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Parses a `username:password` pair. The username must be non-empty; the
/// password may be empty.
pub fn parse_credentials(raw: &str) -> MongoPlugResult<Credentials> {
    match raw.split_once(':') {
        Some((username, password)) if !username.is_empty() => Ok(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }),
        _ => {
            log::error!("malformed credentials; expected `username:password`");
            Err(MongoPlugError::Configuration(
                "malformed credentials; expected `username:password`".to_string(),
            ))
        }
    }
}
