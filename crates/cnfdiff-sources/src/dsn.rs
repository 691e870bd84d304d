//! Percona toolkit style DSNs
//!
//! A DSN is a comma-separated list of `key=value` parts:
//!
//! | key | meaning         |
//! |-----|-----------------|
//! | `h` | host            |
//! | `P` | port            |
//! | `u` | user            |
//! | `p` | password        |
//! | `D` | database        |
//! | `t` | table           |
//! | `S` | socket file     |
//!
//! `h=localhost` connects through the Unix socket, like the MySQL client.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_SOCKET: &str = "/var/run/mysqld/mysqld.sock";
const DEFAULT_HOST: &str = "localhost";

/// How to reach the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Tcp { host: String, port: u16 },
    Unix { socket: PathBuf },
}

/// Parsed connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    pub transport: Transport,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub table: Option<String>,
}

impl Dsn {
    /// Connection options for `sqlx`
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new();
        options = match &self.transport {
            Transport::Tcp { host, port } => options.host(host).port(*port),
            Transport::Unix { socket } => options.socket(socket),
        };
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if let Some(database) = &self.database {
            options = options.database(database);
        }
        options
    }
}

impl FromStr for Dsn {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut host = None;
        let mut port = None;
        let mut socket = None;
        let mut dsn = Dsn {
            transport: Transport::Tcp {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            user: None,
            password: None,
            database: None,
            table: None,
        };

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                return Err(Error::invalid_dsn(
                    redact(s),
                    format!("expected key=value, got '{part}'"),
                ));
            };
            let value = value.to_string();
            match key {
                "h" => host = Some(value),
                "P" => {
                    let parsed = value.parse::<u16>().map_err(|_| {
                        Error::invalid_dsn(redact(s), format!("invalid port '{value}'"))
                    })?;
                    port = Some(parsed);
                }
                "S" => socket = Some(PathBuf::from(value)),
                "u" => dsn.user = Some(value),
                "p" => dsn.password = Some(value),
                "D" => dsn.database = Some(value),
                "t" => dsn.table = Some(value),
                _ => {
                    return Err(Error::invalid_dsn(
                        redact(s),
                        format!("unknown key '{key}'"),
                    ));
                }
            }
        }

        dsn.transport = match (host, socket) {
            (Some(host), socket) if host == "localhost" => Transport::Unix {
                socket: socket.unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET)),
            },
            (None, Some(socket)) => Transport::Unix { socket },
            (host, _) => Transport::Tcp {
                host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: port.unwrap_or(DEFAULT_PORT),
            },
        };

        Ok(dsn)
    }
}

impl fmt::Display for Dsn {
    /// Never includes the password
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(user) = &self.user {
            write!(f, "{user}@")?;
        }
        match &self.transport {
            Transport::Tcp { host, port } => write!(f, "tcp({host}:{port})")?,
            Transport::Unix { socket } => write!(f, "unix({})", socket.display())?,
        }
        if let Some(database) = &self.database {
            write!(f, "/{database}")?;
        }
        Ok(())
    }
}

/// Mask the password part of a raw DSN for error messages
fn redact(raw: &str) -> String {
    raw.split(',')
        .map(|part| {
            if part.trim_start().starts_with("p=") {
                "p=***"
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
