//! Readers that turn configuration sources into [`CanonicalConfig`] snapshots
//!
//! - [`cnf`] - MySQL option files (`my.cnf`)
//! - [`defaults`] - the listing printed by `mysqld --verbose --help`
//! - [`live`] - `SHOW GLOBAL VARIABLES` on a running server
//! - [`dsn`] - `h=host,P=port,...` connection strings for [`live`]
//!
//! [`CanonicalConfig`]: cnfdiff_core::CanonicalConfig

pub mod cnf;
pub mod defaults;
pub mod dsn;
pub mod error;
pub mod live;
pub mod path;

pub use cnf::{CnfOptions, parse_cnf, read_cnf};
pub use defaults::{parse_defaults, read_defaults};
pub use dsn::{Dsn, Transport};
pub use error::{Error, Result};
pub use live::{read_live, read_live_with_timeout};
