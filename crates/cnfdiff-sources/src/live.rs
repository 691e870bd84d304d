//! Reader for the variables of a running server

use std::time::Duration;

use cnfdiff_core::{CanonicalConfig, ConfigValue, SourceKind};
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Connection, Executor, Row};
use tracing::{debug, warn};

use crate::dsn::Dsn;
use crate::error::{Error, Result};

/// Sent as a plain text query; the server does not prepare `SHOW` statements
const SHOW_VARIABLES: &str = "SHOW GLOBAL VARIABLES";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Snapshot the global variables of the server behind `dsn`.
pub async fn read_live(dsn: &Dsn) -> Result<CanonicalConfig> {
    read_live_with_timeout(dsn, DEFAULT_CONNECT_TIMEOUT).await
}

/// Like [`read_live`] with an explicit connect timeout.
///
/// The connection is closed before returning, also when the query fails.
pub async fn read_live_with_timeout(dsn: &Dsn, timeout: Duration) -> Result<CanonicalConfig> {
    let target = dsn.to_string();
    debug!(target = %target, "Connecting to server");

    let mut conn = match tokio::time::timeout(
        timeout,
        MySqlConnection::connect_with(&dsn.connect_options()),
    )
    .await
    {
        Ok(Ok(conn)) => conn,
        Ok(Err(source)) => return Err(Error::Connect { target, source }),
        Err(_) => return Err(Error::ConnectTimeout { target, timeout }),
    };

    let rows = fetch_variables(&mut conn).await;

    if let Err(e) = conn.close().await {
        warn!(target = %target, error = %e, "Failed to close server connection");
    }

    let rows = rows.map_err(|source| Error::Query {
        target: target.clone(),
        source,
    })?;

    debug!(target = %target, entries = rows.len(), "Loaded server variables");
    Ok(from_rows(rows).with_origin(target))
}

async fn fetch_variables(
    conn: &mut MySqlConnection,
) -> sqlx::Result<Vec<(String, Option<String>)>> {
    let rows: Vec<MySqlRow> = conn.fetch_all(SHOW_VARIABLES).await?;
    rows.iter()
        .map(|row| {
            Ok((
                row.try_get_unchecked::<String, _>(0)?,
                row.try_get_unchecked::<Option<String>, _>(1)?,
            ))
        })
        .collect()
}

/// Build a live snapshot from `(name, value)` rows.
///
/// `NULL` values become empty strings.
pub fn from_rows<I>(rows: I) -> CanonicalConfig
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    CanonicalConfig::from_entries(
        SourceKind::Live,
        rows.into_iter()
            .map(|(name, value)| (name, ConfigValue::Text(value.unwrap_or_default()))),
    )
}
