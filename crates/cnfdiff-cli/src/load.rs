//! Loading the sources named on the command line

use std::time::Duration;

use cnfdiff_core::{CanonicalConfig, SourceKind};
use cnfdiff_sources::{Dsn, read_cnf, read_defaults, read_live_with_timeout};
use tracing::debug;

use crate::cli::Cli;
use crate::error::Result;
use crate::settings::Settings;

/// Read every requested source, family by family in `order`.
///
/// Within a family, sources keep their command-line order.
pub fn load_sources(
    cli: &Cli,
    order: &[SourceKind],
    settings: &Settings,
) -> Result<Vec<CanonicalConfig>> {
    let mut configs = Vec::with_capacity(cli.source_count());

    for kind in order {
        match kind {
            SourceKind::File => {
                let options = settings.cnf_options();
                for path in &cli.cnfs {
                    configs.push(read_cnf(path, &options)?);
                }
            }
            SourceKind::Live => {
                if !cli.dsns.is_empty() {
                    configs.extend(load_live(&cli.dsns, settings)?);
                }
            }
            SourceKind::Defaults => {
                for path in &cli.defaults {
                    configs.push(read_defaults(path)?);
                }
            }
        }
    }

    for config in &configs {
        debug!(
            kind = %config.kind(),
            origin = config.origin().unwrap_or("-"),
            entries = config.len(),
            "Source loaded"
        );
    }

    Ok(configs)
}

/// Query each server in turn on a single-threaded runtime
fn load_live(dsns: &[Dsn], settings: &Settings) -> Result<Vec<CanonicalConfig>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(read_live_all(dsns, settings.connect_timeout()))
}

async fn read_live_all(dsns: &[Dsn], timeout: Duration) -> Result<Vec<CanonicalConfig>> {
    let mut configs = Vec::with_capacity(dsns.len());
    for dsn in dsns {
        configs.push(read_live_with_timeout(dsn, timeout).await?);
    }
    Ok(configs)
}
