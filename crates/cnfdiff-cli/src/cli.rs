//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgMatches, Parser};
use cnfdiff_core::SourceKind;
use cnfdiff_sources::Dsn;

use crate::output::OutputFormat;

/// Compare MySQL configurations from option files, live servers and
/// defaults listings
///
/// Examples:
///   cnfdiff -c /etc/mysql/my.cnf -c backup/my.cnf
///   cnfdiff -c /etc/mysql/my.cnf -d h=db1,u=admin,p=secret
///   cnfdiff --defaults defaults.txt -c /etc/mysql/my.cnf -o pretty-json
#[derive(Parser, Debug)]
#[command(name = "cnfdiff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (default: <config dir>/cnfdiff/config.toml)
    #[arg(long, value_name = "FILE", env = "CNFDIFF_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Option file group to read (repeatable, default: mysqld)
    #[arg(short, long = "group", value_name = "NAME")]
    pub groups: Vec<String>,

    /// Keep option file names as written instead of using server spelling
    #[arg(long)]
    pub keep_names: bool,

    /// Option file to compare (repeatable)
    #[arg(short = 'c', long = "cnf", value_name = "FILE")]
    pub cnfs: Vec<PathBuf>,

    /// Live server to compare, as h=host,P=port,u=user,p=pass (repeatable)
    #[arg(short = 'd', long = "dsn", value_name = "DSN")]
    pub dsns: Vec<Dsn>,

    /// Output of `mysqld --verbose --help` to compare (repeatable)
    #[arg(long = "defaults", value_name = "FILE")]
    pub defaults: Vec<PathBuf>,
}

impl Cli {
    /// Number of sources requested on the command line
    pub fn source_count(&self) -> usize {
        self.cnfs.len() + self.dsns.len() + self.defaults.len()
    }
}

const FAMILIES: [(&str, SourceKind); 3] = [
    ("cnfs", SourceKind::File),
    ("dsns", SourceKind::Live),
    ("defaults", SourceKind::Defaults),
];

/// Order in which source families are loaded.
///
/// The family whose flag appears first supplies the comparison base. The
/// others follow in the fixed order file, live, defaults.
pub fn source_order(matches: &ArgMatches) -> Vec<SourceKind> {
    let base = FAMILIES
        .iter()
        .filter_map(|(id, kind)| matches.index_of(id).map(|index| (index, *kind)))
        .min_by_key(|(index, _)| *index)
        .map(|(_, kind)| kind);

    let mut order: Vec<SourceKind> = base.into_iter().collect();
    order.extend(
        FAMILIES
            .iter()
            .map(|(_, kind)| *kind)
            .filter(|kind| Some(*kind) != base),
    );
    order
}
