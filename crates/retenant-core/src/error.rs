//! Migration error type

use retenant_client::ClientError;
use retenant_map::MapError;

/// Errors that abort a migration run
///
/// There is no retry layer: remote failures and sequencing errors both
/// propagate straight out of the command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// An `--include`/`--exclude` pattern failed to compile
    #[error("invalid {flag} pattern: {source}")]
    InvalidFilter {
        /// Flag the pattern came from
        flag: &'static str,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A lookup was attempted on a map that still has missing entities
    #[error(transparent)]
    Map(#[from] MapError),

    /// The remote repository rejected or failed an operation
    #[error(transparent)]
    Client(#[from] ClientError),
}
