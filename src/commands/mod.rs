//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components and hold no aggregation logic.

pub mod ingest;
pub mod models;
pub mod query;
pub mod utils;

// Re-export main command functions
pub use ingest::{execute_ingest, validate_args};
pub use models::{IngestArgs, IngestSummary};
pub use query::{execute_list, execute_player, execute_show, parse_since};
pub use utils::{display_schema, display_version};
