//! One module per subcommand.

pub mod author;
pub mod bench;
pub mod build;
pub mod query;
pub mod stats;
