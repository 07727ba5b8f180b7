use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "expertise",
    about = "Rank the authors of a document corpus as experts for a free-text query",
    version
)]
pub struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate a JSONL corpus and build author and entity statistics
    Build {
        /// JSONL files, one paper per line
        #[arg(long, required = true, num_args = 1..)]
        corpus: Vec<PathBuf>,

        /// Remove existing statistics before building
        #[arg(long)]
        erase: bool,
    },

    /// Rank experts for one query
    Query {
        /// Free-text query
        text: String,

        /// Scoring plan as JSON; the configured plan is used when omitted
        ///
        /// Either a list of `{"name", "weight"}` objects or
        /// `{"signals": [...], "fusion": "weighted_average" | "pairwise_sum"}`.
        #[arg(long)]
        plan: Option<String>,

        /// Number of authors to print
        #[arg(short, long, default_value = "10")]
        top: usize,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read queries from stdin, one per line
    Repl {
        #[arg(long)]
        plan: Option<String>,

        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Print an author's profile
    Author {
        /// Author id
        id: String,
    },

    /// Print corpus totals and the distribution of documents per author
    Stats,

    /// Run a topic file and write a TREC run file
    Bench {
        /// Tab-separated `topic_id<TAB>query` lines
        #[arg(long)]
        topics: PathBuf,

        /// Output run file
        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        plan: Option<String>,

        /// Run tag written in the last column
        #[arg(long, default_value = "expertise")]
        tag: String,

        /// Query threads; 0 uses one per core
        #[arg(long, default_value = "0")]
        threads: usize,
    },
}
