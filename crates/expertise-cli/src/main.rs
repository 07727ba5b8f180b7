//! `expertise`: build author statistics from a corpus and rank experts.

mod app;
mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use app::App;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let app = App::open(cli.config.as_deref())?;
    match &cli.command {
        Commands::Build { corpus, erase } => commands::build::run(&app, corpus, *erase)?,
        Commands::Query {
            text,
            plan,
            top,
            json,
        } => commands::query::run(&app, text, plan.as_deref(), *top, *json)?,
        Commands::Repl { plan, top } => commands::query::repl(&app, plan.as_deref(), *top)?,
        Commands::Author { id } => commands::author::run(&app, id)?,
        Commands::Stats => commands::stats::run(&app)?,
        Commands::Bench {
            topics,
            out,
            plan,
            tag,
            threads,
        } => commands::bench::run(&app, topics, out, plan.as_deref(), tag, *threads)?,
    }
    app.close()
}
