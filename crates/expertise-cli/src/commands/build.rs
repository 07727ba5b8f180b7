use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use expertise_core::CancelToken;
use expertise_ingest::read_papers_jsonl;

use crate::app::App;

pub fn run(app: &App, corpus: &[PathBuf], erase: bool) -> Result<()> {
    let mut papers = Vec::new();
    for path in corpus {
        let read = read_papers_jsonl(path).with_context(|| format!("reading {}", path.display()))?;
        info!(path = %path.display(), papers = read.len(), "corpus file read");
        papers.extend(read);
    }

    let builder = app.builder();
    if erase {
        builder.erase()?;
    }
    let report = builder.build(papers, &CancelToken::new())?;
    println!(
        "indexed={} skipped={} failed={} filtered={}",
        report.indexed, report.skipped, report.failed, report.filtered
    );
    Ok(())
}
