use anyhow::Result;

use expertise_core::traits::IStatisticsStore;

use crate::app::App;

/// One row of the documents-per-author distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBin {
    pub from: u64,
    pub to: u64,
    pub authors: usize,
}

/// Lower bound of each decile of `counts` (sorted ascending), nearest rank.
pub fn deciles(counts: &[u64]) -> Vec<u64> {
    if counts.is_empty() {
        return Vec::new();
    }
    let last = counts.len() - 1;
    (0..10).map(|n| counts[n * last / 10]).collect()
}

/// Authors per `[decile, next decile - 1]` range; the last range ends at the maximum.
/// Ranges emptied by repeated deciles are left out.
pub fn decile_bins(counts: &[u64]) -> Vec<CountBin> {
    let bounds = deciles(counts);
    let max = counts.last().copied().unwrap_or(0);
    let mut bins = Vec::with_capacity(bounds.len());
    for (i, &from) in bounds.iter().enumerate() {
        let to = match bounds.get(i + 1) {
            Some(&next) if next > from => next - 1,
            Some(_) => continue,
            None => max,
        };
        let authors = counts.iter().filter(|&&c| from <= c && c <= to).count();
        bins.push(CountBin { from, to, authors });
    }
    bins
}

pub fn run(app: &App) -> Result<()> {
    let store = &app.store;
    let mut counts = store.author_document_counts()?;
    counts.sort_unstable();
    println!("documents: {}", store.total_documents()?);
    println!("authors:   {}", store.total_authors()?);
    println!("entities:  {}", store.total_entities()?);
    println!("deciles:   {:?}", deciles(&counts));
    for bin in decile_bins(&counts) {
        println!("{} authors have {}-{} documents", bin.authors, bin.from, bin.to);
    }
    Ok(())
}
