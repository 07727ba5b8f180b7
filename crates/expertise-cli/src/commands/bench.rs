use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::warn;

use expertise_core::models::RankedAuthor;
use expertise_core::CancelToken;
use expertise_retrieval::QueryPool;

use crate::app::App;

/// `topic_id<TAB>query` lines; the id gets a `topic-` prefix.
pub fn parse_topics(text: &str) -> Result<Vec<(String, String)>> {
    let mut topics = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((id, query)) = line.split_once('\t') else {
            bail!("line {}: expected `topic_id<TAB>query`", i + 1);
        };
        topics.push((format!("topic-{}", id.trim()), query.trim().to_string()));
    }
    Ok(topics)
}

/// TREC run lines: `qid 0 author_id 0 score tag`.
pub fn trec_lines(qid: &str, ranking: &[RankedAuthor], tag: &str) -> Vec<String> {
    ranking
        .iter()
        .map(|author| format!("{qid} 0 {} 0 {} {tag}", author.author_id, author.score))
        .collect()
}

pub fn run(
    app: &App,
    topics_path: &Path,
    out: &Path,
    plan: Option<&str>,
    tag: &str,
    threads: usize,
) -> Result<()> {
    let text = fs::read_to_string(topics_path)
        .with_context(|| format!("reading {}", topics_path.display()))?;
    let topics = parse_topics(&text)?;
    let plan = app.plan(plan)?;
    let pool = QueryPool::new(
        Arc::new(app.finder()),
        threads,
        app.config.observability.query_log_capacity.max(topics.len()),
    )?;

    let queries: Vec<String> = topics.iter().map(|(_, query)| query.clone()).collect();
    let results = pool.run(&queries, &plan, &CancelToken::new());

    let file = fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    let mut failed = 0;
    for ((qid, _), result) in topics.iter().zip(results) {
        match result {
            Ok(found) => {
                for line in trec_lines(qid, &found.ranking, tag) {
                    writeln!(writer, "{line}")?;
                }
            }
            Err(e) => {
                warn!(qid = %qid, error = %e, "query failed");
                failed += 1;
            }
        }
    }
    writer.flush()?;

    let log = pool.log_snapshot()?;
    println!("queries: {} (failed {failed}, degraded {})", topics.len(), log.degraded_count());
    println!(
        "latency: avg={:.1?} p50={:.1?} p95={:.1?} max={:.1?}",
        log.avg_latency(),
        log.latency_percentile(0.5),
        log.latency_percentile(0.95),
        log.latency_percentile(1.0)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_are_prefixed_and_trimmed() {
        let topics = parse_topics("1\tentity linking \n\n2\tgraph ranking\n").unwrap();
        assert_eq!(
            topics,
            vec![
                ("topic-1".to_string(), "entity linking".to_string()),
                ("topic-2".to_string(), "graph ranking".to_string()),
            ]
        );
    }

    #[test]
    fn topic_without_tab_is_rejected() {
        let err = parse_topics("1\tok\n2 missing tab").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn run_lines_follow_trec_layout() {
        let ranking = vec![
            RankedAuthor::new("a1", "Ada", 1.0),
            RankedAuthor::new("a2", "Bob", 0.25),
        ];
        assert_eq!(
            trec_lines("topic-7", &ranking, "ec_iaf"),
            vec!["topic-7 0 a1 0 1 ec_iaf", "topic-7 0 a2 0 0.25 ec_iaf"]
        );
    }
}
