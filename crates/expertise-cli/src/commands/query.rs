use std::io::{self, BufRead, Write};

use anyhow::Result;

use expertise_core::models::ScoringPlan;
use expertise_core::CancelToken;
use expertise_retrieval::{ExpertFinder, ExpertSearchResult, QueryStage};

use crate::app::App;

pub fn run(app: &App, text: &str, plan: Option<&str>, top: usize, json: bool) -> Result<()> {
    let plan = app.plan(plan)?;
    let finder = app.finder();
    let result = finder.find_expert(text, &plan, &CancelToken::new())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, top);
    }
    Ok(())
}

/// Answer one query per stdin line until EOF.
pub fn repl(app: &App, plan: Option<&str>, top: usize) -> Result<()> {
    let plan = app.plan(plan)?;
    let finder = app.finder();
    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let query = line.trim();
        if !query.is_empty() {
            answer(&finder, query, &plan, top);
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "query> ")?;
    stdout.flush()
}

fn answer(finder: &ExpertFinder, query: &str, plan: &ScoringPlan, top: usize) {
    match finder.find_expert(query, plan, &CancelToken::new()) {
        Ok(result) => print_result(&result, top),
        Err(e) => eprintln!("error: {e}"),
    }
}

pub fn print_result(result: &ExpertSearchResult, top: usize) {
    for (rank, author) in result.top(top).iter().enumerate() {
        println!(
            "{:>3}. {} ({}) score={:.3}",
            rank + 1,
            author.name,
            author.author_id,
            author.score
        );
    }
    let entities: Vec<&str> = result
        .query_entities
        .iter()
        .map(|e| e.entity_title.as_str())
        .collect();
    println!("query entities: {}", entities.join("; "));
    let stages = [
        QueryStage::EntityExtraction,
        QueryStage::CandidateRetrieval,
        QueryStage::Scoring,
        QueryStage::NormalizeMerge,
    ];
    let timings: Vec<String> = stages
        .iter()
        .map(|&stage| format!("{stage}={:.1?}", result.timings.get(stage)))
        .collect();
    println!("timings: {} total={:.1?}", timings.join(" "), result.elapsed);
    for event in &result.degradations {
        println!("degraded: {} ({})", event.component, event.failure);
    }
}
