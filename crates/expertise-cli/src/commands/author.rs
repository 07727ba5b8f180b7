use anyhow::Result;

use crate::app::App;

pub fn run(app: &App, author_id: &str) -> Result<()> {
    let profile = app.finder().author_profile(author_id)?;
    println!("{} ({})", profile.name, profile.author_id);
    if !profile.institution.is_empty() {
        println!("{}", profile.institution);
    }
    println!("documents: {}", profile.document_count);
    for entity in &profile.entities {
        let years: Vec<String> = entity
            .years
            .iter()
            .map(|(year, count)| format!("{year}:{count}"))
            .collect();
        println!(
            "  {:<40} docs={:<4} max={:.2} [{}]",
            entity.entity_id,
            entity.document_count,
            entity.max_score,
            years.join(" ")
        );
    }
    Ok(())
}
