//! Corpus readers. One JSON object per line:
//! `{"author_id": "...", "name": "...", "institution": "...", "year": 2012, "abstract": "...", "doi": null}`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use expertise_core::errors::{ExpertiseError, ExpertiseResult, IngestionError, StorageError};
use expertise_core::models::{AuthorInfo, DocumentInput};

/// One publication record of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub author_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    pub year: i32,
    #[serde(rename = "abstract", alias = "body", default)]
    pub body: String,
    #[serde(default)]
    pub doi: Option<String>,
}

impl Paper {
    pub fn author_info(&self) -> AuthorInfo {
        AuthorInfo::new(&self.author_id, &self.name, &self.institution)
    }

    pub fn document(&self) -> DocumentInput {
        DocumentInput {
            author_id: self.author_id.clone(),
            year: self.year,
            body: self.body.clone(),
        }
    }
}

/// Parse one corpus line. `line` is 1-based and only used in the error.
pub fn parse_paper(raw: &str, line: usize) -> Result<Paper, IngestionError> {
    serde_json::from_str(raw).map_err(|e| IngestionError::InvalidRecord {
        line,
        reason: e.to_string(),
    })
}

/// Read every well-formed paper of a JSON-lines file. Blank lines are
/// ignored; malformed lines are logged and skipped.
pub fn read_papers_jsonl(path: &Path) -> ExpertiseResult<Vec<Paper>> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut papers = Vec::new();
    let mut malformed = 0usize;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| io_error(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_paper(&line, index + 1) {
            Ok(paper) => papers.push(paper),
            Err(e) => {
                malformed += 1;
                warn!(file = %path.display(), error = %e, "corpus line skipped");
            }
        }
    }
    info!(file = %path.display(), papers = papers.len(), malformed, "corpus file read");
    Ok(papers)
}

fn io_error(path: &Path, e: std::io::Error) -> ExpertiseError {
    StorageError::Io {
        path: path.display().to_string(),
        details: e.to_string(),
    }
    .into()
}
