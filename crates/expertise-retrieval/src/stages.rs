//! Query pipeline stages and their wall-clock timings.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Stages of one query, in execution order. There are no back-edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStage {
    EntityExtraction,
    CandidateRetrieval,
    Scoring,
    NormalizeMerge,
    Done,
}

impl QueryStage {
    pub fn name(self) -> &'static str {
        match self {
            Self::EntityExtraction => "entity_extraction",
            Self::CandidateRetrieval => "candidate_retrieval",
            Self::Scoring => "scoring",
            Self::NormalizeMerge => "normalize_merge",
            Self::Done => "done",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::EntityExtraction => Self::CandidateRetrieval,
            Self::CandidateRetrieval => Self::Scoring,
            Self::Scoring => Self::NormalizeMerge,
            Self::NormalizeMerge | Self::Done => Self::Done,
        }
    }
}

impl fmt::Display for QueryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One duration per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageTimings {
    pub entity_extraction: Duration,
    pub candidate_retrieval: Duration,
    pub scoring: Duration,
    pub normalize_merge: Duration,
}

impl StageTimings {
    pub fn get(&self, stage: QueryStage) -> Duration {
        match stage {
            QueryStage::EntityExtraction => self.entity_extraction,
            QueryStage::CandidateRetrieval => self.candidate_retrieval,
            QueryStage::Scoring => self.scoring,
            QueryStage::NormalizeMerge => self.normalize_merge,
            QueryStage::Done => Duration::ZERO,
        }
    }

    fn set(&mut self, stage: QueryStage, elapsed: Duration) {
        match stage {
            QueryStage::EntityExtraction => self.entity_extraction = elapsed,
            QueryStage::CandidateRetrieval => self.candidate_retrieval = elapsed,
            QueryStage::Scoring => self.scoring = elapsed,
            QueryStage::NormalizeMerge => self.normalize_merge = elapsed,
            QueryStage::Done => {}
        }
    }

    pub fn total(&self) -> Duration {
        self.entity_extraction + self.candidate_retrieval + self.scoring + self.normalize_merge
    }
}

/// Walks the stages in order, timing each one.
#[derive(Debug)]
pub(crate) struct StageClock {
    current: QueryStage,
    started: Instant,
    timings: StageTimings,
}

impl StageClock {
    pub(crate) fn start() -> Self {
        Self {
            current: QueryStage::EntityExtraction,
            started: Instant::now(),
            timings: StageTimings::default(),
        }
    }

    pub(crate) fn current(&self) -> QueryStage {
        self.current
    }

    /// Close the current stage and enter the next one.
    pub(crate) fn advance(&mut self) {
        let now = Instant::now();
        self.timings.set(self.current, now - self.started);
        self.current = self.current.next();
        self.started = now;
    }

    pub(crate) fn finish(mut self) -> StageTimings {
        while self.current != QueryStage::Done {
            self.advance();
        }
        self.timings
    }
}
