use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ExpertiseResult, ScoringError};

/// Which candidate set a scoring function ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalFamily {
    /// Authors citing the query entities.
    Entity,
    /// Authors of documents matching the query terms.
    Term,
}

/// Every supported author scoring function.
///
/// The snake_case variant names are canonical; the aliases accept the
/// names used by older plan files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringKind {
    #[serde(alias = "efiaf_score")]
    EfIaf,
    #[serde(alias = "eciaf_score")]
    EcIaf,
    #[serde(alias = "log_ec_ef_iaf_score")]
    LogEcEfIaf,
    #[serde(alias = "cossim_efiaf_score")]
    CosineEfIaf,
    #[serde(alias = "relatedness_geom")]
    RelatednessGeometric,
    #[serde(alias = "author_entities_relatedness_score")]
    RelatednessTopK,
    #[serde(alias = "lucene_max_score")]
    TermMax,
    #[serde(alias = "lucene_mean_score")]
    TermMean,
}

impl ScoringKind {
    pub const ALL: [ScoringKind; 8] = [
        ScoringKind::EfIaf,
        ScoringKind::EcIaf,
        ScoringKind::LogEcEfIaf,
        ScoringKind::CosineEfIaf,
        ScoringKind::RelatednessGeometric,
        ScoringKind::RelatednessTopK,
        ScoringKind::TermMax,
        ScoringKind::TermMean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScoringKind::EfIaf => "ef_iaf",
            ScoringKind::EcIaf => "ec_iaf",
            ScoringKind::LogEcEfIaf => "log_ec_ef_iaf",
            ScoringKind::CosineEfIaf => "cosine_ef_iaf",
            ScoringKind::RelatednessGeometric => "relatedness_geometric",
            ScoringKind::RelatednessTopK => "relatedness_top_k",
            ScoringKind::TermMax => "term_max",
            ScoringKind::TermMean => "term_mean",
        }
    }

    pub fn family(self) -> SignalFamily {
        match self {
            ScoringKind::TermMax | ScoringKind::TermMean => SignalFamily::Term,
            _ => SignalFamily::Entity,
        }
    }

    /// Whether the function consults the relatedness service.
    pub fn needs_relatedness(self) -> bool {
        matches!(
            self,
            ScoringKind::RelatednessGeometric | ScoringKind::RelatednessTopK
        )
    }
}

impl fmt::Display for ScoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringKind {
    type Err = ScoringError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).map_err(|_| {
            ScoringError::UnknownScoringFunction {
                name: name.to_string(),
            }
        })
    }
}

/// How per-signal rankings are combined into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    /// Normalize each signal, then weighted-average with zero fill.
    #[default]
    WeightedAverage,
    /// Merge each family separately, then sum the two families per author.
    PairwiseSum,
}

/// One weighted signal in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalSpec {
    #[serde(rename = "name")]
    pub kind: ScoringKind,
    pub weight: f64,
}

impl SignalSpec {
    pub fn new(kind: ScoringKind, weight: f64) -> Self {
        Self { kind, weight }
    }
}

/// Which signals a query computes, their weights, and the fusion rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPlan {
    pub signals: Vec<SignalSpec>,
    #[serde(default)]
    pub fusion: FusionStrategy,
}

#[derive(Deserialize)]
struct RawSignal {
    name: String,
    #[serde(default = "default_weight")]
    weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlan {
    Legacy(Vec<RawSignal>),
    Full {
        signals: Vec<RawSignal>,
        #[serde(default)]
        fusion: FusionStrategy,
    },
}

impl ScoringPlan {
    pub fn new(signals: Vec<SignalSpec>, fusion: FusionStrategy) -> Self {
        Self { signals, fusion }
    }

    /// A plan with one signal of weight 1.
    pub fn single(kind: ScoringKind) -> Self {
        Self::new(vec![SignalSpec::new(kind, 1.0)], FusionStrategy::WeightedAverage)
    }

    /// Parse a plan from either `{"signals": [...], "fusion": "..."}` or a
    /// bare array of `{"name", "weight"}` objects.
    pub fn from_json(json: &str) -> ExpertiseResult<Self> {
        let raw: RawPlan = serde_json::from_str(json)?;
        let (raw_signals, fusion) = match raw {
            RawPlan::Legacy(signals) => (signals, FusionStrategy::WeightedAverage),
            RawPlan::Full { signals, fusion } => (signals, fusion),
        };
        let signals = raw_signals
            .into_iter()
            .map(|raw| Ok(SignalSpec::new(raw.name.parse()?, raw.weight)))
            .collect::<Result<Vec<_>, ScoringError>>()?;
        let plan = Self::new(signals, fusion);
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.signals.is_empty() {
            return Err(ScoringError::InvalidPlan {
                reason: "plan has no signals".to_string(),
            });
        }
        for signal in &self.signals {
            if !signal.weight.is_finite() || signal.weight < 0.0 {
                return Err(ScoringError::InvalidPlan {
                    reason: format!("weight of {} must be finite and >= 0", signal.kind),
                });
            }
        }
        if self.total_weight() <= 0.0 {
            return Err(ScoringError::InvalidPlan {
                reason: "signal weights sum to zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn total_weight(&self) -> f64 {
        self.signals.iter().map(|s| s.weight).sum()
    }

    pub fn uses_family(&self, family: SignalFamily) -> bool {
        self.signals.iter().any(|s| s.kind.family() == family)
    }

    pub fn needs_relatedness(&self) -> bool {
        self.signals.iter().any(|s| s.kind.needs_relatedness())
    }
}

impl Default for ScoringPlan {
    fn default() -> Self {
        Self::single(ScoringKind::EcIaf)
    }
}
