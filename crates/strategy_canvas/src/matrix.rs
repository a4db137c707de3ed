use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::score::{CellInput, Score, ScorePolicy};

pub const PRICE_METRIC: &str = "Price";
pub const DEFAULT_COMPANY_NAME: &str = "You";

/// Stable identity of a draft row. Survives renames and reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntrantId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
}

impl Metric {
    pub fn price() -> Self {
        Self {
            name: PRICE_METRIC.to_string(),
        }
    }

    pub fn feature(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The company or one competitor. `scores[0]` is Price, `scores[k]` is feature `k - 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    pub scores: Vec<Score>,
}

impl Entrant {
    pub fn price(&self) -> Score {
        self.scores.first().copied().unwrap_or_default()
    }

    pub fn feature_scores(&self) -> &[Score] {
        self.scores.get(1..).unwrap_or(&[])
    }
}

/// Normalized entrant × metric table. Entrant 0 is always the company.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreMatrix {
    entrants: Vec<Entrant>,
    metrics: Vec<Metric>,
}

impl ScoreMatrix {
    pub fn new(entrants: Vec<Entrant>, metrics: Vec<Metric>) -> Result<Self, CanvasError> {
        if let Some(bad) = entrants.iter().find(|e| e.scores.len() != metrics.len()) {
            return Err(CanvasError::ShapeMismatch {
                entrant: bad.name.clone(),
                expected: metrics.len(),
                actual: bad.scores.len(),
            });
        }
        Ok(Self { entrants, metrics })
    }

    /// Rows built by the draft always span every metric.
    pub(crate) fn from_normalized(entrants: Vec<Entrant>, metrics: Vec<Metric>) -> Self {
        debug_assert!(entrants.iter().all(|e| e.scores.len() == metrics.len()));
        Self { entrants, metrics }
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn company(&self) -> Option<&Entrant> {
        self.entrants.first()
    }

    pub fn competitors(&self) -> &[Entrant] {
        self.entrants.get(1..).unwrap_or(&[])
    }

    pub fn score(&self, entrant_index: usize, metric_index: usize) -> Option<Score> {
        self.entrants
            .get(entrant_index)
            .and_then(|e| e.scores.get(metric_index))
            .copied()
    }

    /// Writes one normalized cell. Empty input stores 0 because normalized cells are never unset.
    pub fn set_score(
        &mut self,
        entrant_index: usize,
        metric_index: usize,
        raw: &str,
        policy: ScorePolicy,
    ) -> Result<Score, CanvasError> {
        let entrant_len = self.entrants.len();
        let metric_len = self.metrics.len();
        let entrant = self
            .entrants
            .get_mut(entrant_index)
            .ok_or(CanvasError::EntrantOutOfRange {
                index: entrant_index,
                len: entrant_len,
            })?;
        let cell = entrant
            .scores
            .get_mut(metric_index)
            .ok_or(CanvasError::MetricOutOfRange {
                index: metric_index,
                len: metric_len,
            })?;
        let score = match policy.interpret(raw) {
            Ok(CellInput::Set(score)) => score,
            Ok(CellInput::Clear) => Score::MIN,
            Err(reason) => {
                return Err(CanvasError::InvalidScore {
                    raw: raw.to_string(),
                    reason,
                });
            }
        };
        *cell = score;
        Ok(score)
    }
}
