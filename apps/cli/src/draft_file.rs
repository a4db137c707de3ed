use serde::{Deserialize, Serialize};
use strategy_canvas::{CanvasConfig, CanvasError, CanvasSession};

/// A raw cell as typed by the user. Strings and fractional numbers go through the score policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Whole(i64),
    Fraction(f64),
    Text(String),
}

impl std::fmt::Display for RawScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Whole(v) => write!(f, "{v}"),
            Self::Fraction(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFile {
    #[serde(default)]
    pub name: String,
    /// `scores[0]` is Price, `scores[k]` is feature `k - 1`. `null` leaves a cell unset.
    #[serde(default)]
    pub scores: Vec<Option<RawScore>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftFile {
    #[serde(default)]
    pub company: RowFile,
    #[serde(default)]
    pub competitors: Vec<RowFile>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug)]
pub enum LoadError {
    Canvas(CanvasError),
    TooManyScores { row: String, given: usize, metrics: usize },
}

impl From<CanvasError> for LoadError {
    fn from(value: CanvasError) -> Self {
        Self::Canvas(value)
    }
}

impl DraftFile {
    pub fn read(path: &std::path::Path) -> Result<Self, CanvasError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Blank form with every cell unset.
    pub fn blank(competitors: usize, features: usize) -> Self {
        let row = RowFile {
            name: String::new(),
            scores: vec![None; 1 + features],
        };
        Self {
            company: row.clone(),
            competitors: vec![row; competitors],
            features: vec![String::new(); features],
        }
    }

    /// Replays the file through a fresh session, as if typed into the form.
    pub fn into_session(self, config: &CanvasConfig) -> Result<CanvasSession, LoadError> {
        let mut session = CanvasSession::new(CanvasConfig {
            initial_competitors: self.competitors.len(),
            initial_features: self.features.len(),
            ..config.clone()
        });
        let metrics = session.draft().metric_count();

        session.set_company_name(self.company.name.clone())?;
        for (i, row) in self.competitors.iter().enumerate() {
            session.set_competitor_name(i, row.name.clone())?;
        }
        for (i, name) in self.features.iter().enumerate() {
            session.set_feature_name(i, name.clone())?;
        }

        let rows = std::iter::once(&self.company).chain(self.competitors.iter());
        for (entrant, row) in rows.enumerate() {
            if row.scores.len() > metrics {
                return Err(LoadError::TooManyScores {
                    row: row.name.clone(),
                    given: row.scores.len(),
                    metrics,
                });
            }
            for (metric, raw) in row.scores.iter().enumerate() {
                if let Some(raw) = raw {
                    session.set_score(entrant, metric, &raw.to_string())?;
                }
            }
        }
        Ok(session)
    }
}
