//! Pre-submit form state: entity names plus the provisional score matrix.
//!
//! Each row carries its own name and scores, so renaming a competitor never moves
//! scores between rows.

use log::debug;

use crate::error::CanvasError;
use crate::matrix::{DEFAULT_COMPANY_NAME, Entrant, EntrantId, FeatureId, Metric, ScoreMatrix};
use crate::score::{CellInput, Score, ScorePolicy};
use crate::validate::{ValidationErrors, is_blank, validate};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftRow {
    pub id: EntrantId,
    pub name: String,
    /// One slot per metric. `None` until the cell is first written.
    pub scores: Vec<Option<Score>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSlot {
    pub id: FeatureId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    company: DraftRow,
    competitors: Vec<DraftRow>,
    features: Vec<FeatureSlot>,
    next_id: u64,
}

impl Draft {
    pub fn new(competitor_count: usize, feature_count: usize) -> Self {
        let mut draft = Self {
            company: DraftRow {
                id: EntrantId(0),
                name: String::new(),
                scores: vec![None; 1 + feature_count],
            },
            competitors: Vec::with_capacity(competitor_count),
            features: Vec::with_capacity(feature_count),
            next_id: 1,
        };
        for _ in 0..feature_count {
            let id = FeatureId(draft.allocate_id());
            draft.features.push(FeatureSlot {
                id,
                name: String::new(),
            });
        }
        for _ in 0..competitor_count {
            draft.push_competitor_row();
        }
        draft
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_competitor_row(&mut self) {
        let id = EntrantId(self.allocate_id());
        let width = self.metric_count();
        self.competitors.push(DraftRow {
            id,
            name: String::new(),
            scores: vec![None; width],
        });
    }

    pub fn company_name(&self) -> &str {
        &self.company.name
    }

    pub fn competitors(&self) -> &[DraftRow] {
        &self.competitors
    }

    pub fn features(&self) -> &[FeatureSlot] {
        &self.features
    }

    pub fn competitor_names(&self) -> Vec<&str> {
        self.competitors.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Price plus one column per feature.
    pub fn metric_count(&self) -> usize {
        1 + self.features.len()
    }

    /// Company plus one row per competitor.
    pub fn entrant_count(&self) -> usize {
        1 + self.competitors.len()
    }

    /// Row `0` is the company, row `i + 1` is competitor `i`.
    pub fn entrant(&self, index: usize) -> Option<&DraftRow> {
        match index {
            0 => Some(&self.company),
            i => self.competitors.get(i - 1),
        }
    }

    fn entrant_mut(&mut self, index: usize) -> Option<&mut DraftRow> {
        match index {
            0 => Some(&mut self.company),
            i => self.competitors.get_mut(i - 1),
        }
    }

    /// Name shown for the company row before and after submission.
    pub fn company_display_name(&self) -> &str {
        if is_blank(&self.company.name) {
            DEFAULT_COMPANY_NAME
        } else {
            &self.company.name
        }
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) {
        self.company.name = name.into();
    }

    pub fn set_competitor_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), CanvasError> {
        let len = self.competitors.len();
        let row = self.competitors.get_mut(index).ok_or(CanvasError::IndexOutOfRange {
            list: "competitor",
            index,
            len,
        })?;
        row.name = name.into();
        Ok(())
    }

    pub fn set_feature_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), CanvasError> {
        let len = self.features.len();
        let slot = self.features.get_mut(index).ok_or(CanvasError::IndexOutOfRange {
            list: "feature",
            index,
            len,
        })?;
        slot.name = name.into();
        Ok(())
    }

    pub fn add_competitor(&mut self) -> EntrantId {
        self.push_competitor_row();
        let id = self.competitors[self.competitors.len() - 1].id;
        debug!("added competitor row {id:?}");
        id
    }

    pub fn remove_competitor(&mut self, index: usize) -> Result<DraftRow, CanvasError> {
        if index >= self.competitors.len() {
            return Err(CanvasError::IndexOutOfRange {
                list: "competitor",
                index,
                len: self.competitors.len(),
            });
        }
        let row = self.competitors.remove(index);
        debug!("removed competitor row {:?}", row.id);
        Ok(row)
    }

    /// Appends a feature and an unset column to every row.
    pub fn add_feature(&mut self) -> FeatureId {
        let id = FeatureId(self.allocate_id());
        self.features.push(FeatureSlot {
            id,
            name: String::new(),
        });
        for row in std::iter::once(&mut self.company).chain(self.competitors.iter_mut()) {
            row.scores.push(None);
        }
        debug!("added feature {id:?}");
        id
    }

    /// Drops feature `index` and its column from every row.
    pub fn remove_feature(&mut self, index: usize) -> Result<FeatureSlot, CanvasError> {
        if index >= self.features.len() {
            return Err(CanvasError::IndexOutOfRange {
                list: "feature",
                index,
                len: self.features.len(),
            });
        }
        let slot = self.features.remove(index);
        for row in std::iter::once(&mut self.company).chain(self.competitors.iter_mut()) {
            row.scores.remove(index + 1);
        }
        debug!("removed feature {:?}", slot.id);
        Ok(slot)
    }

    pub fn score(&self, entrant_index: usize, metric_index: usize) -> Option<Score> {
        self.entrant(entrant_index)
            .and_then(|row| row.scores.get(metric_index).copied().flatten())
    }

    /// Writes one provisional cell. Empty input resets the cell to unset.
    pub fn set_score(
        &mut self,
        entrant_index: usize,
        metric_index: usize,
        raw: &str,
        policy: ScorePolicy,
    ) -> Result<Option<Score>, CanvasError> {
        let entrant_len = self.entrant_count();
        let metric_len = self.metric_count();
        let row = self
            .entrant_mut(entrant_index)
            .ok_or(CanvasError::EntrantOutOfRange {
                index: entrant_index,
                len: entrant_len,
            })?;
        let cell = row
            .scores
            .get_mut(metric_index)
            .ok_or(CanvasError::MetricOutOfRange {
                index: metric_index,
                len: metric_len,
            })?;
        let value = match policy.interpret(raw) {
            Ok(CellInput::Set(score)) => Some(score),
            Ok(CellInput::Clear) => None,
            Err(reason) => {
                return Err(CanvasError::InvalidScore {
                    raw: raw.to_string(),
                    reason,
                });
            }
        };
        *cell = value;
        Ok(value)
    }

    pub fn validate(&self) -> ValidationErrors {
        validate(&self.company.name, &self.competitor_names(), &self.feature_names())
    }

    /// Snapshots the draft into a normalized matrix. Unset cells become 0.
    pub fn normalize(&self) -> ScoreMatrix {
        let width = self.metric_count();
        let to_entrant = |row: &DraftRow, name: String| Entrant {
            id: row.id,
            name,
            scores: (0..width)
                .map(|m| row.scores.get(m).copied().flatten().unwrap_or_default())
                .collect(),
        };
        let mut entrants = Vec::with_capacity(self.entrant_count());
        entrants.push(to_entrant(&self.company, self.company_display_name().to_string()));
        entrants.extend(self.competitors.iter().map(|row| to_entrant(row, row.name.clone())));

        let mut metrics = Vec::with_capacity(width);
        metrics.push(Metric::price());
        metrics.extend(self.features.iter().map(|f| Metric::feature(f.name.clone())));

        ScoreMatrix::from_normalized(entrants, metrics)
    }

    /// Copies normalized scores back onto the rows they came from, matched by row id.
    pub fn absorb(&mut self, matrix: &ScoreMatrix) {
        let width = self.metric_count();
        for entrant in matrix.entrants() {
            let row = if entrant.id == self.company.id {
                Some(&mut self.company)
            } else {
                self.competitors.iter_mut().find(|r| r.id == entrant.id)
            };
            if let Some(row) = row {
                for (m, score) in entrant.scores.iter().take(width).enumerate() {
                    row.scores[m] = Some(*score);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_draft_has_requested_shape() {
        let draft = Draft::new(3, 5);
        assert_eq!(draft.competitors().len(), 3);
        assert_eq!(draft.features().len(), 5);
        assert_eq!(draft.metric_count(), 6);
        assert!(draft.competitors().iter().all(|r| r.scores.len() == 6));
    }

    #[test]
    fn row_ids_are_unique() {
        let mut draft = Draft::new(2, 1);
        let added = draft.add_competitor();
        let mut ids: Vec<_> = std::iter::once(draft.entrant(0).unwrap().id)
            .chain(draft.competitors().iter().map(|r| r.id))
            .collect();
        assert!(ids.contains(&added));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn renaming_keeps_scores_on_the_row() {
        let mut draft = Draft::new(2, 1);
        draft.set_score(2, 1, "70", ScorePolicy::Reject).unwrap();
        draft.set_competitor_name(1, "Renamed").unwrap();
        assert_eq!(draft.score(2, 1), Score::new(70));
        assert_eq!(draft.competitors()[1].name, "Renamed");
    }

    #[test]
    fn removing_a_competitor_shifts_later_rows_with_their_scores() {
        let mut draft = Draft::new(3, 1);
        draft.set_competitor_name(2, "Z").unwrap();
        draft.set_score(3, 0, "33", ScorePolicy::Reject).unwrap();
        draft.remove_competitor(0).unwrap();
        assert_eq!(draft.competitors()[1].name, "Z");
        assert_eq!(draft.score(2, 0), Score::new(33));
    }

    #[test]
    fn feature_columns_follow_add_and_remove() {
        let mut draft = Draft::new(1, 2);
        draft.set_score(1, 2, "80", ScorePolicy::Reject).unwrap();
        draft.add_feature();
        assert_eq!(draft.entrant(1).unwrap().scores.len(), 4);
        draft.remove_feature(0).unwrap();
        assert_eq!(draft.metric_count(), 3);
        assert_eq!(draft.score(1, 1), Score::new(80));
        assert!(matches!(
            draft.remove_feature(7),
            Err(CanvasError::IndexOutOfRange { list: "feature", .. })
        ));
    }

    #[test]
    fn empty_input_unsets_a_cell() {
        let mut draft = Draft::new(1, 1);
        draft.set_score(0, 0, "5", ScorePolicy::Reject).unwrap();
        assert_eq!(draft.set_score(0, 0, " ", ScorePolicy::Reject).unwrap(), None);
        assert_eq!(draft.score(0, 0), None);
    }

    #[test]
    fn normalize_fills_unset_cells_with_zero_and_defaults_company_name() {
        let mut draft = Draft::new(2, 2);
        draft.set_score(1, 2, "64", ScorePolicy::Reject).unwrap();
        let matrix = draft.normalize();
        assert_eq!(matrix.entrants().len(), 3);
        assert_eq!(matrix.metrics().len(), 3);
        assert_eq!(matrix.company().unwrap().name, DEFAULT_COMPANY_NAME);
        assert_eq!(matrix.score(1, 2), Score::new(64));
        assert_eq!(matrix.score(2, 1), Some(Score::MIN));
    }

    #[test]
    fn absorb_restores_review_scores_by_row_id() {
        let mut draft = Draft::new(2, 1);
        let mut matrix = draft.normalize();
        matrix.set_score(2, 1, "91", ScorePolicy::Reject).unwrap();
        draft.absorb(&matrix);
        assert_eq!(draft.score(2, 1), Score::new(91));
        assert_eq!(draft.score(1, 1), Some(Score::MIN));
    }
}
