use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::draft::Draft;
use crate::error::CanvasError;
use crate::matrix::ScoreMatrix;
use crate::projection::{StrategyCanvas, strategy_canvas};
use crate::score::Score;
use crate::validate::{FieldKey, ValidationErrors, is_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    Editing,
    Reviewing,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editing => write!(f, "editing"),
            Self::Reviewing => write!(f, "reviewing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Submit,
    Revise,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub next_state: ViewMode,
    pub applied: bool,
}

#[derive(Debug, Clone)]
pub struct ViewModeMachine {
    state: ViewMode,
}

impl Default for ViewModeMachine {
    fn default() -> Self {
        Self {
            state: ViewMode::Editing,
        }
    }
}

impl ViewModeMachine {
    pub fn current_state(&self) -> ViewMode {
        self.state
    }

    pub fn dispatch(&mut self, event: ViewEvent) -> TransitionResult {
        let current = self.state;
        let (next, applied) = match (current, event) {
            (ViewMode::Editing, ViewEvent::Submit) => (ViewMode::Reviewing, true),
            (ViewMode::Reviewing, ViewEvent::Revise) => (ViewMode::Editing, true),
            (_, ViewEvent::Reset) => (ViewMode::Editing, true),
            _ => (current, false),
        };
        if applied {
            debug!("view mode {current} -> {next} on {event:?}");
            self.state = next;
        }
        TransitionResult {
            next_state: self.state,
            applied,
        }
    }
}

/// One user's working copy: the draft form, the submitted matrix and the view mode.
#[derive(Debug, Clone)]
pub struct CanvasSession {
    config: CanvasConfig,
    draft: Draft,
    matrix: Option<ScoreMatrix>,
    errors: ValidationErrors,
    machine: ViewModeMachine,
}

impl CanvasSession {
    pub fn new(config: CanvasConfig) -> Self {
        let draft = Draft::new(config.initial_competitors, config.initial_features);
        Self {
            config,
            draft,
            matrix: None,
            errors: ValidationErrors::default(),
            machine: ViewModeMachine::default(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn mode(&self) -> ViewMode {
        self.machine.current_state()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Errors from the last failed submit, minus fields fixed since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn matrix(&self) -> Option<&ScoreMatrix> {
        self.matrix.as_ref()
    }

    fn require(&self, mode: ViewMode, action: &'static str) -> Result<(), CanvasError> {
        let current = self.mode();
        if current == mode {
            Ok(())
        } else {
            Err(CanvasError::WrongMode {
                action,
                mode: current,
            })
        }
    }

    fn touch_field(&mut self, key: FieldKey, value: &str) {
        if !is_blank(value) {
            self.errors.clear_field(key);
        }
    }

    pub fn set_company_name(&mut self, name: impl Into<String>) -> Result<(), CanvasError> {
        self.require(ViewMode::Editing, "set_company_name")?;
        let name = name.into();
        self.touch_field(FieldKey::CompanyName, &name);
        self.draft.set_company_name(name);
        Ok(())
    }

    pub fn set_competitor_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), CanvasError> {
        self.require(ViewMode::Editing, "set_competitor_name")?;
        let name = name.into();
        self.touch_field(FieldKey::Competitor(index), &name);
        self.draft.set_competitor_name(index, name)
    }

    pub fn set_feature_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), CanvasError> {
        self.require(ViewMode::Editing, "set_feature_name")?;
        let name = name.into();
        self.touch_field(FieldKey::Feature(index), &name);
        self.draft.set_feature_name(index, name)
    }

    pub fn add_competitor(&mut self) -> Result<(), CanvasError> {
        self.require(ViewMode::Editing, "add_competitor")?;
        self.draft.add_competitor();
        self.errors.clear();
        Ok(())
    }

    pub fn remove_competitor(&mut self, index: usize) -> Result<(), CanvasError> {
        self.require(ViewMode::Editing, "remove_competitor")?;
        self.draft.remove_competitor(index)?;
        self.errors.clear();
        Ok(())
    }

    pub fn add_feature(&mut self) -> Result<(), CanvasError> {
        self.require(ViewMode::Editing, "add_feature")?;
        self.draft.add_feature();
        self.errors.clear();
        Ok(())
    }

    pub fn remove_feature(&mut self, index: usize) -> Result<(), CanvasError> {
        self.require(ViewMode::Editing, "remove_feature")?;
        self.draft.remove_feature(index)?;
        self.errors.clear();
        Ok(())
    }

    /// Writes a provisional cell. Metric `0` is Price, metric `k` is feature `k - 1`.
    pub fn set_score(&mut self, entrant_index: usize, metric_index: usize, raw: &str) -> Result<Option<Score>, CanvasError> {
        self.require(ViewMode::Editing, "set_score")?;
        let policy = self.config.score_policy;
        self.draft
            .set_score(entrant_index, metric_index, raw, policy)
            .inspect_err(|err| warn!("draft score edit rejected: {err}"))
    }

    /// Validates the draft and, if complete, snapshots it and switches to review.
    pub fn submit(&mut self) -> Result<&ScoreMatrix, CanvasError> {
        self.require(ViewMode::Editing, "submit")?;
        let errors = self.draft.validate();
        if !errors.is_empty() {
            info!("submit blocked by {} validation error(s)", errors.len());
            self.errors = errors.clone();
            return Err(CanvasError::Validation(errors));
        }
        self.errors.clear();
        let matrix = self.draft.normalize();
        info!(
            "submitted {} entrants x {} metrics",
            matrix.entrants().len(),
            matrix.metrics().len()
        );
        self.machine.dispatch(ViewEvent::Submit);
        let matrix = self.matrix.insert(matrix);
        Ok(&*matrix)
    }

    /// Edits the submitted matrix directly, without re-validation.
    pub fn set_review_score(&mut self, entrant_index: usize, metric_index: usize, raw: &str) -> Result<Score, CanvasError> {
        self.require(ViewMode::Reviewing, "set_review_score")?;
        let policy = self.config.score_policy;
        let mode = self.mode();
        let matrix = self.matrix.as_mut().ok_or(CanvasError::WrongMode {
            action: "set_review_score",
            mode,
        })?;
        matrix
            .set_score(entrant_index, metric_index, raw, policy)
            .inspect_err(|err| warn!("review score edit rejected: {err}"))
    }

    /// Back to the form, carrying review-mode score edits with it.
    pub fn return_to_edit(&mut self) -> Result<(), CanvasError> {
        self.require(ViewMode::Reviewing, "return_to_edit")?;
        if let Some(matrix) = &self.matrix {
            self.draft.absorb(matrix);
        }
        self.machine.dispatch(ViewEvent::Revise);
        Ok(())
    }

    /// Discards everything and starts a blank draft.
    pub fn reset(&mut self) {
        self.draft = Draft::new(self.config.initial_competitors, self.config.initial_features);
        self.matrix = None;
        self.errors.clear();
        self.machine.dispatch(ViewEvent::Reset);
        info!("session reset");
    }

    /// Chart data for the submitted matrix, derived fresh on every call.
    ///
    /// `None` while editing: the last submission no longer reflects the form.
    pub fn chart(&self) -> Option<StrategyCanvas> {
        if self.mode() != ViewMode::Reviewing {
            return None;
        }
        self.matrix
            .as_ref()
            .map(|matrix| strategy_canvas(matrix, &self.config.palette))
    }
}

impl Default for CanvasSession {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScorePolicy;

    fn filled(competitors: &[&str], features: &[&str]) -> CanvasSession {
        let mut session = CanvasSession::new(CanvasConfig {
            initial_competitors: competitors.len(),
            initial_features: features.len(),
            ..CanvasConfig::default()
        });
        session.set_company_name("Acme").unwrap();
        for (i, name) in competitors.iter().enumerate() {
            session.set_competitor_name(i, *name).unwrap();
        }
        for (i, name) in features.iter().enumerate() {
            session.set_feature_name(i, *name).unwrap();
        }
        session
    }

    #[test]
    fn valid_transitions_are_deterministic() {
        let mut sm = ViewModeMachine::default();
        assert_eq!(sm.current_state(), ViewMode::Editing);
        assert!(sm.dispatch(ViewEvent::Submit).applied);
        assert_eq!(sm.current_state(), ViewMode::Reviewing);
        assert!(sm.dispatch(ViewEvent::Revise).applied);
        assert_eq!(sm.current_state(), ViewMode::Editing);
        assert!(sm.dispatch(ViewEvent::Reset).applied);
        assert_eq!(sm.current_state(), ViewMode::Editing);
    }

    #[test]
    fn invalid_transition_is_rejected_without_state_change() {
        let mut sm = ViewModeMachine::default();
        let result = sm.dispatch(ViewEvent::Revise);
        assert!(!result.applied);
        assert_eq!(result.next_state, ViewMode::Editing);
        sm.dispatch(ViewEvent::Submit);
        assert!(!sm.dispatch(ViewEvent::Submit).applied);
        assert_eq!(sm.current_state(), ViewMode::Reviewing);
    }

    #[test]
    fn incomplete_form_blocks_submit() {
        let mut session = CanvasSession::default();
        let err = session.submit().unwrap_err();
        let CanvasError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1 + 3 + 5);
        assert_eq!(session.mode(), ViewMode::Editing);
        assert!(session.matrix().is_none());
        assert_eq!(session.errors().len(), 9);
    }

    #[test]
    fn typing_a_name_clears_its_error() {
        let mut session = CanvasSession::default();
        let _ = session.submit();
        session.set_competitor_name(1, "Y").unwrap();
        assert!(session.errors().get(FieldKey::Competitor(1)).is_none());
        session.set_company_name("").unwrap();
        assert!(session.errors().get(FieldKey::CompanyName).is_some());
    }

    #[test]
    fn submit_switches_to_review_and_charts() {
        let mut session = filled(&["X"], &["Speed"]);
        session.set_score(1, 1, "40").unwrap();
        let matrix = session.submit().unwrap();
        assert_eq!(matrix.entrants().len(), 2);
        assert_eq!(session.mode(), ViewMode::Reviewing);
        let chart = session.chart().unwrap();
        assert_eq!(chart.points[1].get("X"), Some(40));
        assert_eq!(chart.series.len(), 2);
    }

    #[test]
    fn review_edits_are_visible_on_next_chart_read() {
        let mut session = filled(&["X"], &["Speed"]);
        session.submit().unwrap();
        session.set_review_score(0, 0, "77").unwrap();
        assert_eq!(session.chart().unwrap().points[0].get("Acme"), Some(77));
    }

    #[test]
    fn draft_edits_are_refused_while_reviewing() {
        let mut session = filled(&["X"], &["Speed"]);
        session.submit().unwrap();
        assert!(matches!(
            session.set_score(0, 0, "5"),
            Err(CanvasError::WrongMode {
                mode: ViewMode::Reviewing,
                ..
            })
        ));
        assert!(matches!(
            session.set_feature_name(0, "Other"),
            Err(CanvasError::WrongMode { .. })
        ));
    }

    #[test]
    fn review_edits_are_refused_while_editing() {
        let mut session = CanvasSession::default();
        assert!(matches!(
            session.set_review_score(0, 0, "5"),
            Err(CanvasError::WrongMode {
                mode: ViewMode::Editing,
                ..
            })
        ));
        assert!(session.return_to_edit().is_err());
    }

    #[test]
    fn return_to_edit_keeps_review_scores() {
        let mut session = filled(&["X"], &["Speed"]);
        session.submit().unwrap();
        session.set_review_score(1, 1, "12").unwrap();
        session.return_to_edit().unwrap();
        assert_eq!(session.mode(), ViewMode::Editing);
        assert_eq!(session.draft().score(1, 1), Score::new(12));
    }

    #[test]
    fn chart_is_only_available_while_reviewing() {
        let mut session = filled(&["X"], &["Speed"]);
        assert!(session.chart().is_none());
        session.submit().unwrap();
        assert!(session.chart().is_some());
        session.return_to_edit().unwrap();
        assert!(session.matrix().is_some());
        assert!(session.chart().is_none());
        session.submit().unwrap();
        assert!(session.chart().is_some());
    }

    #[test]
    fn rejected_review_edit_leaves_cell() {
        let mut session = filled(&["X"], &["Speed"]);
        session.set_score(1, 0, "30").unwrap();
        session.submit().unwrap();
        assert!(session.set_review_score(1, 0, "abc").is_err());
        assert_eq!(session.matrix().unwrap().score(1, 0), Score::new(30));
    }

    #[test]
    fn zero_policy_applies_in_review_too() {
        let mut session = filled(&["X"], &["Speed"]);
        session.config.score_policy = ScorePolicy::Zero;
        session.set_score(1, 0, "30").unwrap();
        session.submit().unwrap();
        assert_eq!(session.set_review_score(1, 0, "abc").unwrap(), Score::MIN);
    }

    #[test]
    fn reset_discards_everything() {
        let mut session = filled(&["X"], &["Speed"]);
        session.submit().unwrap();
        session.reset();
        assert_eq!(session.mode(), ViewMode::Editing);
        assert!(session.matrix().is_none());
        assert!(session.chart().is_none());
        assert_eq!(session.draft().competitors().len(), 1);
        assert_eq!(session.draft().company_name(), "");
    }
}
