use log::info;
use strategy_canvas::{CanvasError, CanvasSession};

use crate::state::{AppState, FormAction};

pub struct Controller;

impl Controller {
    /// Applies one frame's actions. The first failure of the batch is the one reported.
    pub fn apply_pending(session: &mut CanvasSession, state: &mut AppState) {
        let pending = state.take_pending();
        if pending.is_empty() {
            return;
        }
        let mut first_error = None;
        for action in pending {
            Self::apply(session, state, action);
            first_error = first_error.or(state.last_error.take());
        }
        state.last_error = first_error;
    }

    pub fn apply(session: &mut CanvasSession, state: &mut AppState, action: FormAction) {
        let result = match action {
            FormAction::RenameCompany(name) => session.set_company_name(name),
            FormAction::RenameCompetitor(i, name) => session.set_competitor_name(i, name),
            FormAction::RenameFeature(i, name) => session.set_feature_name(i, name),
            FormAction::AddCompetitor => session.add_competitor(),
            FormAction::RemoveCompetitor(i) => session.remove_competitor(i),
            FormAction::AddFeature => session.add_feature(),
            FormAction::RemoveFeature(i) => session.remove_feature(i),
            FormAction::EditScore { entrant, metric, raw } => {
                session.set_score(entrant, metric, &raw).map(|_| ())
            }
            FormAction::Submit => Self::submit(session),
            FormAction::EditReviewScore { entrant, metric, raw } => {
                session.set_review_score(entrant, metric, &raw).map(|_| ())
            }
            FormAction::ReturnToEdit => session.return_to_edit(),
            FormAction::Reset => {
                session.reset();
                Ok(())
            }
        };

        state.last_error = match result {
            Ok(()) => None,
            Err(CanvasError::Validation(_)) => {
                Some("Fill in the highlighted fields before generating the canvas.".to_string())
            }
            Err(err) => Some(err.to_string()),
        };
    }

    fn submit(session: &mut CanvasSession) -> Result<(), CanvasError> {
        let matrix = session.submit()?;
        info!(
            "strategy canvas ready: {} lines over {} metrics",
            matrix.entrants().len(),
            matrix.metrics().len()
        );
        Ok(())
    }
}
