use anyhow::Result;
use log::info;
use strategy_canvas::{CanvasConfig, CanvasError, CanvasSession, ViewMode};

/// Everything a key press can ask of the canvas app.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Tick,
    Next,
    Prev,
    BeginEdit,
    InputChar(char),
    Backspace,
    CommitInput,
    CancelInput,
    Submit,
    AddCompetitor,
    AddFeature,
    RemoveFocused,
    ReturnToEdit,
    Reset,
}

/// A focusable cell of the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CompanyName,
    CompetitorName(usize),
    FeatureName(usize),
    Score { entrant: usize, metric: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

pub struct App {
    pub session: CanvasSession,
    pub cursor: usize,
    /// `Some` while the focused field is being typed into.
    pub input: Option<String>,
    pub status: Option<Status>,
    pub is_running: bool,
}

impl App {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            session: CanvasSession::new(config),
            cursor: 0,
            input: None,
            status: None,
            is_running: true,
        }
    }

    pub fn input_mode(&self) -> bool {
        self.input.is_some()
    }

    /// Focus order: names first, then the score grid row by row.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        let (entrants, metrics) = match (self.session.mode(), self.session.matrix()) {
            (ViewMode::Reviewing, Some(matrix)) => (matrix.entrants().len(), matrix.metrics().len()),
            _ => {
                let draft = self.session.draft();
                fields.push(Field::CompanyName);
                fields.extend((0..draft.competitors().len()).map(Field::CompetitorName));
                fields.extend((0..draft.features().len()).map(Field::FeatureName));
                (draft.entrant_count(), draft.metric_count())
            }
        };
        for entrant in 0..entrants {
            fields.extend((0..metrics).map(|metric| Field::Score { entrant, metric }));
        }
        fields
    }

    pub fn focused(&self) -> Option<Field> {
        self.fields().get(self.cursor).copied()
    }

    /// Current stored text of a field, as the input buffer starts out.
    pub fn field_text(&self, field: Field) -> String {
        let draft = self.session.draft();
        match field {
            Field::CompanyName => draft.company_name().to_string(),
            Field::CompetitorName(i) => draft
                .competitors()
                .get(i)
                .map(|row| row.name.clone())
                .unwrap_or_default(),
            Field::FeatureName(i) => draft
                .features()
                .get(i)
                .map(|slot| slot.name.clone())
                .unwrap_or_default(),
            Field::Score { entrant, metric } => {
                let score = match self.session.matrix() {
                    Some(matrix) if self.session.mode() == ViewMode::Reviewing => {
                        matrix.score(entrant, metric)
                    }
                    _ => draft.score(entrant, metric),
                };
                score.map(|s| s.to_string()).unwrap_or_default()
            }
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.is_running = false,
            Action::Tick => {}
            Action::Next => self.move_cursor(1),
            Action::Prev => self.move_cursor(-1),
            Action::BeginEdit => {
                if let Some(field) = self.focused() {
                    self.input = Some(self.field_text(field));
                }
            }
            Action::InputChar(ch) => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.push(ch);
                }
            }
            Action::Backspace => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.pop();
                }
            }
            Action::CancelInput => self.input = None,
            Action::CommitInput => self.commit_input(),
            Action::Submit => {
                let outcome = self.session.submit().map(|m| m.entrants().len());
                if let Ok(lines) = &outcome {
                    info!("canvas generated with {lines} lines");
                    self.cursor = 0;
                }
                self.report(outcome.map(|_| "Strategy canvas generated."));
            }
            Action::AddCompetitor => {
                let outcome = self.session.add_competitor();
                self.report(outcome.map(|_| "Competitor added."));
            }
            Action::AddFeature => {
                let outcome = self.session.add_feature();
                self.report(outcome.map(|_| "Feature added."));
            }
            Action::RemoveFocused => self.remove_focused(),
            Action::ReturnToEdit => {
                let outcome = self.session.return_to_edit();
                if outcome.is_ok() {
                    self.cursor = 0;
                }
                self.report(outcome.map(|_| "Back to editing."));
            }
            Action::Reset => {
                self.session.reset();
                self.cursor = 0;
                self.input = None;
                self.status = Some(Status::Info("Started over.".to_string()));
            }
        }
        self.clamp_cursor();
        Ok(())
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.fields().len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    fn clamp_cursor(&mut self) {
        let len = self.fields().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn commit_input(&mut self) {
        let (Some(text), Some(field)) = (self.input.take(), self.focused()) else {
            return;
        };
        let reviewing = self.session.mode() == ViewMode::Reviewing;
        let outcome = match field {
            Field::CompanyName => self.session.set_company_name(text),
            Field::CompetitorName(i) => self.session.set_competitor_name(i, text),
            Field::FeatureName(i) => self.session.set_feature_name(i, text),
            Field::Score { entrant, metric } if reviewing => {
                self.session.set_review_score(entrant, metric, &text).map(|_| ())
            }
            Field::Score { entrant, metric } => self.session.set_score(entrant, metric, &text).map(|_| ()),
        };
        match outcome {
            Ok(()) => self.status = None,
            Err(err) => {
                self.status = Some(Status::Error(err.to_string()));
            }
        }
    }

    fn remove_focused(&mut self) {
        let outcome = match self.focused() {
            Some(Field::CompetitorName(i)) => self.session.remove_competitor(i),
            Some(Field::FeatureName(i)) => self.session.remove_feature(i),
            _ => {
                self.status = Some(Status::Error(
                    "Move to a competitor or feature name to remove it.".to_string(),
                ));
                return;
            }
        };
        self.report(outcome.map(|_| "Removed."));
    }

    fn report(&mut self, outcome: Result<&str, CanvasError>) {
        self.status = Some(match outcome {
            Ok(message) => Status::Info(message.to_string()),
            Err(CanvasError::Validation(errors)) => Status::Error(format!(
                "{} field(s) need a name before the canvas can be drawn.",
                errors.len()
            )),
            Err(err) => Status::Error(err.to_string()),
        });
    }
}
