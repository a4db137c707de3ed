/// Everything the user can do from either view. The view collects these while
/// drawing a frame and the controller applies them once drawing is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    RenameCompany(String),
    RenameCompetitor(usize, String),
    RenameFeature(usize, String),
    AddCompetitor,
    RemoveCompetitor(usize),
    AddFeature,
    RemoveFeature(usize),
    EditScore {
        entrant: usize,
        metric: usize,
        raw: String,
    },
    Submit,
    EditReviewScore {
        entrant: usize,
        metric: usize,
        raw: String,
    },
    ReturnToEdit,
    Reset,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub last_error: Option<String>,
    pub pending: Vec<FormAction>,
}

impl AppState {
    pub fn push(&mut self, action: FormAction) {
        self.pending.push(action);
    }

    pub fn take_pending(&mut self) -> Vec<FormAction> {
        std::mem::take(&mut self.pending)
    }
}
