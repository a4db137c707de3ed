use crate::chart_view;
use crate::controller::Controller;
use crate::state::{AppState, FormAction};
use eframe::egui;
use strategy_canvas::{
    CanvasConfig, CanvasSession, Draft, FieldKey, Layout, PRICE_METRIC, Score, ViewMode,
};

pub struct CanvasApp {
    session: CanvasSession,
    state: AppState,
}

impl CanvasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: CanvasConfig) -> Self {
        Self {
            session: CanvasSession::new(config),
            state: AppState::default(),
        }
    }
}

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Strategy Canvas Builder");
                ui.separator();
                ui.label(format!("Mode: {}", self.session.mode()));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Reset").clicked() {
                        self.state.push(FormAction::Reset);
                    }
                });
            });

            if let Some(err) = &self.state.last_error {
                ui.colored_label(egui::Color32::RED, err);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_max_width(content_width(self.session.config().layout));
                match self.session.mode() {
                    ViewMode::Editing => render_editor(ui, &self.session, &mut self.state),
                    ViewMode::Reviewing => render_review(ui, &self.session, &mut self.state),
                }
            });
        });

        Controller::apply_pending(&mut self.session, &mut self.state);
    }
}

fn content_width(layout: Layout) -> f32 {
    match layout {
        Layout::Compact => 720.0,
        Layout::Wide => 1100.0,
    }
}

fn error_label(ui: &mut egui::Ui, message: Option<&str>) {
    if let Some(message) = message {
        ui.colored_label(egui::Color32::RED, message);
    }
}

/// Single-line text box that reports the new text when the user edits it.
fn name_edit(ui: &mut egui::Ui, current: &str, hint: &str) -> Option<String> {
    let mut text = current.to_string();
    let resp = ui.add(egui::TextEdit::singleline(&mut text).hint_text(hint));
    resp.changed().then_some(text)
}

fn score_cell(ui: &mut egui::Ui, current: Option<Score>) -> Option<String> {
    let mut text = current.map(|s| s.to_string()).unwrap_or_default();
    let resp = ui.add(
        egui::TextEdit::singleline(&mut text)
            .desired_width(48.0)
            .hint_text("0-100"),
    );
    resp.changed().then_some(text)
}

fn entrant_label(draft: &Draft, index: usize) -> String {
    match (index, draft.entrant(index)) {
        (0, _) => draft.company_display_name().to_string(),
        (_, Some(row)) if !row.name.trim().is_empty() => row.name.clone(),
        (i, _) => format!("Competitor {i}"),
    }
}

fn metric_headers(draft: &Draft) -> Vec<String> {
    std::iter::once(PRICE_METRIC.to_string())
        .chain(draft.feature_names().into_iter().enumerate().map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Feature {}", i + 1)
            } else {
                name.to_string()
            }
        }))
        .collect()
}

fn render_editor(ui: &mut egui::Ui, session: &CanvasSession, state: &mut AppState) {
    let draft = session.draft();
    let errors = session.errors();

    ui.heading("Your Company");
    if let Some(name) = name_edit(ui, draft.company_name(), "Company name") {
        state.push(FormAction::RenameCompany(name));
    }
    error_label(ui, errors.get(FieldKey::CompanyName));

    ui.add_space(8.0);
    ui.heading("Competitors");
    for (i, row) in draft.competitors().iter().enumerate() {
        ui.horizontal(|ui| {
            if let Some(name) = name_edit(ui, &row.name, &format!("Competitor {}", i + 1)) {
                state.push(FormAction::RenameCompetitor(i, name));
            }
            if ui.small_button("Remove").clicked() {
                state.push(FormAction::RemoveCompetitor(i));
            }
        });
        error_label(ui, errors.get(FieldKey::Competitor(i)));
    }
    if ui.button("Add competitor").clicked() {
        state.push(FormAction::AddCompetitor);
    }

    ui.add_space(8.0);
    ui.heading("Key Features");
    for (i, feature) in draft.features().iter().enumerate() {
        ui.horizontal(|ui| {
            if let Some(name) = name_edit(ui, &feature.name, &format!("Feature {}", i + 1)) {
                state.push(FormAction::RenameFeature(i, name));
            }
            if ui.small_button("Remove").clicked() {
                state.push(FormAction::RemoveFeature(i));
            }
        });
        error_label(ui, errors.get(FieldKey::Feature(i)));
    }
    if ui.button("Add feature").clicked() {
        state.push(FormAction::AddFeature);
    }

    ui.add_space(8.0);
    ui.heading("Scores");
    ui.label("Rate everyone from 0 to 100 on price and on each feature.");
    egui::Grid::new("draft_scores").striped(true).show(ui, |ui| {
        ui.strong("Competitor");
        for header in metric_headers(draft) {
            ui.strong(header);
        }
        ui.end_row();

        for entrant in 0..draft.entrant_count() {
            ui.label(entrant_label(draft, entrant));
            for metric in 0..draft.metric_count() {
                if let Some(raw) = score_cell(ui, draft.score(entrant, metric)) {
                    state.push(FormAction::EditScore { entrant, metric, raw });
                }
            }
            ui.end_row();
        }
    });

    ui.add_space(12.0);
    if ui.button("Generate Strategy Canvas").clicked() {
        state.push(FormAction::Submit);
    }
}

fn render_review(ui: &mut egui::Ui, session: &CanvasSession, state: &mut AppState) {
    let Some(matrix) = session.matrix() else {
        return;
    };

    ui.horizontal(|ui| {
        ui.heading("Strategy Canvas");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Edit Data").clicked() {
                state.push(FormAction::ReturnToEdit);
            }
        });
    });
    if let Some(canvas) = session.chart() {
        chart_view::render_chart(ui, &canvas, session.config().layout);
    }

    ui.add_space(12.0);
    ui.heading("Score Matrix Review");
    egui::Grid::new("review_scores").striped(true).show(ui, |ui| {
        ui.strong("Competitor");
        for metric in matrix.metrics() {
            ui.strong(&metric.name);
        }
        ui.end_row();

        for (entrant, row) in matrix.entrants().iter().enumerate() {
            ui.label(&row.name);
            for (metric, score) in row.scores.iter().enumerate() {
                if let Some(raw) = score_cell(ui, Some(*score)) {
                    state.push(FormAction::EditReviewScore { entrant, metric, raw });
                }
            }
            ui.end_row();
        }
    });
}
