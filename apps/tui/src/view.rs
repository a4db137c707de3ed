use crate::app::{App, Field, Status};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout as Split, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, Paragraph, Row, Table},
};
use strategy_canvas::{FieldKey, Layout, PRICE_METRIC, Rgb, SeriesRole, StrategyCanvas, ViewMode};

const FOCUS: Style = Style::new().add_modifier(Modifier::REVERSED);

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Text shown for a field: the live buffer while typing, otherwise the stored value.
fn field_display(app: &App, field: Field) -> String {
    match (&app.input, app.focused() == Some(field)) {
        (Some(buffer), true) => format!("{buffer}█"),
        _ => app.field_text(field),
    }
}

fn field_style(app: &App, field: Field) -> Style {
    if app.focused() == Some(field) {
        FOCUS
    } else {
        Style::default()
    }
}

/// Body split for the configured layout: stacked when compact, side by side when wide.
fn split_body(area: Rect, layout: Layout, first: u16) -> (Rect, Rect) {
    let direction = match layout {
        Layout::Compact => Direction::Vertical,
        Layout::Wide => Direction::Horizontal,
    };
    let chunks = Split::default()
        .direction(direction)
        .constraints([Constraint::Percentage(first), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Split::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(2)])
        .split(frame.size());

    HeaderView::render(frame, chunks[0], app.session.mode());

    let layout = app.session.config().layout;
    match app.session.mode() {
        ViewMode::Editing => {
            let (names, grid) = split_body(chunks[1], layout, 40);
            NamesView::render(frame, names, app);
            ScoreGridView::render(frame, grid, app);
        }
        ViewMode::Reviewing => {
            let (chart, grid) = split_body(chunks[1], layout, 60);
            if let Some(canvas) = app.session.chart() {
                ChartView::render(frame, chart, &canvas);
            }
            ScoreGridView::render(frame, grid, app);
        }
    }

    FooterView::render(frame, chunks[2], app);
}

// --- HeaderView ---
pub struct HeaderView;

impl HeaderView {
    pub fn render(frame: &mut Frame, area: Rect, mode: ViewMode) {
        let content = Line::from(vec![
            Span::styled(" Strategy Canvas ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Mode: "),
            Span::styled(mode.to_string(), Style::default().fg(Color::Cyan)),
        ]);
        frame.render_widget(Paragraph::new(content).block(Block::default().borders(Borders::BOTTOM)), area);
    }
}

// --- NamesView ---
pub struct NamesView;

impl NamesView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let draft = app.session.draft();
        let errors = app.session.errors();
        let mut entries = vec![(Field::CompanyName, "Company".to_string(), FieldKey::CompanyName)];
        entries.extend(
            (0..draft.competitors().len())
                .map(|i| (Field::CompetitorName(i), format!("Competitor {}", i + 1), FieldKey::Competitor(i))),
        );
        entries.extend(
            (0..draft.features().len())
                .map(|i| (Field::FeatureName(i), format!("Feature {}", i + 1), FieldKey::Feature(i))),
        );

        let items: Vec<ListItem> = entries
            .into_iter()
            .map(|(field, label, key)| {
                let mut spans = vec![
                    Span::raw(format!("{label:<14}")),
                    Span::styled(field_display(app, field), field_style(app, field)),
                ];
                if let Some(message) = errors.get(key) {
                    spans.push(Span::styled(format!("  {message}"), Style::default().fg(Color::Red)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Names "));
        frame.render_widget(list, area);
    }
}

// --- ScoreGridView ---
pub struct ScoreGridView;

impl ScoreGridView {
    fn headers(app: &App) -> Vec<String> {
        match app.session.matrix() {
            Some(matrix) if app.session.mode() == ViewMode::Reviewing => {
                matrix.metrics().iter().map(|m| m.name.clone()).collect()
            }
            _ => std::iter::once(PRICE_METRIC.to_string())
                .chain(app.session.draft().feature_names().into_iter().enumerate().map(|(i, name)| {
                    if name.trim().is_empty() {
                        format!("Feature {}", i + 1)
                    } else {
                        name.to_string()
                    }
                }))
                .collect(),
        }
    }

    fn row_labels(app: &App) -> Vec<String> {
        match app.session.matrix() {
            Some(matrix) if app.session.mode() == ViewMode::Reviewing => {
                matrix.entrants().iter().map(|e| e.name.clone()).collect()
            }
            _ => {
                let draft = app.session.draft();
                std::iter::once(draft.company_display_name().to_string())
                    .chain(draft.competitors().iter().enumerate().map(|(i, row)| {
                        if row.name.trim().is_empty() {
                            format!("Competitor {}", i + 1)
                        } else {
                            row.name.clone()
                        }
                    }))
                    .collect()
            }
        }
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let headers = Self::headers(app);
        let metric_count = headers.len();

        let header = Row::new(
            std::iter::once(Cell::from("Competitor"))
                .chain(headers.into_iter().map(Cell::from)),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = Self::row_labels(app)
            .into_iter()
            .enumerate()
            .map(|(entrant, label)| {
                let cells = (0..metric_count).map(|metric| {
                    let field = Field::Score { entrant, metric };
                    let mut text = field_display(app, field);
                    if text.is_empty() {
                        text.push('-');
                    }
                    Cell::from(text).style(field_style(app, field))
                });
                Row::new(std::iter::once(Cell::from(label)).chain(cells))
            })
            .collect();

        let widths = std::iter::once(Constraint::Length(14))
            .chain(std::iter::repeat(Constraint::Length(9)).take(metric_count));
        let title = match app.session.mode() {
            ViewMode::Editing => " Scores (0-100) ",
            ViewMode::Reviewing => " Score Matrix Review ",
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(table, area);
    }
}

// --- ChartView ---
pub struct ChartView;

/// One `(category index, score)` list per series, in series order.
pub fn series_points(canvas: &StrategyCanvas) -> Vec<Vec<(f64, f64)>> {
    canvas
        .series
        .iter()
        .map(|style| {
            canvas
                .points
                .iter()
                .enumerate()
                .filter_map(|(i, point)| point.get(&style.name).map(|v| (i as f64, f64::from(v))))
                .collect()
        })
        .collect()
}

impl ChartView {
    pub fn render(frame: &mut Frame, area: Rect, canvas: &StrategyCanvas) {
        let points = series_points(canvas);
        let datasets: Vec<Dataset> = canvas
            .series
            .iter()
            .zip(&points)
            .map(|(style, data)| {
                let mut line_style = Style::default().fg(rgb(style.color));
                if style.role == SeriesRole::Company {
                    line_style = line_style.add_modifier(Modifier::BOLD);
                }
                Dataset::default()
                    .name(style.name.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(line_style)
                    .data(data)
            })
            .collect();

        let last = canvas.points.len().saturating_sub(1).max(1) as f64;
        let x_labels: Vec<Span> = canvas.points.iter().map(|p| Span::raw(p.metric.clone())).collect();
        let y_labels: Vec<Span> = ["0", "50", "100"].into_iter().map(Span::raw).collect();

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title(" Strategy Canvas "))
            .x_axis(Axis::default().bounds([0.0, last]).labels(x_labels))
            .y_axis(Axis::default().bounds([0.0, 100.0]).labels(y_labels));
        frame.render_widget(chart, area);
    }
}

// --- FooterView ---
pub struct FooterView;

impl FooterView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let status = match &app.status {
            Some(Status::Info(message)) => Span::styled(message.clone(), Style::default().fg(Color::Green)),
            Some(Status::Error(message)) => Span::styled(message.clone(), Style::default().fg(Color::Red)),
            None => Span::raw(""),
        };
        let help = if app.input_mode() {
            "Enter save · Esc cancel"
        } else {
            match app.session.mode() {
                ViewMode::Editing => "↑↓ move · Enter edit · a/f add · x remove · s submit · r reset · q quit",
                ViewMode::Reviewing => "↑↓ move · Enter edit · e edit data · r reset · q quit",
            }
        };
        let lines = vec![
            Line::from(status),
            Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Action;
    use ratatui::{Terminal, backend::TestBackend};
    use strategy_canvas::CanvasConfig;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn reviewed_app(layout: Layout) -> App {
        let mut app = App::new(CanvasConfig {
            initial_competitors: 1,
            initial_features: 1,
            layout,
            ..CanvasConfig::default()
        });
        app.session.set_company_name("Acme").unwrap();
        app.session.set_competitor_name(0, "Rival").unwrap();
        app.session.set_feature_name(0, "Speed").unwrap();
        app.session.set_score(1, 1, "80").unwrap();
        app.dispatch(Action::Submit).unwrap();
        app
    }

    #[test]
    fn editing_screen_shows_names_and_grid() {
        let app = App::new(CanvasConfig::default());
        let text = screen(&app);
        assert!(text.contains("Names"));
        assert!(text.contains("Scores (0-100)"));
        assert!(text.contains("Price"));
    }

    #[test]
    fn validation_messages_appear_next_to_names() {
        let mut app = App::new(CanvasConfig::default());
        app.dispatch(Action::Submit).unwrap();
        assert!(screen(&app).contains("Company Name is required"));
    }

    #[test]
    fn review_screen_draws_chart_in_both_layouts() {
        for layout in [Layout::Compact, Layout::Wide] {
            let text = screen(&reviewed_app(layout));
            assert!(text.contains("Strategy Canvas"));
            assert!(text.contains("Score Matrix Review"));
            assert!(text.contains("Rival"));
        }
    }

    #[test]
    fn series_points_follow_category_order() {
        let app = reviewed_app(Layout::Compact);
        let canvas = app.session.chart().unwrap();
        let points = series_points(&canvas);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], vec![(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(points[1], vec![(0.0, 0.0), (1.0, 80.0)]);
    }
}
