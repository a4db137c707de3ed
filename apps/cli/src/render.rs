use strategy_canvas::{Layout, ScoreMatrix, StrategyCanvas};

fn column_width(layout: Layout) -> usize {
    match layout {
        Layout::Compact => 8,
        Layout::Wide => 14,
    }
}

fn fit(text: &str, width: usize) -> String {
    let shown: String = text.chars().take(width).collect();
    format!("{shown:<width$}")
}

/// Entrants as rows, metrics as columns, company first.
pub fn matrix_table(matrix: &ScoreMatrix, layout: Layout) -> String {
    let width = column_width(layout);
    let name_width = matrix
        .entrants()
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Competitor".len());

    let mut out = fit("Competitor", name_width);
    for metric in matrix.metrics() {
        out.push_str(" | ");
        out.push_str(&fit(&metric.name, width));
    }
    out = out.trim_end().to_string();
    out.push('\n');
    out.push_str(&"-".repeat(name_width + matrix.metrics().len() * (width + 3)));
    for entrant in matrix.entrants() {
        out.push('\n');
        let mut line = fit(&entrant.name, name_width);
        for score in &entrant.scores {
            line.push_str(" | ");
            line.push_str(&fit(&score.to_string(), width));
        }
        out.push_str(line.trim_end());
    }
    out
}

pub fn chart_lines(canvas: &StrategyCanvas) -> String {
    let mut lines = Vec::with_capacity(canvas.points.len() + 1);
    let legend = canvas
        .series
        .iter()
        .map(|s| format!("{} {}", s.name, s.color))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Series: {legend}"));
    for point in &canvas.points {
        let values = point
            .values
            .iter()
            .map(|v| format!("{}={}", v.series, v.value))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("{}: {values}", point.metric));
    }
    lines.join("\n")
}
