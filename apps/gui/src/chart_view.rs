use eframe::egui;
use strategy_canvas::{Layout, Rgb, Score, StrategyCanvas};

const AXIS_LEFT: f32 = 36.0;
const AXIS_BOTTOM: f32 = 28.0;
const PAD: f32 = 12.0;
const GRID_STEP: u8 = 20;

pub fn to_color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

fn chart_height(layout: Layout) -> f32 {
    match layout {
        Layout::Compact => 320.0,
        Layout::Wide => 440.0,
    }
}

/// Drawing area inside the axes.
pub fn plot_rect(outer: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        egui::pos2(outer.left() + AXIS_LEFT, outer.top() + PAD),
        egui::pos2(outer.right() - PAD, outer.bottom() - AXIS_BOTTOM),
    )
}

/// Categories sit at the centers of equal-width bands.
pub fn category_x(index: usize, count: usize, plot: egui::Rect) -> f32 {
    let band = plot.width() / count.max(1) as f32;
    plot.left() + band * (index as f32 + 0.5)
}

pub fn value_y(value: u8, plot: egui::Rect) -> f32 {
    let max = f32::from(Score::MAX.value());
    plot.bottom() - plot.height() * f32::from(value.min(Score::MAX.value())) / max
}

pub fn nearest_category(x: f32, count: usize, plot: egui::Rect) -> Option<usize> {
    if count == 0 || x < plot.left() || x > plot.right() {
        return None;
    }
    let band = plot.width() / count as f32;
    Some((((x - plot.left()) / band) as usize).min(count - 1))
}

pub fn render_chart(ui: &mut egui::Ui, canvas: &StrategyCanvas, layout: Layout) {
    let size = egui::vec2(ui.available_width(), chart_height(layout));
    let (outer, response) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(outer);
    let plot = plot_rect(outer);
    let text_color = ui.visuals().text_color();
    let grid_color = ui.visuals().weak_text_color().gamma_multiply(0.4);
    let font = egui::FontId::proportional(12.0);

    painter.rect_filled(outer, 2.0, ui.visuals().extreme_bg_color);

    for tick in (0..=Score::MAX.value()).step_by(usize::from(GRID_STEP)) {
        let y = value_y(tick, plot);
        painter.extend(egui::Shape::dashed_line(
            &[egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
            egui::Stroke::new(1.0, grid_color),
            4.0,
            4.0,
        ));
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            egui::Align2::RIGHT_CENTER,
            tick.to_string(),
            font.clone(),
            text_color,
        );
    }

    let count = canvas.points.len();
    for (i, point) in canvas.points.iter().enumerate() {
        painter.text(
            egui::pos2(category_x(i, count, plot), plot.bottom() + 6.0),
            egui::Align2::CENTER_TOP,
            &point.metric,
            font.clone(),
            text_color,
        );
    }

    let hovered = response
        .hover_pos()
        .and_then(|pos| nearest_category(pos.x, count, plot));
    if let Some(i) = hovered {
        let x = category_x(i, count, plot);
        painter.line_segment(
            [egui::pos2(x, plot.top()), egui::pos2(x, plot.bottom())],
            egui::Stroke::new(1.0, grid_color),
        );
    }

    for style in &canvas.series {
        let color = to_color32(style.color);
        let points: Vec<egui::Pos2> = canvas
            .points
            .iter()
            .enumerate()
            .filter_map(|(i, point)| {
                let value = point.get(&style.name)?;
                Some(egui::pos2(category_x(i, count, plot), value_y(value, plot)))
            })
            .collect();
        painter.add(egui::Shape::line(
            points.clone(),
            egui::Stroke::new(style.stroke_width, color),
        ));
        for p in points {
            painter.circle_filled(p, style.stroke_width + 1.0, color);
        }
    }

    if let Some(i) = hovered {
        let point = &canvas.points[i];
        response.on_hover_ui_at_pointer(|ui| {
            ui.strong(&point.metric);
            for style in &canvas.series {
                if let Some(value) = point.get(&style.name) {
                    ui.colored_label(to_color32(style.color), format!("{}: {value}", style.name));
                }
            }
        });
    }

    render_legend(ui, canvas);
}

fn render_legend(ui: &mut egui::Ui, canvas: &StrategyCanvas) {
    ui.horizontal_wrapped(|ui| {
        for style in &canvas.series {
            let (swatch, _) = ui.allocate_exact_size(egui::vec2(18.0, 10.0), egui::Sense::hover());
            ui.painter().line_segment(
                [swatch.left_center(), swatch.right_center()],
                egui::Stroke::new(style.stroke_width, to_color32(style.color)),
            );
            ui.label(&style.name);
            ui.add_space(8.0);
        }
    });
}
