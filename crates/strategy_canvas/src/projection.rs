//! Pivots the entrant-major score matrix into the metric-major records a line chart
//! consumes: one point per metric, one series per named entrant.

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeStruct, Serializer};

use crate::config::{Palette, Rgb};
use crate::matrix::{DEFAULT_COMPANY_NAME, ScoreMatrix};
use crate::validate::is_blank;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesValue {
    pub series: String,
    pub value: u8,
}

/// One category on the chart's x axis.
///
/// Serializes as `{"name": <metric>, "values": {<series>: <value>, ...}}`. Series sit in
/// their own map so no entrant name can collide with the category key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartPoint {
    pub metric: String,
    pub values: Vec<SeriesValue>,
}

impl ChartPoint {
    pub fn get(&self, series: &str) -> Option<u8> {
        self.values.iter().find(|v| v.series == series).map(|v| v.value)
    }

    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.series.as_str())
    }
}

struct SeriesMap<'a>(&'a [SeriesValue]);

impl Serialize for SeriesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for value in self.0 {
            map.serialize_entry(&value.series, &value.value)?;
        }
        map.end()
    }
}

impl Serialize for ChartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut point = serializer.serialize_struct("ChartPoint", 2)?;
        point.serialize_field("name", &self.metric)?;
        point.serialize_field("values", &SeriesMap(&self.values))?;
        point.end()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    Company,
    Competitor,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub name: String,
    pub color: Rgb,
    pub stroke_width: f32,
    pub role: SeriesRole,
}

/// Everything a chart collaborator needs to draw the strategy canvas.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrategyCanvas {
    pub points: Vec<ChartPoint>,
    pub series: Vec<SeriesStyle>,
}

/// `(entrant index, series name)` for every entrant that gets a line.
///
/// Company first, blank competitors skipped, first entrant wins on a name clash.
fn charted_entrants(matrix: &ScoreMatrix) -> Vec<(usize, &str)> {
    let mut charted: Vec<(usize, &str)> = Vec::with_capacity(matrix.entrants().len());
    for (index, entrant) in matrix.entrants().iter().enumerate() {
        let name = match (index, is_blank(&entrant.name)) {
            (0, true) => DEFAULT_COMPANY_NAME,
            (_, true) => continue,
            (_, false) => entrant.name.as_str(),
        };
        if charted.iter().any(|(_, seen)| *seen == name) {
            continue;
        }
        charted.push((index, name));
    }
    charted
}

pub fn project(matrix: &ScoreMatrix) -> Vec<ChartPoint> {
    let charted = charted_entrants(matrix);
    matrix
        .metrics()
        .iter()
        .enumerate()
        .map(|(metric_index, metric)| ChartPoint {
            metric: metric.name.clone(),
            values: charted
                .iter()
                .map(|&(entrant_index, name)| SeriesValue {
                    series: name.to_string(),
                    value: matrix
                        .score(entrant_index, metric_index)
                        .map(u8::from)
                        .unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}

/// Colors come from the entrant's position, so they never change between renders.
pub fn series_styles(matrix: &ScoreMatrix, palette: &Palette) -> Vec<SeriesStyle> {
    charted_entrants(matrix)
        .into_iter()
        .map(|(entrant_index, name)| {
            if entrant_index == 0 {
                SeriesStyle {
                    name: name.to_string(),
                    color: palette.company,
                    stroke_width: palette.company_stroke,
                    role: SeriesRole::Company,
                }
            } else {
                SeriesStyle {
                    name: name.to_string(),
                    color: palette.competitor_color(entrant_index - 1),
                    stroke_width: palette.competitor_stroke,
                    role: SeriesRole::Competitor,
                }
            }
        })
        .collect()
}

pub fn strategy_canvas(matrix: &ScoreMatrix, palette: &Palette) -> StrategyCanvas {
    StrategyCanvas {
        points: project(matrix),
        series: series_styles(matrix, palette),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COMPETITOR_COLORS;
    use crate::matrix::{Entrant, EntrantId, Metric};
    use crate::score::Score;

    fn matrix(rows: &[(&str, &[i64])], features: &[&str]) -> ScoreMatrix {
        let entrants = rows
            .iter()
            .enumerate()
            .map(|(i, (name, scores))| Entrant {
                id: EntrantId(i as u64),
                name: name.to_string(),
                scores: scores.iter().map(|&s| Score::new(s).unwrap()).collect(),
            })
            .collect();
        let metrics = std::iter::once(Metric::price())
            .chain(features.iter().map(|f| Metric::feature(*f)))
            .collect();
        ScoreMatrix::new(entrants, metrics).unwrap()
    }

    #[test]
    fn pivots_to_one_point_per_metric() {
        let m = matrix(&[("Acme", &[10, 20]), ("X", &[30, 40])], &["Speed"]);
        let points = project(&m);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].metric, "Price");
        assert_eq!(points[0].get("Acme"), Some(10));
        assert_eq!(points[1].metric, "Speed");
        assert_eq!(points[1].get("X"), Some(40));
    }

    #[test]
    fn blank_competitors_are_not_series() {
        let m = matrix(&[("Acme", &[1]), ("", &[2]), ("  ", &[3]), ("Z", &[4])], &[]);
        let points = project(&m);
        let names: Vec<_> = points[0].series_names().collect();
        assert_eq!(names, vec!["Acme", "Z"]);
    }

    #[test]
    fn blank_company_charts_as_default_name() {
        let m = matrix(&[("", &[7])], &[]);
        assert_eq!(project(&m)[0].get(DEFAULT_COMPANY_NAME), Some(7));
    }

    #[test]
    fn competitor_named_like_company_does_not_replace_it() {
        let m = matrix(&[("Acme", &[10]), ("Acme", &[90])], &[]);
        let point = &project(&m)[0];
        assert_eq!(point.values.len(), 1);
        assert_eq!(point.get("Acme"), Some(10));
    }

    #[test]
    fn colors_are_indexed_by_competitor_position() {
        let m = matrix(
            &[("Acme", &[0]), ("A", &[0]), ("", &[0]), ("C", &[0]), ("D", &[0]), ("E", &[0])],
            &[],
        );
        let styles = series_styles(&m, &Palette::default());
        assert_eq!(styles[0].role, SeriesRole::Company);
        assert_eq!(styles[0].stroke_width, 3.0);
        let color_of = |name: &str| styles.iter().find(|s| s.name == name).unwrap().color;
        assert_eq!(color_of("A"), DEFAULT_COMPETITOR_COLORS[0]);
        assert_eq!(color_of("C"), DEFAULT_COMPETITOR_COLORS[2]);
        assert_eq!(color_of("E"), DEFAULT_COMPETITOR_COLORS[0]);
    }

    #[test]
    fn chart_point_nests_series_values() {
        let m = matrix(&[("Acme", &[50]), ("X", &[25])], &[]);
        let json = serde_json::to_value(&project(&m)[0]).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Price", "values": {"Acme": 50, "X": 25}}));
    }

    #[test]
    fn series_named_name_keeps_the_category_label() {
        let m = matrix(&[("Acme", &[0, 0]), ("name", &[42, 0])], &["Speed"]);
        let json = serde_json::to_value(project(&m)).unwrap();
        assert_eq!(json[0]["name"], "Price");
        assert_eq!(json[1]["name"], "Speed");
        assert_eq!(json[0]["values"]["name"], 42);
        assert_eq!(json[0]["values"]["Acme"], 0);
    }
}
