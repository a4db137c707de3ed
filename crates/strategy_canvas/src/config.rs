use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::score::ScorePolicy;

pub const CONFIG_ENV: &str = "CANVAS_CONFIG";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("expected #RRGGBB color, got {s:?}"));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const DEFAULT_COMPANY_COLOR: Rgb = Rgb::new(0xFF, 0x00, 0x00);
pub const DEFAULT_COMPETITOR_COLORS: [Rgb; 4] = [
    Rgb::new(0x4B, 0x00, 0x82),
    Rgb::new(0x9B, 0x87, 0x0C),
    Rgb::new(0x00, 0x00, 0xFF),
    Rgb::new(0x00, 0x64, 0x00),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub company: Rgb,
    pub competitors: Vec<Rgb>,
    pub company_stroke: f32,
    pub competitor_stroke: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            company: DEFAULT_COMPANY_COLOR,
            competitors: DEFAULT_COMPETITOR_COLORS.to_vec(),
            company_stroke: 3.0,
            competitor_stroke: 2.0,
        }
    }
}

impl Palette {
    /// Color of competitor `index`, cycling through the palette.
    pub fn competitor_color(&self, index: usize) -> Rgb {
        if self.competitors.is_empty() {
            DEFAULT_COMPETITOR_COLORS[index % DEFAULT_COMPETITOR_COLORS.len()]
        } else {
            self.competitors[index % self.competitors.len()]
        }
    }
}

/// Presentation variant shared by every front end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Compact,
    Wide,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub score_policy: ScorePolicy,
    pub initial_competitors: usize,
    pub initial_features: usize,
    pub palette: Palette,
    pub layout: Layout,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            score_policy: ScorePolicy::default(),
            initial_competitors: 3,
            initial_features: 5,
            palette: Palette::default(),
            layout: Layout::default(),
        }
    }
}

impl CanvasConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CanvasError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        info!("loaded canvas config from {}", path.display());
        Ok(config)
    }

    /// Explicit path first, then `CANVAS_CONFIG`, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, CanvasError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
