//! Score-matrix entry and strategy-canvas projection.
//!
//! A [`CanvasSession`] owns the entry form ([`Draft`]), validates it on submit, snapshots
//! it into a [`ScoreMatrix`] and derives chart data from that matrix on demand.

pub mod config;
pub mod draft;
pub mod error;
pub mod matrix;
pub mod projection;
pub mod score;
pub mod session;
pub mod validate;

pub use config::{CanvasConfig, Layout, Palette, Rgb};
pub use draft::{Draft, DraftRow, FeatureSlot};
pub use error::CanvasError;
pub use matrix::{Entrant, EntrantId, FeatureId, Metric, ScoreMatrix, DEFAULT_COMPANY_NAME, PRICE_METRIC};
pub use projection::{
    project, series_styles, strategy_canvas, ChartPoint, SeriesRole, SeriesStyle, SeriesValue, StrategyCanvas,
};
pub use score::{CellInput, Score, ScorePolicy, ScoreRejection};
pub use session::{CanvasSession, TransitionResult, ViewEvent, ViewMode, ViewModeMachine};
pub use validate::{validate, FieldKey, ValidationErrors};
