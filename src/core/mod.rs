pub mod engine;
pub mod geo;
pub mod map;
pub mod pipeline;
pub mod report;
pub mod smoothing;
pub mod stops;

pub use crate::domain::model::{AnalysisResult, AnalysisSettings, TrackFormat, TrackPoint};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
