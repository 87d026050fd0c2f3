pub mod config;
pub mod core;
pub mod domain;
pub mod formats;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Storage};

pub use crate::core::{engine::AnalysisEngine, pipeline::TrackPipeline};
pub use domain::model::{
    AnalysisResult, AnalysisSettings, LatLng, StopPoint, TrackFormat, TrackPoint,
};
pub use utils::error::{Result, TrackError};
