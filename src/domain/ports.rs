use crate::domain::model::{AnalysisResult, AnalysisSettings, TrackFormat, TrackPoint};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Byte-level storage backend.
///
/// `read_file` resolves the path as given (input recordings can live
/// anywhere); `write_file` resolves relative to the backend's output root.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Explicit format override; falls back to extension detection when None.
    fn format(&self) -> Option<TrackFormat>;
    fn settings(&self) -> AnalysisSettings;
    /// Anchor timestamp for Strava streams, which only carry offsets.
    fn start_time(&self) -> Option<DateTime<Utc>>;
    fn map_link_base(&self) -> &str;
    fn bundle(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<TrackPoint>>;
    async fn transform(&self, points: Vec<TrackPoint>) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<String>;
}
