use crate::core::map::MapRenderer;
use crate::core::report::ReportBuilder;
use crate::core::{smoothing, stops};
use crate::domain::model::{AnalysisResult, TrackFormat, TrackPoint};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::formats;
use crate::utils::error::{Result, TrackError};
use std::path::Path;

pub struct TrackPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> TrackPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn resolve_format(&self) -> Result<TrackFormat> {
        self.config
            .format()
            .or_else(|| TrackFormat::from_path(self.config.input_path()))
            .ok_or_else(|| TrackError::UnsupportedFormatError {
                path: self.config.input_path().to_string(),
            })
    }

    fn output_stem(&self) -> String {
        Path::new(self.config.input_path())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("track")
            .to_string()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TrackPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<TrackPoint>> {
        let format = self.resolve_format()?;
        tracing::debug!(
            "Reading {} recording from: {}",
            format,
            self.config.input_path()
        );

        let data = self.storage.read_file(self.config.input_path()).await?;
        tracing::debug!("Read {} bytes", data.len());

        let source = formats::source_for(format, self.config.start_time());
        source.read_points(&data)
    }

    async fn transform(&self, points: Vec<TrackPoint>) -> Result<AnalysisResult> {
        if points.is_empty() {
            return Err(TrackError::ProcessingError {
                message: "track contains no positional records".to_string(),
            });
        }

        let settings = self.config.settings();
        let smoothed = smoothing::smooth(&points, settings.smoothing_interval_secs);
        tracing::debug!(
            "Smoothed {} raw points into {} windows",
            points.len(),
            smoothed.len()
        );

        let (stops, route) = stops::detect(&smoothed, &settings);
        tracing::debug!("Found {} stops, {} route points", stops.len(), route.len());

        Ok(AnalysisResult {
            stops,
            route,
            raw_point_count: points.len(),
            smoothed_point_count: smoothed.len(),
        })
    }

    async fn load(&self, result: AnalysisResult) -> Result<String> {
        let settings = self.config.settings();
        let stem = self.output_stem();

        let renderer = MapRenderer::new(settings, self.config.map_link_base());
        let html = renderer.render(&result)?;

        let map_name = format!("{}_map.html", stem);
        tracing::debug!("Writing map page ({} bytes) to {}", html.len(), map_name);
        self.storage.write_file(&map_name, html.as_bytes()).await?;

        if self.config.bundle() {
            let builder = ReportBuilder::new(settings);
            let bundle = builder.bundle(&result, &html)?;
            let bundle_name = format!("{}_report.zip", stem);
            tracing::debug!(
                "Writing report bundle ({} bytes) to {}",
                bundle.len(),
                bundle_name
            );
            self.storage.write_file(&bundle_name, &bundle).await?;
        }

        Ok(format!("{}/{}", self.config.output_path(), map_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AnalysisSettings;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self::default()
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                TrackError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input: String,
        bundle: bool,
        start_time: Option<DateTime<Utc>>,
    }

    impl MockConfig {
        fn new(input: &str) -> Self {
            Self {
                input: input.to_string(),
                bundle: false,
                start_time: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn format(&self) -> Option<TrackFormat> {
            None
        }

        fn settings(&self) -> AnalysisSettings {
            AnalysisSettings::default()
        }

        fn start_time(&self) -> Option<DateTime<Utc>> {
            self.start_time
        }

        fn map_link_base(&self) -> &str {
            "https://maps.google.com/maps"
        }

        fn bundle(&self) -> bool {
            self.bundle
        }
    }

    /// Moving leg, 10 minute stop, moving leg again, as a streams export.
    fn strava_export() -> String {
        let mut latlngs = Vec::new();
        let mut times = Vec::new();
        let mut t = 0i64;

        for i in 0..5 {
            latlngs.push([48.0 + i as f64 * 0.001, 11.0]);
            times.push(t);
            t += 10;
        }
        for _ in 0..60 {
            latlngs.push([48.004, 11.0]);
            times.push(t);
            t += 10;
        }
        for i in 1..5 {
            latlngs.push([48.004 + i as f64 * 0.001, 11.0]);
            times.push(t);
            t += 10;
        }

        serde_json::json!([
            {"type": "latlng", "data": latlngs},
            {"type": "time", "data": times}
        ])
        .to_string()
    }

    #[tokio::test]
    async fn extract_dispatches_on_extension() {
        let storage = MockStorage::new();
        storage
            .put_file("ride.json", strava_export().as_bytes())
            .await;
        let pipeline = TrackPipeline::new(storage, MockConfig::new("ride.json"));

        let points = pipeline.extract().await.unwrap();
        assert_eq!(points.len(), 69);
        assert_eq!(points[0].latitude, 48.0);
    }

    #[tokio::test]
    async fn extract_rejects_unknown_extension() {
        let storage = MockStorage::new();
        storage.put_file("ride.gpx", b"<gpx/>").await;
        let pipeline = TrackPipeline::new(storage, MockConfig::new("ride.gpx"));

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, TrackError::UnsupportedFormatError { .. }));
    }

    #[tokio::test]
    async fn extract_missing_file_is_io_error() {
        let pipeline = TrackPipeline::new(MockStorage::new(), MockConfig::new("ride.json"));
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, TrackError::IoError(_)));
    }

    #[tokio::test]
    async fn transform_rejects_empty_track() {
        let pipeline = TrackPipeline::new(MockStorage::new(), MockConfig::new("ride.json"));
        let err = pipeline.transform(vec![]).await.unwrap_err();
        assert!(matches!(err, TrackError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn transform_finds_the_parked_interval() {
        let storage = MockStorage::new();
        storage
            .put_file("ride.json", strava_export().as_bytes())
            .await;
        let mut config = MockConfig::new("ride.json");
        config.start_time = Some(Utc.with_ymd_and_hms(2023, 8, 20, 10, 0, 0).unwrap());
        let pipeline = TrackPipeline::new(storage, config);

        let points = pipeline.extract().await.unwrap();
        let result = pipeline.transform(points).await.unwrap();

        assert_eq!(result.raw_point_count, 69);
        assert_eq!(result.stops.len(), 1);
        assert!(result.stops[0].duration() >= chrono::Duration::minutes(9));
        assert!(!result.route.is_empty());
    }

    #[tokio::test]
    async fn load_writes_the_map_page() {
        let storage = MockStorage::new();
        storage
            .put_file("ride.json", strava_export().as_bytes())
            .await;
        let pipeline = TrackPipeline::new(storage.clone(), MockConfig::new("ride.json"));

        let points = pipeline.extract().await.unwrap();
        let result = pipeline.transform(points).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "test_output/ride_map.html");
        let html = storage.get_file("ride_map.html").await.unwrap();
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("L.polyline"));
        assert!(html.contains("L.marker"));
    }

    #[tokio::test]
    async fn load_with_bundle_writes_the_report_zip() {
        let storage = MockStorage::new();
        storage
            .put_file("ride.json", strava_export().as_bytes())
            .await;
        let mut config = MockConfig::new("ride.json");
        config.bundle = true;
        let pipeline = TrackPipeline::new(storage.clone(), config);

        let points = pipeline.extract().await.unwrap();
        let result = pipeline.transform(points).await.unwrap();
        pipeline.load(result).await.unwrap();

        let bundle = storage.get_file("ride_report.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bundle)).unwrap();
        assert_eq!(archive.len(), 3);
        assert!(archive.by_name("stops.csv").is_ok());
    }
}
