//! Stop-list reports: CSV, GeoJSON and the ZIP bundle.

use crate::domain::model::{AnalysisResult, AnalysisSettings, StopPoint};
use crate::utils::error::{Result, TrackError};
use chrono::Duration;
use serde_json::json;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub struct ReportBuilder {
    settings: AnalysisSettings,
}

impl ReportBuilder {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    fn qualifying_stops<'a>(&self, result: &'a AnalysisResult) -> Vec<&'a StopPoint> {
        result
            .stops
            .iter()
            .filter(|s| s.duration() >= Duration::minutes(self.settings.min_stop_minutes))
            .collect()
    }

    /// One row per qualifying stop, RFC 3339 timestamps.
    pub fn stops_csv(&self, result: &AnalysisResult) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "latitude",
            "longitude",
            "start_time",
            "end_time",
            "duration_minutes",
        ])?;

        for stop in self.qualifying_stops(result) {
            writer.write_record([
                stop.latitude.to_string(),
                stop.longitude.to_string(),
                stop.start_time.to_rfc3339(),
                stop.end_time.to_rfc3339(),
                stop.elapsed_minutes().to_string(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| TrackError::ProcessingError {
                message: format!("failed to finish CSV report: {}", e),
            })?;
        String::from_utf8(bytes).map_err(|e| TrackError::ProcessingError {
            message: format!("CSV report is not valid UTF-8: {}", e),
        })
    }

    /// FeatureCollection: route as a LineString, each qualifying stop as a
    /// Point with duration properties. GeoJSON positions are [lng, lat].
    /// A LineString needs at least two positions (RFC 7946), so a route
    /// that simplified down to a single vertex is left out.
    pub fn geojson(&self, result: &AnalysisResult) -> Result<String> {
        let route_coords: Vec<[f64; 2]> = result.route.iter().map(|p| [p.lng, p.lat]).collect();

        let mut features = Vec::new();
        if route_coords.len() >= 2 {
            features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": route_coords,
                },
                "properties": { "kind": "route" },
            }));
        }

        for stop in self.qualifying_stops(result) {
            features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [stop.longitude, stop.latitude],
                },
                "properties": {
                    "kind": "stop",
                    "start_time": stop.start_time.to_rfc3339(),
                    "end_time": stop.end_time.to_rfc3339(),
                    "duration_minutes": stop.elapsed_minutes(),
                },
            }));
        }

        let collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });

        Ok(serde_json::to_string_pretty(&collection)?)
    }

    /// ZIP with the stop list, the GeoJSON track and a copy of the map page.
    pub fn bundle(&self, result: &AnalysisResult, map_html: &str) -> Result<Vec<u8>> {
        let csv_output = self.stops_csv(result)?;
        let geojson_output = self.geojson(result)?;

        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("stops.csv", options)?;
        zip.write_all(csv_output.as_bytes())?;

        zip.start_file("track.geojson", options)?;
        zip.write_all(geojson_output.as_bytes())?;

        zip.start_file("map.html", options)?;
        zip.write_all(map_html.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}
