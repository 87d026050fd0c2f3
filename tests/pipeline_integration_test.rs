use rest_with_gps::{AnalysisEngine, CliConfig, LocalStorage, TrackPipeline, TrackError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Short ride with one ten-minute coffee stop, as a Strava streams export.
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

fn config_for(input: &Path, output: &Path) -> CliConfig {
    CliConfig {
        input: input.to_str().unwrap().to_string(),
        output_path: output.to_str().unwrap().to_string(),
        min_stop: 5,
        min_speed: 5.0,
        smoothing_interval: 10,
        utc_offset: 2,
        format: None,
        start_time: Some("2023-08-20T10:00:00Z".to_string()),
        map_link_base: "https://maps.google.com/maps".to_string(),
        bundle: false,
        config: None,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn end_to_end_strava_ride_produces_a_map() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ride.json");
    fs::write(&input, strava_export()).unwrap();
    let output = temp_dir.path().join("output");

    let config = config_for(&input, &output);
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = TrackPipeline::new(storage, config);
    let engine = AnalysisEngine::new_with_monitoring(pipeline, false);

    let result = engine.run().await;
    assert!(result.is_ok());

    let output_file_path = result.unwrap();
    assert!(output_file_path.ends_with("ride_map.html"));

    let map_path = output.join("ride_map.html");
    assert!(map_path.exists());

    let html = fs::read_to_string(&map_path).unwrap();
    assert!(html.contains("L.polyline"));
    assert!(html.contains("#e4007f"));
    // the ten-minute stop is rendered with a marker and a circle
    assert!(html.contains("L.marker([48.004, 11])"));
    assert!(html.contains("circleMarker"));
    // stop opened 10:00:50 UTC, shown with the +2h display offset
    assert!(html.contains("20/12:00"));
}

#[tokio::test]
async fn end_to_end_with_bundle_writes_the_report_zip() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ride.json");
    fs::write(&input, strava_export()).unwrap();
    let output = temp_dir.path().join("output");

    let mut config = config_for(&input, &output);
    config.bundle = true;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = TrackPipeline::new(storage, config);

    AnalysisEngine::new(pipeline).run().await.unwrap();

    let bundle_path = output.join("ride_report.zip");
    assert!(bundle_path.exists());

    let zip_data = fs::read(&bundle_path).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 3);

    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["map.html", "stops.csv", "track.geojson"]);

    let mut csv_content = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("stops.csv").unwrap(),
        &mut csv_content,
    )
    .unwrap();
    assert!(csv_content.starts_with("latitude,longitude,start_time,end_time,duration_minutes"));
    assert!(csv_content.contains("48.004"));
}

#[tokio::test]
async fn large_min_stop_hides_the_stop_markers() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ride.json");
    fs::write(&input, strava_export()).unwrap();
    let output = temp_dir.path().join("output");

    let mut config = config_for(&input, &output);
    config.min_stop = 20;
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = TrackPipeline::new(storage, config);

    AnalysisEngine::new(pipeline).run().await.unwrap();

    let html = fs::read_to_string(output.join("ride_map.html")).unwrap();
    assert!(html.contains("L.polyline"));
    assert!(!html.contains("L.marker"));
}

#[tokio::test]
async fn empty_export_fails_with_processing_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ride.json");
    fs::write(
        &input,
        r#"[{"type": "latlng", "data": []}, {"type": "time", "data": []}]"#,
    )
    .unwrap();
    let output = temp_dir.path().join("output");

    let config = config_for(&input, &output);
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = TrackPipeline::new(storage, config);

    let err = AnalysisEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, TrackError::ProcessingError { .. }));
}

#[tokio::test]
async fn corrupt_fit_file_fails_with_decode_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("ride.fit");
    fs::write(&input, b"this is not a fit file").unwrap();
    let output = temp_dir.path().join("output");

    let config = config_for(&input, &output);
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = TrackPipeline::new(storage, config);

    let err = AnalysisEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, TrackError::FitError(_)));
}
