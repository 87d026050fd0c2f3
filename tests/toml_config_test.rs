use rest_with_gps::config::toml_config::TomlConfig;
use rest_with_gps::domain::ports::ConfigProvider;
use rest_with_gps::utils::validation::Validate;
use rest_with_gps::{AnalysisEngine, LocalStorage, TrackPipeline};
use std::fs;
use tempfile::TempDir;

/// A ride with a single long pause, anchored at the configured start time.
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
async fn toml_configured_run_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("commute.json");
    fs::write(&input, strava_export()).unwrap();
    let output = temp_dir.path().join("maps");

    let toml_content = format!(
        r#"
[track]
input = "{}"
start_time = "2023-08-20T10:00:00Z"

[analysis]
min_stop_minutes = 5
utc_offset_hours = 0

[output]
path = "{}"
bundle = true
"#,
        input.display(),
        output.display()
    );
    let config_path = temp_dir.path().join("rest-with-gps.toml");
    fs::write(&config_path, toml_content).unwrap();

    let config = TomlConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.settings().utc_offset_hours, 0);
    assert!(config.bundle());

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TrackPipeline::new(storage, config);
    let output_path = AnalysisEngine::new(pipeline).run().await.unwrap();
    assert!(output_path.ends_with("commute_map.html"));

    let html = fs::read_to_string(output.join("commute_map.html")).unwrap();
    // zero display offset, so the 10:00:50 stop keeps its UTC hour
    assert!(html.contains("20/10:00"));
    assert!(output.join("commute_report.zip").exists());
}

#[tokio::test]
async fn toml_env_substitution_reaches_the_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("commute.json");
    fs::write(&input, strava_export()).unwrap();
    let output = temp_dir.path().join("maps");

    std::env::set_var("RWG_TEST_INPUT", input.to_str().unwrap());

    let toml_content = format!(
        r#"
[track]
input = "${{RWG_TEST_INPUT}}"
start_time = "2023-08-20T10:00:00Z"

[output]
path = "{}"
"#,
        output.display()
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    std::env::remove_var("RWG_TEST_INPUT");

    assert_eq!(config.input_path(), input.to_str().unwrap());
    config.validate().unwrap();

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TrackPipeline::new(storage, config);
    AnalysisEngine::new(pipeline).run().await.unwrap();

    assert!(output.join("commute_map.html").exists());
}

#[test]
fn broken_toml_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(&config_path, "[track\ninput =").unwrap();

    assert!(TomlConfig::from_file(&config_path).is_err());
}

#[test]
fn missing_config_file_is_an_io_error() {
    assert!(TomlConfig::from_file("/nonexistent/rest-with-gps.toml").is_err());
}
