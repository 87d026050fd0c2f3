use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use rest_with_gps::config::lambda::{LambdaConfig, S3Storage};
use rest_with_gps::utils::{logger, validation::Validate};
use rest_with_gps::{AnalysisEngine, TrackPipeline};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Request {
    pub s3_bucket: Option<String>,
    pub input_key: Option<String>,
    pub s3_prefix: Option<String>,
    pub min_stop_minutes: Option<i64>,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub output_path: String,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting rest-with-gps Lambda function");

    // event fields override the environment
    if let Some(bucket) = &event.payload.s3_bucket {
        std::env::set_var("S3_BUCKET", bucket);
    }
    if let Some(key) = &event.payload.input_key {
        std::env::set_var("INPUT_KEY", key);
    }
    if let Some(prefix) = &event.payload.s3_prefix {
        std::env::set_var("S3_PREFIX", prefix);
    }
    if let Some(min_stop) = event.payload.min_stop_minutes {
        std::env::set_var("MIN_STOP_MINUTES", min_stop.to_string());
    }

    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let region = Region::new(lambda_config.s3_region.clone());
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(region)
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(config);

    let storage = S3Storage::new(
        s3_client,
        lambda_config.s3_bucket.clone(),
        lambda_config.s3_prefix.clone(),
    );
    let pipeline = TrackPipeline::new(storage, lambda_config);

    let engine = AnalysisEngine::new(pipeline);
    let output_path = engine
        .run()
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!("Lambda function completed successfully");
    Ok(Response {
        message: "Track analysis completed successfully".to_string(),
        output_path,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
