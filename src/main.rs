use clap::Parser;
use rest_with_gps::config::toml_config::TomlConfig;
use rest_with_gps::domain::ports::ConfigProvider;
use rest_with_gps::utils::error::ErrorSeverity;
use rest_with_gps::utils::{logger, validation::Validate};
use rest_with_gps::{AnalysisEngine, CliConfig, LocalStorage, TrackPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting rest-with-gps");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Some(path) = cli.config.clone() {
        tracing::info!(
            "Loading configuration from: {} (analysis flags on the command line are ignored)",
            path
        );
        let config = TomlConfig::from_file(&path)?;
        let monitor = cli.monitor || config.monitoring_enabled();
        run(config, monitor).await
    } else {
        let monitor = cli.monitor;
        run(cli, monitor).await
    }
}

async fn run<C>(config: C, monitor: bool) -> anyhow::Result<()>
where
    C: ConfigProvider + Validate + 'static,
{
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    if monitor {
        tracing::info!("System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = TrackPipeline::new(storage, config);
    let engine = AnalysisEngine::new_with_monitoring(pipeline, monitor);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("Analysis completed successfully");
            println!("Map saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            eprintln!("Hint: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
