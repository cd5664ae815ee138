use clap::Parser;
use tracing::info;

use memc_load::prelude::*;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    CliApp::new("memc-load").run(|| run(args)).await
}

/// Main application logic - validates config, sets up logging, runs the load
async fn run(args: CliArgs) -> Result<(), AppError> {
    let config = LoaderConfig::try_from(args)?;
    init_logging(config.verbose, config.log_file.as_deref())?;

    if config.self_test {
        let checked = run_codec_self_test()?;
        info!(checked, "Codec self-test passed");
        println!("Codec self-test passed ({checked} records)");
        return Ok(());
    }

    info!(
        pattern = %config.pattern,
        dry = config.dry_run,
        concurrency = config.concurrency,
        "memc-load started"
    );

    // Error rates are reported per file in the log; they never change the exit code.
    let orchestrator = PipelineOrchestrator::new(config.file_processor(), config.pattern.clone());
    orchestrator.run().await?;

    Ok(())
}
