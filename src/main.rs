use clap::Parser;
use speedo::cli::Cli;
use speedo::{LoopExit, SpeedoEngine};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Missing FILES prints usage to stderr and exits with status 2
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(exit) => {
            // Leave the last status line intact
            println!();
            tracing::info!(?exit, "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("speedo: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> speedo::Result<LoopExit> {
    let config = cli.resolve_config()?;

    let mut builder = SpeedoEngine::builder()
        .config(config)
        .files(cli.files.iter().cloned());
    if let Some(index) = cli.device {
        builder = builder.output_device(index);
    }

    builder.build()?.run()
}
