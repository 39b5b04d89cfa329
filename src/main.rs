use clap::Parser;
use logdeck::cli::{
    commands, handle_completions, handle_config_init, view, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::View(args) => run_with_tracing(&args.common, view::handle_view(&args)).await,
        Commands::Logs(args) => {
            run_with_tracing(&args.common, commands::handle_logs(&args)).await
        }
        Commands::Series(args) => {
            run_with_tracing(&args.common, commands::handle_series(&args)).await
        }
        Commands::Summary(args) => {
            run_with_tracing(&args.common, commands::handle_summary(&args)).await
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing from the command's config layers, then run the
/// handler and print its output.
async fn run_with_tracing(
    common: &logdeck::cli::CommonArgs,
    handler: impl std::future::Future<Output = anyhow::Result<String>>,
) -> anyhow::Result<()> {
    let config = logdeck::cli::load_config_with_overrides(common)?;
    if let Err(e) = logdeck::logging::init_tracing(&config.logging) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let output = handler.await?;
    println!("{}", output);
    Ok(())
}
