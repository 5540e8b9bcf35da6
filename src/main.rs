use anyhow::{Context, Result};
use clap::Parser;
use gh_issue_assistant::{
    analyze::{IssueAnalyzer, IssueRequest},
    cli::{Cli, Commands},
    config::Credentials,
    error::user_friendly_error,
    server, ui, Config,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        user_friendly_error(&e).display();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // The terminal UI owns the screen, so it only logs when asked to
    let interactive = matches!(cli.command, Commands::Ui { .. });
    if !interactive || cli.verbose > 0 {
        setup_logging(cli.verbose)?;
    }

    info!("Loading configuration");
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { bind } => serve_command(config, bind),
        Commands::Ui { backend_url } => ui_command(config, backend_url),
        Commands::Analyze {
            repo_url,
            issue_number,
        } => analyze_command(config, repo_url, issue_number),
    }
}

fn setup_logging(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start async runtime")
}

fn serve_command(config: Config, bind: Option<String>) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let analyzer = IssueAnalyzer::from_config(&config, &credentials)?;
    let addr = bind.unwrap_or(config.server.bind);

    info!("Using model {} at {}", config.llm.model, config.llm.api_url);
    runtime()?.block_on(server::run_server(&addr, analyzer))
}

fn ui_command(mut config: Config, backend_url: Option<String>) -> Result<()> {
    if let Some(url) = backend_url {
        config.ui.backend_url = url;
    }
    ui::run(&config.ui)
}

fn analyze_command(config: Config, repo_url: String, issue_number: u64) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let analyzer = IssueAnalyzer::from_config(&config, &credentials)?;
    let request = IssueRequest {
        repo_url,
        issue_number,
    };

    let result = runtime()?
        .block_on(analyzer.analyze(&request))
        .context("Analysis failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );
    Ok(())
}
