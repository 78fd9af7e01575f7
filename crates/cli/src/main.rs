mod cli;
mod discover;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avtools_core::{
    load_config, load_env_config, validate_config, Config, OperationError, OperationReport,
    Orchestrator, SystemRunner,
};

use cli::{cut_range, extract_mode, remove_targets, Cli, Command};

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "AVTOOLS_CONFIG";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        match e.downcast_ref::<OperationError>() {
            Some(op) if op.is_no_chapters() => error!("There are no chapters"),
            _ => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load(cli.global.config.clone())?;
    validate_config(&config).context("Configuration validation failed")?;

    let profile = config
        .profile(cli.global.profile.as_deref())
        .context("Failed to select profile")?;
    let options = cli.command.options(&cli.global);

    let runner = SystemRunner::new().verbose(cli.global.verbose);
    let orchestrator = Orchestrator::new(runner, &config);

    let media = match cli.command.input() {
        Some(input) => Some(
            orchestrator
                .probe(input)
                .await
                .with_context(|| format!("Failed to probe {:?}", input))?,
        ),
        None => None,
    };

    let report = match (cli.command, media) {
        (Command::Join { ext }, _) => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            let files = discover::sibling_files(&cwd, &ext)
                .with_context(|| format!("Failed to list {:?}", cwd))?;
            debug!(count = files.len(), ext = %ext, "Found files to join");
            orchestrator.join(&files, &ext, &profile, &options).await?
        }
        (Command::Show { .. }, Some(media)) => {
            println!("{}", orchestrator.show(&media, &options).await?);
            OperationReport::default()
        }
        (
            Command::Extract {
                cue, cover, meta, ..
            },
            Some(media),
        ) => {
            let mode = extract_mode(cue, cover, meta);
            orchestrator.extract(&media, &profile, &options, mode).await?
        }
        (
            Command::Rm {
                chapters,
                cover,
                meta,
                ..
            },
            Some(media),
        ) => {
            let targets = remove_targets(chapters, cover, meta);
            orchestrator.remove(&media, &profile, &options, targets).await?
        }
        (
            Command::Cut {
                chapter,
                start,
                end,
                ..
            },
            Some(media),
        ) => {
            let range = cut_range(chapter, start, end);
            orchestrator.cut(&media, &profile, &options, range).await?
        }
        (Command::Split { .. }, Some(media)) => {
            orchestrator.split(&media, &profile, &options).await?
        }
        (Command::Update { .. }, Some(media)) => {
            orchestrator.update(&media, &profile, &options).await?
        }
        (_, None) => anyhow::bail!("No input file given"),
    };

    for output in &report.outputs {
        info!("Wrote {}", output);
    }

    Ok(())
}

/// Loads `--config`, else `$AVTOOLS_CONFIG`, else defaults plus environment.
fn load(explicit: Option<PathBuf>) -> Result<Config> {
    let path = explicit.or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

    match path {
        Some(path) => {
            debug!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_env_config().context("Failed to load configuration from environment"),
    }
}
