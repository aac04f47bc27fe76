mod config;
mod error;
mod extract;
mod feed;
mod game;
mod hints;
mod pipeline;
mod render;
mod routes;
mod serve;
mod store;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignored silently if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crossword_press=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract(args) => {
            let game = pipeline::extract_file(&args.feed)
                .with_context(|| format!("Failed to extract {}", args.feed.display()))?;
            match args.output {
                Some(path) => store::write_json(&path, &game)?,
                None => println!("{}", serde_json::to_string_pretty(&game)?),
            }
        }

        Command::Hints(args) => {
            args.settings.validate().context("Invalid configuration")?;
            let game: game::GameData = store::read_json(&args.game_data)?;
            hints::run(&args.settings, &game.clues, &args.hints_out, &args.explanations_out).await?;
        }

        Command::Render(args) => {
            render::render_files(&args.template, &args.data, &args.output)
                .context("Failed to render page")?;
        }

        Command::Build(args) => {
            args.settings.validate().context("Invalid configuration")?;
            let settings = (!args.skip_hints).then_some(&args.settings);
            pipeline::build(&args.feed, &args.template, &args.out_dir, settings)
                .await
                .context("Build failed")?;
        }

        Command::Serve(args) => serve::serve(args).await?,
    }

    Ok(())
}
