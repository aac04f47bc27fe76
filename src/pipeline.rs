use std::{fs, path::Path};

use tracing::info;

use crate::{
    config::HintSettings,
    error::PipelineError,
    extract,
    feed::Feed,
    game::GameData,
    hints, render, store,
};

pub const GAME_DATA_FILE:    &str = "game_data.json";
pub const HINTS_FILE:        &str = "hints.json";
pub const EXPLANATIONS_FILE: &str = "explanations.json";
pub const PAGE_FILE:         &str = "index.html";

pub fn extract_file(feed: &Path) -> Result<GameData, PipelineError> {
    let feed: Feed = store::read_json(feed)?;
    let game = extract::extract(feed)?;
    info!(title = %game.title, clues = game.clues.len(), "Feed extracted");
    Ok(game)
}

/// Runs the whole pipeline into `out_dir`, creating it if needed.
pub async fn build(
    feed: &Path,
    template: &Path,
    out_dir: &Path,
    hint_settings: Option<&HintSettings>,
) -> Result<(), PipelineError> {
    fs::create_dir_all(out_dir).map_err(|e| PipelineError::write(out_dir, e))?;

    let game = extract_file(feed)?;
    let game_data = out_dir.join(GAME_DATA_FILE);
    store::write_json(&game_data, &game)?;

    match hint_settings {
        Some(settings) => {
            hints::run(
                settings,
                &game.clues,
                &out_dir.join(HINTS_FILE),
                &out_dir.join(EXPLANATIONS_FILE),
            )
            .await?;
        }
        None => info!("Skipping hint generation"),
    }

    render::render_files(template, &game_data, &out_dir.join(PAGE_FILE))?;
    info!(out_dir = %out_dir.display(), "Build complete");
    Ok(())
}
