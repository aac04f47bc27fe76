use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL:   &str = "gpt-4o-mini";

#[derive(Parser, Debug)]
#[command(
    name    = "crossword-press",
    about   = "Turns a crossword puzzle feed into a static, browser-playable page",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve every clue's answer from a puzzle feed and emit game data.
    Extract(ExtractArgs),

    /// Generate hints and explanations for the clues in a game-data file.
    Hints(HintsArgs),

    /// Substitute game data into an HTML template.
    Render(RenderArgs),

    /// Run extract, hints and render into one output directory.
    Build(BuildArgs),

    /// Preview a built directory over HTTP.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Puzzle feed JSON.
    pub feed: PathBuf,

    /// Write here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HintsArgs {
    /// Game data produced by `extract`.
    pub game_data: PathBuf,

    pub hints_out: PathBuf,

    #[arg(default_value = "explanations.json")]
    pub explanations_out: PathBuf,

    #[command(flatten)]
    pub settings: HintSettings,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    pub template: PathBuf,
    pub data:     PathBuf,
    pub output:   PathBuf,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    pub feed:     PathBuf,
    pub template: PathBuf,

    #[arg(long, default_value = "site")]
    pub out_dir: PathBuf,

    /// Leave hint generation out of the build.
    #[arg(long)]
    pub skip_hints: bool,

    #[command(flatten)]
    pub settings: HintSettings,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Directory holding `index.html` and its data files.
    #[arg(default_value = "site")]
    pub dir: PathBuf,

    /// Host address to listen on.
    #[arg(long, env = "CROSSWORD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "CROSSWORD_PORT", default_value_t = 3000)]
    pub port: u16,
}

impl ServeArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Args, Debug, Clone)]
pub struct HintSettings {
    /// API key for the chat-completions endpoint. Without one, outputs are
    /// rebuilt from the cache and nothing new is generated.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Model name. Falls back to OPENAI_MODEL, then gpt-4o-mini.
    #[arg(long, env = "HINTS_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "OPENAI_MODEL", hide = true)]
    pub openai_model: Option<String>,

    /// Maximum number of clues generated at once.
    #[arg(long, env = "HINTS_CONCURRENCY", default_value_t = 10)]
    pub concurrency: usize,

    #[arg(long, env = "HINTS_CACHE_FILE", default_value = "hints_cache.json")]
    pub cache_file: PathBuf,

    /// Bump to invalidate every cached result.
    #[arg(long, env = "HINTS_PROMPT_VERSION", default_value = "v4-2025-08-31")]
    pub prompt_version: String,

    #[arg(long, env = "HINTS_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

impl HintSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("HINTS_CONCURRENCY must be at least 1");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("HINTS_TIMEOUT_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn model(&self) -> String {
        self.model
            .iter()
            .chain(self.openai_model.iter())
            .find(|m| !m.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}
