//! Hint and explanation generation.
//!
//! Every clue gets three labelled hints and a step-by-step explanation from
//! a chat model. Results are cached on disk by model, prompt revision, clue
//! and answer, so re-running over the same puzzle only pays for new clues.
//! Without an API key nothing is generated and the outputs are rebuilt from
//! the cache alone.

pub mod cache;
pub mod client;
pub mod prompts;
pub mod validate;

use std::{collections::BTreeMap, path::Path, time::Duration};

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::{config::HintSettings, error::PipelineError, game::ClueEntry, store};
use cache::{cache_key, HintCache};
use client::{ChatClient, LlmError};
use validate::{validate_explanation, validate_hints, Explanation, ValidationError};

const MAX_ATTEMPTS: u32 = 2;
const RETRY_PAUSE: Duration = Duration::from_millis(500);

pub type HintMap = BTreeMap<String, Vec<String>>;
pub type ExplanationMap = BTreeMap<String, Explanation>;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("no valid output after retrying: {0}")]
    Invalid(ValidationError),
}

/// Counts logged at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HintReport {
    pub hints:        usize,
    pub explanations: usize,
    pub generated:    usize,
    pub failed:       usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobKind {
    Full,
    ExplanationOnly,
}

struct Job {
    word:  String,
    key:   String,
    clue:  ClueEntry,
    kind:  JobKind,
}

enum Outcome {
    Full { hints: Vec<String>, explanation: Explanation },
    Explanation(Explanation),
}

/// Calls the model and keeps asking, with a stricter prompt, until the
/// output validates or attempts run out. Transport and API errors are not
/// retried here.
#[derive(Clone)]
struct Generator {
    client: ChatClient,
}

impl Generator {
    async fn with_retry<T>(
        &self,
        system: &str,
        mut prompt: String,
        retry_note: &str,
        validate: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> Result<T, GenerateError> {
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let raw = self.client.complete(system, &prompt).await?;
            match validate(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(attempt, error = %e, "Model output rejected");
                    last_err = Some(e);
                    prompt.push_str(retry_note);
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
            }
        }

        Err(GenerateError::Invalid(
            last_err.unwrap_or(ValidationError::NotJson("response")),
        ))
    }

    async fn hints(&self, clue: &ClueEntry) -> Result<Vec<String>, GenerateError> {
        self.with_retry(prompts::HINT_SYSTEM, prompts::hint_prompt(clue), prompts::HINT_RETRY, |raw| {
            validate_hints(raw, &clue.answer)
        })
        .await
    }

    async fn explanation(&self, clue: &ClueEntry) -> Result<Explanation, GenerateError> {
        self.with_retry(
            prompts::EXPLANATION_SYSTEM,
            prompts::explanation_prompt(clue),
            prompts::EXPLANATION_RETRY,
            |raw| validate_explanation(raw, &clue.answer),
        )
        .await
    }

    async fn run(self, job: Job) -> (Job, Result<Outcome, GenerateError>) {
        let outcome = match job.kind {
            JobKind::Full => match self.hints(&job.clue).await {
                Ok(hints) => self
                    .explanation(&job.clue)
                    .await
                    .map(|explanation| Outcome::Full { hints, explanation }),
                Err(e) => Err(e),
            },
            JobKind::ExplanationOnly => self.explanation(&job.clue).await.map(Outcome::Explanation),
        };
        (job, outcome)
    }
}

/// Produces `hints_out` and `explanations_out` for `clues`, updating the
/// cache at `settings.cache_file`.
pub async fn run(
    settings: &HintSettings,
    clues: &[ClueEntry],
    hints_out: &Path,
    explanations_out: &Path,
) -> Result<HintReport, PipelineError> {
    let model = settings.model();
    let mut cache = HintCache::load(&settings.cache_file);

    let Some(api_key) = settings.api_key() else {
        return materialize_from_cache(
            &cache,
            &model,
            &settings.prompt_version,
            clues,
            hints_out,
            explanations_out,
        );
    };

    if clues.is_empty() {
        store::write_json(hints_out, &HintMap::new())?;
        info!("No clues found; wrote empty hints");
        return Ok(HintReport::default());
    }

    let mut hints = HintMap::new();
    let mut explanations = ExplanationMap::new();
    let mut jobs = Vec::new();

    for clue in clues {
        let word = clue.key();
        let key = cache_key(&model, &settings.prompt_version, &clue.clue, &clue.answer);

        let kind = match cache.get(&key) {
            Some(entry) => {
                hints.insert(word.clone(), entry.hints.clone());
                match entry.explanation.as_ref().filter(|e| !e.is_empty()) {
                    Some(explanation) => {
                        explanations.insert(word, explanation.clone());
                        continue;
                    }
                    None => JobKind::ExplanationOnly,
                }
            }
            None => JobKind::Full,
        };
        jobs.push(Job { word, key, clue: clue.clone(), kind });
    }

    info!(
        model = %model,
        queued = jobs.len(),
        cached = clues.len() - jobs.len(),
        concurrency = settings.concurrency,
        "Generating hints"
    );

    let client = ChatClient::new(
        settings.api_url.clone(),
        api_key.to_string(),
        model,
        Duration::from_secs(settings.timeout_secs),
    )?;
    let generator = Generator { client };

    let mut report = HintReport::default();
    let mut pending = jobs.into_iter();
    let mut running = JoinSet::new();
    let limit = settings.concurrency.max(1);

    loop {
        while running.len() < limit {
            match pending.next() {
                Some(job) => {
                    running.spawn(generator.clone().run(job));
                }
                None => break,
            }
        }

        let Some(joined) = running.join_next().await else {
            break;
        };

        match joined {
            Ok((job, Ok(Outcome::Full { hints: generated, explanation }))) => {
                hints.insert(job.word.clone(), generated.clone());
                explanations.insert(job.word, explanation.clone());
                cache.insert(job.key, generated, explanation);
                report.generated += 1;
            }
            Ok((job, Ok(Outcome::Explanation(explanation)))) => {
                let known = hints.get(&job.word).cloned().unwrap_or_default();
                explanations.insert(job.word, explanation.clone());
                cache.set_explanation(job.key, known, explanation);
                report.generated += 1;
            }
            Ok((job, Err(e))) => {
                error!(word = %job.word, number = %job.clue.number, error = %e, "Generation failed for clue");
                report.failed += 1;
            }
            Err(e) => {
                error!(error = %e, "Generation task aborted");
                report.failed += 1;
            }
        }
    }

    store::write_json(hints_out, &hints)?;
    store::write_json(explanations_out, &explanations)?;
    cache.save(&settings.cache_file)?;

    report.hints = hints.len();
    report.explanations = explanations.len();
    info!(
        hints = report.hints,
        explanations = report.explanations,
        failed = report.failed,
        cached = cache.len(),
        "Hints written"
    );
    Ok(report)
}

/// Rebuilds the outputs from cached entries only. A target is written when
/// there is data for it or when it does not exist yet; an existing file is
/// never replaced with an empty one.
fn materialize_from_cache(
    cache: &HintCache,
    model: &str,
    prompt_version: &str,
    clues: &[ClueEntry],
    hints_out: &Path,
    explanations_out: &Path,
) -> Result<HintReport, PipelineError> {
    let mut hints = HintMap::new();
    let mut explanations = ExplanationMap::new();

    for clue in clues {
        let key = cache_key(model, prompt_version, &clue.clue, &clue.answer);
        if let Some(entry) = cache.get(&key) {
            hints.insert(clue.key(), entry.hints.clone());
            if let Some(explanation) = entry.explanation.as_ref().filter(|e| !e.is_empty()) {
                explanations.insert(clue.key(), explanation.clone());
            }
        }
    }

    let wrote_hints = write_unless_clobbering(hints_out, &hints)?;
    let wrote_explanations = write_unless_clobbering(explanations_out, &explanations)?;

    info!(
        hints = hints.len(),
        explanations = explanations.len(),
        wrote_hints,
        wrote_explanations,
        "OPENAI_API_KEY not set; materialized from cache"
    );

    Ok(HintReport {
        hints: hints.len(),
        explanations: explanations.len(),
        ..HintReport::default()
    })
}

fn write_unless_clobbering<V: serde::Serialize>(
    path: &Path,
    map: &BTreeMap<String, V>,
) -> Result<bool, PipelineError> {
    if map.is_empty() && path.exists() {
        return Ok(false);
    }
    store::write_json(path, map)?;
    Ok(true)
}
