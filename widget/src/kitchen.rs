use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use souschef_core::{GenerationOutcome, GenerationRequest, TextGenerator};

use crate::AliveFlag;

/// Pause before the demo-mode idea lands, so the fallback doesn't feel
/// instant.
const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1000);

/// A project idea as served by the Experimental Kitchen.
///
/// Fields are defaulted so a payload with missing keys still deserializes,
/// and extra keys are ignored. No schema validation beyond JSON
/// well-formedness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecipeIdea {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl RecipeIdea {
    /// Served when no API key is configured.
    fn demo_mode() -> Self {
        Self {
            title: "Demo Mode Soufflé".to_string(),
            description: "No API key is configured, so here is a sample result.".to_string(),
            features: vec![
                "Add API Key to Enable AI".to_string(),
                "Interactive UI".to_string(),
                "Real-time generation".to_string(),
            ],
        }
    }

    /// Served when the model's answer cannot be parsed as JSON.
    fn burnt_toast() -> Self {
        Self {
            title: "Burnt Toast (Error)".to_string(),
            description: "The AI Chef got confused. Please try simpler ingredients.".to_string(),
            features: vec!["Try Again".to_string(), "Check the logs".to_string()],
        }
    }
}

fn idea_prompt(ingredients: &str) -> String {
    format!(
        "Create a unique web project idea using: {ingredients}. Return JSON ONLY: \
         {{ \"title\": \"...\", \"description\": \"...\", \"features\": [\"...\"] }}."
    )
}

/// Greedy brace-delimited extraction: first `{` through last `}`, falling
/// back to the whole text when no such span exists. Tolerates prose the
/// model wraps around its JSON. Known quirk: a `}` inside a JSON string
/// value extends the span; preserved as-is rather than tokenizing.
fn extract_braced(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// The Experimental Kitchen's state: one idea slot, replaced wholesale on
/// every attempt. Never merges or accumulates across attempts.
pub struct IdeaGenerator {
    generator: Arc<dyn TextGenerator>,
    idea: Option<RecipeIdea>,
    loading: bool,
    alive: AliveFlag,
    fallback_delay: Duration,
}

impl IdeaGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            idea: None,
            loading: false,
            alive: AliveFlag::new(),
            fallback_delay: DEFAULT_FALLBACK_DELAY,
        }
    }

    /// Override the artificial fallback delay (tests use zero).
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    pub fn idea(&self) -> Option<&RecipeIdea> {
        self.idea.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Handle for the hosting view to revoke on teardown.
    pub fn alive_flag(&self) -> AliveFlag {
        self.alive.clone()
    }

    /// Ask the model to cook up a project idea from free-text ingredients.
    ///
    /// Blank ingredients are rejected before any call is attempted. Every
    /// failure resolves to one of the two fixed fallback ideas; parse
    /// failure is terminal, never retried against the model.
    pub async fn cook(&mut self, ingredients: &str) {
        if ingredients.trim().is_empty() {
            return;
        }

        self.loading = true;
        self.idea = None;

        let request = GenerationRequest::new(idea_prompt(ingredients));
        let outcome = self.generator.generate(request).await;

        let idea = match outcome {
            GenerationOutcome::Success(text) => {
                let extracted = extract_braced(&text);
                match serde_json::from_str::<RecipeIdea>(extracted) {
                    Ok(idea) => idea,
                    Err(e) => {
                        warn!(error = %e, "Model answer was not parseable JSON");
                        RecipeIdea::burnt_toast()
                    }
                }
            }
            GenerationOutcome::Unavailable | GenerationOutcome::TransportError(_) => {
                tokio::time::sleep(self.fallback_delay).await;
                RecipeIdea::demo_mode()
            }
        };

        if !self.alive.is_alive() {
            debug!("Kitchen torn down mid-flight; discarding idea");
            return;
        }

        self.idea = Some(idea);
        self.loading = false;
    }
}
