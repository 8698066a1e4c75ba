//! The filter → translate → re-filter pipeline.

use crate::{instruction_for, parse_model_output};
use atelier_core::{
    EmptyOutputPolicy, Endpoint, LogContext, PromptSettings, PromptStage, StageSettings,
};
use atelier_error::{AtelierResult, ExtractionError};
use atelier_models::{ChatCompleter, ChatMessage, ChatRequest};
use derive_getters::Getters;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One executed model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct PromptStep {
    /// Which stage ran
    stage: PromptStage,
    /// Model that was asked
    model: String,
    /// Text sent to the model
    input: String,
    /// Text the stage produced
    output: String,
    /// True when the model gave nothing usable and the input was kept
    passed_through: bool,
}

/// Outcome of [`PromptProcessor::process`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct ProcessedPrompt {
    /// Prompt as submitted
    original: String,
    /// Prompt to send upstream
    prompt: String,
    /// Model calls, in execution order
    steps: Vec<PromptStep>,
}

impl ProcessedPrompt {
    fn unchanged(original: &str) -> Self {
        Self {
            original: original.to_string(),
            prompt: original.to_string(),
            steps: Vec::new(),
        }
    }

    /// True when the final prompt differs from the submitted one.
    pub fn changed(&self) -> bool {
        self.prompt != self.original
    }

    /// Consume into the final prompt.
    pub fn into_prompt(self) -> String {
        self.prompt
    }
}

/// Rewrites prompts through the configured filter and translate models.
#[derive(Clone)]
pub struct PromptProcessor {
    settings: PromptSettings,
    endpoint: Endpoint,
    completer: Arc<dyn ChatCompleter>,
    log: LogContext,
}

impl std::fmt::Debug for PromptProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptProcessor")
            .field("settings", &self.settings)
            .field("base_url", &self.endpoint.base_url)
            .finish_non_exhaustive()
    }
}

impl PromptProcessor {
    /// Create a processor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the stage settings are incoherent, or if a stage
    /// is enabled while the chat endpoint lacks a base URL or API key.
    pub fn new(
        settings: PromptSettings,
        endpoint: Endpoint,
        completer: Arc<dyn ChatCompleter>,
        log: LogContext,
    ) -> AtelierResult<Self> {
        settings.validate()?;
        if settings.any_enabled() {
            endpoint.require("prompt")?;
        }
        Ok(Self {
            settings,
            endpoint,
            completer,
            log: log.child("prompt"),
        })
    }

    /// The stage settings in force.
    pub fn settings(&self) -> &PromptSettings {
        &self.settings
    }

    /// Run the enabled stages over `original`.
    ///
    /// With no stage enabled the prompt comes back unchanged without any model call.
    /// When translation runs, its output is always re-filtered with the filter model.
    ///
    /// # Errors
    ///
    /// Propagates upstream failures. With [`EmptyOutputPolicy::Fail`], a stage whose
    /// reply carries no text fails with an extraction error.
    pub async fn process(&self, original: &str) -> AtelierResult<ProcessedPrompt> {
        self.log.instrument(self.run(original)).await
    }

    async fn run(&self, original: &str) -> AtelierResult<ProcessedPrompt> {
        if !self.settings.any_enabled() {
            debug!("No prompt stages enabled");
            return Ok(ProcessedPrompt::unchanged(original));
        }

        let mut processed = ProcessedPrompt::unchanged(original);

        if self.settings.filter.enabled {
            self.apply(&mut processed, PromptStage::Filter, &self.settings.filter)
                .await?;
        }

        if self.settings.translate.enabled {
            self.apply(&mut processed, PromptStage::Translate, &self.settings.translate)
                .await?;
            self.apply(&mut processed, PromptStage::Filter, &self.settings.filter)
                .await?;
        }

        info!(
            steps = processed.steps.len(),
            changed = processed.changed(),
            "Prompt processed"
        );
        Ok(processed)
    }

    async fn apply(
        &self,
        processed: &mut ProcessedPrompt,
        stage: PromptStage,
        stage_settings: &StageSettings,
    ) -> AtelierResult<()> {
        let step = self
            .run_stage(stage, stage_settings, &processed.prompt)
            .await?;
        processed.prompt = step.output.clone();
        processed.steps.push(step);
        Ok(())
    }

    async fn run_stage(
        &self,
        stage: PromptStage,
        stage_settings: &StageSettings,
        input: &str,
    ) -> AtelierResult<PromptStep> {
        let model = stage_settings.model.trim().to_string();
        let request = ChatRequest::new(
            model.clone(),
            vec![
                ChatMessage::system(instruction_for(stage, stage_settings)),
                ChatMessage::user(input),
            ],
        );

        debug!(%stage, model = %model, "Running prompt stage");
        let completion = self.completer.complete(&self.endpoint, &request).await?;

        let parsed = completion.text().and_then(|t| parse_model_output(&t));
        let (output, passed_through) = match parsed {
            Some(output) => (output, false),
            None => match self.settings.empty_output {
                EmptyOutputPolicy::Fail => {
                    return Err(ExtractionError::new(format!(
                        "{} model '{}' returned no usable text",
                        stage, model
                    ))
                    .into());
                }
                EmptyOutputPolicy::PassThrough => {
                    warn!(%stage, model = %model, "Empty stage output, keeping input");
                    (input.to_string(), true)
                }
            },
        };

        Ok(PromptStep {
            stage,
            model,
            input: input.to_string(),
            output,
            passed_through,
        })
    }
}
