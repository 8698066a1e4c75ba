//! The generation pipeline: resolve, rewrite, police, dispatch.

use atelier_blocklist::{BlocklistCache, BlocklistPolicy};
use atelier_config::AtelierConfig;
use atelier_core::{
    Attachment, Endpoint, GenerateResult, LogContext, ResolvedModel, SoraGenerateRequest,
};
use atelier_error::{AtelierResult, ConfigError, RequestError};
use atelier_models::{ChatCompleter, ChatCompletionClient};
use atelier_prompt::{ProcessedPrompt, PromptProcessor};
use atelier_video::{CharacterCard, CharacterCardClient, ModelCatalog, SoraApiClient, VideoAdapter};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Runs a generation request through every stage between the user and the upstream.
///
/// 1. The model is resolved against the catalog (and the expected channel, if given).
/// 2. Attachments are checked against what the channel accepts.
/// 3. The prompt processor rewrites and translates the prompt.
/// 4. The blocklist checks the final prompt.
/// 5. The video adapter calls the channel and extracts the result.
///
/// Any failure aborts the attempt.
#[derive(Debug, Clone)]
pub struct GenerationService {
    catalog: ModelCatalog,
    prompt: Arc<PromptProcessor>,
    blocklist: BlocklistPolicy,
    adapter: VideoAdapter,
    characters: Option<CharacterCardClient>,
    log: LogContext,
}

impl GenerationService {
    /// Assemble a service from already-built stages.
    pub fn new(
        catalog: ModelCatalog,
        prompt: PromptProcessor,
        blocklist: BlocklistPolicy,
        adapter: VideoAdapter,
        log: LogContext,
    ) -> Self {
        Self {
            catalog,
            prompt: Arc::new(prompt),
            blocklist,
            adapter,
            characters: None,
            log: log.child("service"),
        }
    }

    /// Enable character-card uploads.
    pub fn with_character_cards(mut self, client: CharacterCardClient) -> Self {
        self.characters = Some(client);
        self
    }

    /// Build every stage from configuration, with real HTTP clients.
    ///
    /// Compiled blocklists are shared through `cache`, so services rebuilt from an
    /// unchanged rule text reuse the same compiled rules.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration does not validate or the rule
    /// file cannot be read, and an HTTP error if a client cannot be initialized.
    pub fn from_config(
        config: &AtelierConfig,
        cache: &BlocklistCache,
        log: LogContext,
    ) -> AtelierResult<Self> {
        log.clone().scope(|| Self::build(config, cache, log))
    }

    #[instrument(skip_all, fields(channels = config.channels.len(), models = config.models.len()))]
    fn build(
        config: &AtelierConfig,
        cache: &BlocklistCache,
        log: LogContext,
    ) -> AtelierResult<Self> {
        config.validate()?;

        let client = ChatCompletionClient::new(config.http)?;
        let sora = Arc::new(SoraApiClient::sharing(&client, config.sora.clone()));
        let chat: Arc<dyn ChatCompleter> = Arc::new(client);

        let rules = cache.get_or_compile(&config.blocklist.rule_text()?);
        debug!(
            rules = rules.len(),
            enabled = config.blocklist.enabled,
            "Blocklist compiled"
        );
        let blocklist = BlocklistPolicy::new(config.blocklist.enabled, rules, log.clone());

        let prompt = PromptProcessor::new(
            config.prompt.settings(),
            config.prompt.endpoint(),
            chat.clone(),
            log.clone(),
        )?;
        let adapter = VideoAdapter::new(chat, sora, config.pricing, log.clone());
        let catalog = ModelCatalog::new(config.channels.clone(), config.models.clone());
        let characters = CharacterCardClient::new(config.http, log.clone())?;

        Ok(Self::new(catalog, prompt, blocklist, adapter, log).with_character_cards(characters))
    }

    /// The model catalog.
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The prompt processor.
    pub fn prompt_processor(&self) -> &PromptProcessor {
        &self.prompt
    }

    /// The blocklist policy.
    pub fn blocklist(&self) -> &BlocklistPolicy {
        &self.blocklist
    }

    /// The video adapter.
    pub fn adapter(&self) -> &VideoAdapter {
        &self.adapter
    }

    /// Rewrite `prompt` and check the result against the blocklist.
    ///
    /// # Errors
    ///
    /// Propagates prompt-processor failures and blocked-prompt errors.
    pub async fn prepare_prompt(&self, prompt: &str) -> AtelierResult<ProcessedPrompt> {
        let processed = self.prompt.process(prompt).await?;
        self.blocklist.check(processed.prompt())?;
        Ok(processed)
    }

    /// Generate a video for `request`.
    ///
    /// # Errors
    ///
    /// - request errors for a blank prompt or attachments the channel cannot take
    /// - not-found and disabled errors from model resolution
    /// - prompt-processor, blocklist, upstream and extraction errors
    pub async fn generate(&self, request: &SoraGenerateRequest) -> AtelierResult<GenerateResult> {
        self.log.instrument(self.run(request)).await
    }

    async fn run(&self, request: &SoraGenerateRequest) -> AtelierResult<GenerateResult> {
        let prompt = request.prompt().trim();
        if prompt.is_empty() {
            return Err(RequestError::new("prompt is empty").into());
        }

        let resolved = self
            .catalog
            .resolve(request.model(), request.channel_id().as_deref())?;
        check_attachments(&resolved, request.files())?;

        let processed = self.prepare_prompt(prompt).await?;
        if processed.changed() {
            debug!(steps = processed.steps().len(), "Prompt rewritten");
        }

        let request = request.with_prompt(processed.into_prompt());
        let result = self.adapter.generate(&resolved, &request).await?;
        info!(
            model = %resolved.model.id,
            channel = %result.channel_id,
            cost = result.cost,
            "Generation complete"
        );
        Ok(result)
    }

    /// Turn an uploaded video into a character card on the channel of `model_id`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when character cards are not enabled, plus the
    /// resolution and upload errors of [`CharacterCardClient::create`].
    pub async fn create_character_card(
        &self,
        model_id: &str,
        video: &Attachment,
    ) -> AtelierResult<CharacterCard> {
        let client = self
            .characters
            .as_ref()
            .ok_or_else(|| ConfigError::new("character cards are not enabled"))?;
        let ResolvedModel { model, channel } = self.catalog.resolve(model_id, None)?;
        let endpoint = Endpoint::new(channel.base_url, channel.api_key);
        client.create(&endpoint, &model.api_model, video).await
    }
}

/// Chat channels carry attachments as inline images; nothing else fits.
fn check_attachments(resolved: &ResolvedModel, files: &[Attachment]) -> AtelierResult<()> {
    if !resolved.channel.channel_type.is_chat_completion() {
        return Ok(());
    }
    match files.iter().find(|f| !f.is_image()) {
        Some(file) => Err(RequestError::new(format!(
            "model {} accepts image attachments only, got '{}'",
            resolved.model.id, file.mime_type
        ))
        .into()),
        None => Ok(()),
    }
}
