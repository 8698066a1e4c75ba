//! Dispatching a generation request to its channel.

use crate::{
    FlowMode, SoraBackend, SoraJob, extract_video_url, map_flow, map_grok, parse_legacy_sora_model,
    sora_size,
};
use atelier_core::{
    ChannelType, DurationBucket, Endpoint, GenerateResult, LogContext, Orientation, PricingTable,
    ResolvedModel, ResultKind, SoraGenerateRequest, VideoModel,
};
use atelier_error::{AtelierResult, DisabledError, ExtractionError, RequestError, ResourceKind};
use atelier_models::{ChatCompleter, ChatMessage, ChatRequest, ContentPart};
use std::sync::Arc;
use tracing::{debug, info};

/// Upstream call shape chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamPlan {
    /// Model identifier sent upstream
    pub upstream_model: String,
    /// Aspect ratio after model defaults
    pub aspect_ratio: String,
    /// Duration tier the upstream renders (the requested label for `openai-compatible`)
    pub duration: String,
    /// Credits the generation costs
    pub cost: u32,
}

/// Maps generation requests onto the upstream API of their channel.
#[derive(Clone)]
pub struct VideoAdapter {
    chat: Arc<dyn ChatCompleter>,
    sora: Arc<dyn SoraBackend>,
    pricing: PricingTable,
    log: LogContext,
}

impl std::fmt::Debug for VideoAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoAdapter")
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}

impl VideoAdapter {
    /// Create an adapter.
    pub fn new(
        chat: Arc<dyn ChatCompleter>,
        sora: Arc<dyn SoraBackend>,
        pricing: PricingTable,
        log: LogContext,
    ) -> Self {
        Self {
            chat,
            sora,
            pricing,
            log: log.child("video"),
        }
    }

    /// Credits for `duration`: the model's own option cost, else the pricing tier.
    pub fn cost(&self, model: &VideoModel, duration: &str) -> u32 {
        model
            .duration_cost(duration)
            .unwrap_or_else(|| self.pricing.cost_for(duration))
    }

    /// Work out upstream model, effective options and cost without calling anything.
    ///
    /// The duration is the tier the upstream actually renders, so the cost follows
    /// what is produced. For legacy `sora2-*` names the duration encoded in the name
    /// wins; Flow and Grok report the variant they select. Only `openai-compatible`
    /// channels keep the requested label as is.
    pub fn plan(&self, resolved: &ResolvedModel, request: &SoraGenerateRequest) -> UpstreamPlan {
        let model = &resolved.model;
        let aspect_ratio = model.effective_aspect_ratio(request.aspect_ratio().as_deref());
        let requested = model.effective_duration(request.duration().as_deref());
        let api_model = model.api_model.trim();

        let (upstream_model, duration) = match resolved.channel.channel_type {
            ChannelType::Sora => match parse_legacy_sora_model(api_model) {
                Some(legacy) => (legacy.api_model.to_string(), legacy.duration.to_string()),
                None => (
                    api_model.to_string(),
                    DurationBucket::from_label(&requested).to_string(),
                ),
            },
            ChannelType::Flow2Api => {
                let mode = FlowMode::for_model(model, request.images().count());
                let mapped = map_flow(mode, api_model, &aspect_ratio, &requested);
                (mapped.id, mapped.duration.to_string())
            }
            ChannelType::Grok2Api => {
                let mapped = map_grok(api_model, &aspect_ratio, &requested);
                (mapped.id, mapped.duration.to_string())
            }
            ChannelType::OpenAiCompatible => (api_model.to_string(), requested),
        };

        UpstreamPlan {
            cost: self.cost(model, &duration),
            upstream_model,
            aspect_ratio,
            duration,
        }
    }

    /// Generate a video for `request` on the resolved model's channel.
    ///
    /// # Errors
    ///
    /// - [`DisabledError`] if the channel or model is disabled
    /// - [`RequestError`] if a chat channel receives a non-image attachment, or an
    ///   image-only model receives none
    /// - upstream HTTP errors, and [`ExtractionError`] when the reply holds no video URL
    pub async fn generate(
        &self,
        resolved: &ResolvedModel,
        request: &SoraGenerateRequest,
    ) -> AtelierResult<GenerateResult> {
        self.log.instrument(self.dispatch(resolved, request)).await
    }

    async fn dispatch(
        &self,
        resolved: &ResolvedModel,
        request: &SoraGenerateRequest,
    ) -> AtelierResult<GenerateResult> {
        let ResolvedModel { model, channel } = resolved;
        if !channel.enabled {
            return Err(DisabledError::new(ResourceKind::Channel, channel.id.clone()).into());
        }
        if !model.enabled {
            return Err(DisabledError::new(ResourceKind::Model, model.id.clone()).into());
        }

        if !model.features.text_to_video && request.images().next().is_none() {
            return Err(RequestError::new(format!(
                "model '{}' needs an image attachment",
                model.id
            ))
            .into());
        }

        let plan = self.plan(resolved, request);
        info!(
            channel = %channel.id,
            channel_type = %channel.channel_type,
            upstream_model = %plan.upstream_model,
            aspect_ratio = %plan.aspect_ratio,
            duration = %plan.duration,
            "Dispatching generation"
        );

        let endpoint = Endpoint::new(channel.base_url.clone(), channel.api_key.clone());
        let result = match channel.channel_type {
            ChannelType::Sora => self.generate_sora(&endpoint, resolved, request, &plan).await?,
            ChannelType::Flow2Api | ChannelType::Grok2Api | ChannelType::OpenAiCompatible => {
                self.generate_chat(&endpoint, resolved, request, &plan).await?
            }
        };
        debug!(url = %result.url, cost = result.cost, "Generation finished");
        Ok(result)
    }

    async fn generate_chat(
        &self,
        endpoint: &Endpoint,
        resolved: &ResolvedModel,
        request: &SoraGenerateRequest,
        plan: &UpstreamPlan,
    ) -> AtelierResult<GenerateResult> {
        if let Some(file) = request.files().iter().find(|f| !f.is_image()) {
            return Err(RequestError::new(format!(
                "{} channels accept image attachments only, got '{}'",
                resolved.channel.channel_type, file.mime_type
            ))
            .into());
        }

        let mut parts = vec![ContentPart::text(request.prompt().as_str())];
        parts.extend(request.images().map(|image| ContentPart::image(image.data_url())));
        let chat_request = ChatRequest::new(
            plan.upstream_model.clone(),
            vec![ChatMessage::user_parts(parts)],
        );

        let completion = self.chat.complete(endpoint, &chat_request).await?;
        let content = completion
            .text()
            .ok_or_else(|| ExtractionError::new("upstream reply has no message content"))?;
        let url = extract_video_url(&content).ok_or_else(|| {
            ExtractionError::new(format!(
                "no video URL in reply from {}",
                plan.upstream_model
            ))
        })?;

        Ok(GenerateResult {
            kind: ResultKind::Video,
            url,
            cost: plan.cost,
            channel_id: resolved.channel.id.clone(),
            permalink: None,
            revised_prompt: None,
        })
    }

    async fn generate_sora(
        &self,
        endpoint: &Endpoint,
        resolved: &ResolvedModel,
        request: &SoraGenerateRequest,
        plan: &UpstreamPlan,
    ) -> AtelierResult<GenerateResult> {
        let (bucket, size) = match parse_legacy_sora_model(&resolved.model.api_model) {
            Some(legacy) => (legacy.duration, legacy.size),
            None => {
                let orientation = Orientation::from_aspect_ratio_or_default(&plan.aspect_ratio);
                let pro = plan.upstream_model.to_ascii_lowercase().contains("pro");
                (DurationBucket::from_label(&plan.duration), sora_size(pro, orientation))
            }
        };

        let job = SoraJob::new(
            plan.upstream_model.clone(),
            request.prompt().clone(),
            bucket,
            size,
        )
        .with_input_reference(request.images().next().map(|image| image.data_url()))
        .with_remix(request.remix_target_id().clone())
        .with_style(request.style_id().clone());

        let video = self.sora.generate(endpoint, &job).await?;
        Ok(GenerateResult {
            kind: ResultKind::Video,
            url: video.url,
            cost: plan.cost,
            channel_id: resolved.channel.id.clone(),
            permalink: video.permalink,
            revised_prompt: video.revised_prompt,
        })
    }
}
