//! Model lookup and model-name grouping.

use atelier_core::{ResolvedModel, VideoChannel, VideoModel};
use atelier_error::{AtelierResult, DisabledError, NotFoundError, ResourceKind};
use serde::Serialize;
use tracing::debug;

/// Channels and the models they offer.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    channels: Vec<VideoChannel>,
    models: Vec<VideoModel>,
}

impl ModelCatalog {
    /// Create a catalog.
    pub fn new(channels: Vec<VideoChannel>, models: Vec<VideoModel>) -> Self {
        Self { channels, models }
    }

    /// All models.
    pub fn models(&self) -> &[VideoModel] {
        &self.models
    }

    /// Channel by id.
    pub fn channel(&self, id: &str) -> Option<&VideoChannel> {
        self.channels.iter().find(|c| c.id == id.trim())
    }

    /// Model by id.
    pub fn model(&self, id: &str) -> Option<&VideoModel> {
        self.models.iter().find(|m| m.id == id.trim())
    }

    /// Models usable right now: enabled, on an enabled channel.
    pub fn available(&self) -> impl Iterator<Item = &VideoModel> {
        self.models.iter().filter(|m| {
            m.enabled && self.channel(&m.channel_id).is_some_and(|c| c.enabled)
        })
    }

    /// Resolve a model id, optionally checked against the channel the caller expects.
    ///
    /// # Errors
    ///
    /// - [`NotFoundError`] if the model or its channel is unknown, or the model does not
    ///   belong to `channel_id`
    /// - [`DisabledError`] if the channel or the model is disabled
    pub fn resolve(
        &self,
        model_id: &str,
        channel_id: Option<&str>,
    ) -> AtelierResult<ResolvedModel> {
        let model = self
            .model(model_id)
            .ok_or_else(|| NotFoundError::new(ResourceKind::Model, model_id.trim()))?;

        let expected = channel_id.map(str::trim).filter(|c| !c.is_empty());
        if let Some(expected) = expected.filter(|c| *c != model.channel_id) {
            debug!(
                model = %model.id,
                expected,
                actual = %model.channel_id,
                "Model/channel mismatch"
            );
            return Err(NotFoundError::new(
                ResourceKind::Model,
                format!("{} on channel {}", model.id, expected),
            )
            .into());
        }

        let channel = self
            .channel(&model.channel_id)
            .ok_or_else(|| NotFoundError::new(ResourceKind::Channel, model.channel_id.clone()))?;

        if !channel.enabled {
            return Err(DisabledError::new(ResourceKind::Channel, channel.id.clone()).into());
        }
        if !model.enabled {
            return Err(DisabledError::new(ResourceKind::Model, model.id.clone()).into());
        }

        Ok(ResolvedModel {
            model: model.clone(),
            channel: channel.clone(),
        })
    }
}

/// Model identifiers sharing a family name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelGroup {
    /// Identifier with orientation, duration, size and ratio suffixes removed
    pub family: String,
    /// Members in first-seen order
    pub members: Vec<String>,
}

/// Group model identifiers into families, preserving first-seen order.
///
/// # Examples
///
/// ```
/// use atelier_video::group_models;
///
/// let groups = group_models([
///     "grok-imagine-1.0-video-landscape-10s",
///     "sora2-portrait-15s",
///     "grok-imagine-1.0-video-portrait-15s",
///     "veo_3_1_t2v_fast_landscape",
/// ]);
/// assert_eq!(groups.len(), 3);
/// assert_eq!(groups[0].family, "grok-imagine-1.0-video");
/// assert_eq!(groups[0].members.len(), 2);
/// assert_eq!(groups[1].family, "sora2");
/// assert_eq!(groups[2].family, "veo_3_1_t2v_fast");
/// ```
pub fn group_models<I, S>(ids: I) -> Vec<ModelGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: Vec<ModelGroup> = Vec::new();
    for id in ids {
        let id = id.as_ref().trim();
        if id.is_empty() {
            continue;
        }
        let family = model_family(id);
        match groups.iter_mut().find(|g| g.family == family) {
            Some(group) => {
                if !group.members.iter().any(|m| m == id) {
                    group.members.push(id.to_string());
                }
            }
            None => groups.push(ModelGroup {
                family,
                members: vec![id.to_string()],
            }),
        }
    }
    groups
}

/// Strip trailing variant tokens (`landscape`, `15s`, `1280x720`, `16:9`, ...).
pub fn model_family(id: &str) -> String {
    let mut family = id.trim();
    while let Some(cut) = family.rfind(['-', '_']) {
        if cut == 0 || !is_variant_token(&family[cut + 1..]) {
            break;
        }
        family = &family[..cut];
    }
    family.to_string()
}

fn is_variant_token(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    if matches!(
        token.as_str(),
        "landscape" | "portrait" | "square" | "horizontal" | "vertical"
    ) {
        return true;
    }
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if token.strip_suffix('s').is_some_and(all_digits) {
        return true;
    }
    token
        .split_once(['x', ':'])
        .is_some_and(|(w, h)| all_digits(w) && all_digits(h))
}
