//! Video channel adapter for the Atelier generation gateway.
//!
//! Given a model resolved to its channel and a user's generation request, the
//! [`VideoAdapter`] picks the upstream call by [`ChannelType`](atelier_core::ChannelType):
//!
//! | Channel type | Upstream model | Call |
//! |---|---|---|
//! | `flow2api` | [`map_flow_model`] | chat completion, video URL extracted from the reply |
//! | `grok2api` | [`map_grok_model`] | chat completion, video URL extracted from the reply |
//! | `openai-compatible` | `api_model` as configured | chat completion, video URL extracted from the reply |
//! | `sora` | [`parse_legacy_sora_model`] or `api_model` | native job API via [`SoraBackend`] |
//!
//! Image attachments travel as inline data URLs. The credit cost comes from the
//! model's duration options, falling back to the configured pricing tiers.
//!
//! Also here: the [`ModelCatalog`] that resolves model ids, [`group_models`] for
//! listing model families, and the [`CharacterCardClient`] for streamed video uploads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod catalog;
mod character;
mod extract;
mod mapping;
mod sora;

pub use adapter::{UpstreamPlan, VideoAdapter};
pub use catalog::{ModelCatalog, ModelGroup, group_models, model_family};
pub use character::{
    CHARACTER_CARD_INSTRUCTION, CharacterCard, CharacterCardClient, parse_character_card,
};
pub use extract::{extract_video_url, looks_like_video};
pub use mapping::{FlowMode, UpstreamModel, map_flow, map_flow_model, map_grok, map_grok_model};
pub use sora::{
    LegacySoraModel, SoraApiClient, SoraBackend, SoraJob, SoraVideo, parse_legacy_sora_model,
    sora_size,
};
