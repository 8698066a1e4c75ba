//! Core data types for the Atelier generation gateway.
//!
//! This crate provides the data model shared by every Atelier crate: channels and the
//! models they offer, generation requests and results, prompt-processing settings,
//! pricing tiers, and the explicit logging context each service is built with.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod endpoint;
mod model;
mod orientation;
mod pricing;
mod prompt;
mod request;
mod result;
mod settings;
mod telemetry;

pub use channel::{ChannelType, VideoChannel};
pub use endpoint::Endpoint;
pub use model::{AspectRatioOption, DurationOption, ModelFeatures, ResolvedModel, VideoModel};
pub use orientation::Orientation;
pub use pricing::{DurationBucket, PricingTable};
pub use prompt::{EmptyOutputPolicy, PromptSettings, PromptStage, StageSettings};
pub use request::{Attachment, SoraGenerateRequest, SoraGenerateRequestBuilder};
pub use result::{GenerateResult, ResultKind};
pub use settings::{HttpSettings, SoraSettings};
pub use telemetry::LogContext;
