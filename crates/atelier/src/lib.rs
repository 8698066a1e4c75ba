//! Atelier - video generation gateway
//!
//! Atelier sits between users and a set of third-party video models. A generation
//! request names a model; Atelier resolves it to its channel, rewrites the prompt through
//! configurable chat-completion stages, checks the result against a blocklist and hands
//! the request to the channel's upstream API, returning the video URL and its credit cost.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use atelier::{
//!     AtelierConfig, BlocklistCache, GenerationService, LogContext, SoraGenerateRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AtelierConfig::load()?;
//!     let service = GenerationService::from_config(
//!         &config,
//!         &BlocklistCache::default(),
//!         LogContext::from_env(false),
//!     )?;
//!
//!     let request = SoraGenerateRequest::builder()
//!         .prompt("a paper boat on a rainy street")
//!         .model("veo-t2v")
//!         .build()?;
//!
//!     let result = service.generate(&request).await?;
//!     println!("{}", result.url);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `atelier_error` - Error types
//! - `atelier_core` - Channels, models, requests, results, settings and logging context
//! - `atelier_config` - Layered configuration loading
//! - `atelier_blocklist` - Prompt blocklist rules, matching and caching
//! - `atelier_models` - OpenAI-compatible chat-completion client
//! - `atelier_prompt` - Prompt filter and translation stages
//! - `atelier_video` - Channel adapter, model mapping and the native Sora backend
//!
//! This crate (`atelier`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod service;

pub use service::GenerationService;

pub use atelier_blocklist::*;
pub use atelier_config::*;
pub use atelier_core::*;
pub use atelier_error::*;
pub use atelier_models::*;
pub use atelier_prompt::*;
pub use atelier_video::*;
