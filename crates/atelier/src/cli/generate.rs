//! Generation command handlers.

use super::files::load_attachment;
use atelier::{
    AtelierConfig, AtelierResult, BlocklistCache, GenerationService, JsonError, LogContext,
    RequestError, SoraGenerateRequest,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options of the `generate` command.
#[derive(Debug)]
pub struct GenerateArgs {
    /// Prompt text
    pub prompt: String,
    /// Model identifier
    pub model: String,
    /// Expected channel
    pub channel: Option<String>,
    /// Aspect ratio
    pub aspect_ratio: Option<String>,
    /// Duration label
    pub duration: Option<String>,
    /// Image files
    pub images: Vec<PathBuf>,
    /// Style preset
    pub style: Option<String>,
    /// Video to remix
    pub remix: Option<String>,
}

fn print_json(value: &impl Serialize) -> AtelierResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Generate a video and print the result envelope.
pub async fn generate(
    config: &AtelierConfig,
    args: GenerateArgs,
    log: LogContext,
) -> AtelierResult<()> {
    let files = args
        .images
        .iter()
        .map(|path| load_attachment(path))
        .collect::<AtelierResult<Vec<_>>>()?;

    let request = SoraGenerateRequest::builder()
        .prompt(args.prompt)
        .model(args.model)
        .channel_id(args.channel)
        .aspect_ratio(args.aspect_ratio)
        .duration(args.duration)
        .files(files)
        .style_id(args.style)
        .remix_target_id(args.remix)
        .build()
        .map_err(|e| RequestError::new(e.to_string()))?;

    let service = GenerationService::from_config(config, &BlocklistCache::default(), log)?;
    let result = service.generate(&request).await?;
    print_json(&result)
}

/// Upload a video as a character card and print the card.
pub async fn create_character_card(
    config: &AtelierConfig,
    model: &str,
    video: &Path,
    log: LogContext,
) -> AtelierResult<()> {
    let video = load_attachment(video)?;
    let service = GenerationService::from_config(config, &BlocklistCache::default(), log)?;
    let card = service.create_character_card(model, &video).await?;
    print_json(&card)
}
