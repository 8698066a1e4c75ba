//! Model listing and mapping handlers.

use super::OutputFormat;
use atelier::{
    AtelierConfig, AtelierResult, ChannelType, JsonError, ModelCatalog, group_models,
    map_flow_model, map_grok_model, parse_legacy_sora_model,
};

/// Upstream model identifier for `model` on a channel of `channel_type`.
pub fn map_model(
    channel_type: ChannelType,
    model: &str,
    aspect_ratio: &str,
    duration: &str,
) -> String {
    match channel_type {
        ChannelType::Sora => match parse_legacy_sora_model(model) {
            Some(legacy) => format!(
                "{} {} {}s",
                legacy.api_model,
                legacy.size,
                legacy.duration.seconds()
            ),
            None => model.trim().to_string(),
        },
        ChannelType::Flow2Api => map_flow_model(model, aspect_ratio, duration),
        ChannelType::Grok2Api => map_grok_model(model, aspect_ratio, duration),
        ChannelType::OpenAiCompatible => model.trim().to_string(),
    }
}

/// Print the configured models grouped into families.
pub fn list_models(config: &AtelierConfig, all: bool, format: OutputFormat) -> AtelierResult<()> {
    let catalog = ModelCatalog::new(config.channels.clone(), config.models.clone());
    let ids: Vec<&str> = if all {
        catalog.models().iter().map(|m| m.id.as_str()).collect()
    } else {
        catalog.available().map(|m| m.id.as_str()).collect()
    };
    let groups = group_models(ids);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&groups)
                .map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            for group in &groups {
                println!("{}", group.family);
                for member in &group.members {
                    println!("  {}", member);
                }
            }
            println!("Total: {} families", groups.len());
        }
    }
    Ok(())
}
