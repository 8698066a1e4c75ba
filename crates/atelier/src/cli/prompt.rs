//! Prompt command handlers.

use super::OutputFormat;
use atelier::{
    AtelierConfig, AtelierResult, BlockedPromptError, Blocklist, BlocklistCache, ConfigError,
    GenerationService, JsonError, LogContext, find_blocked_words,
};
use std::path::Path;

/// Report the blocklist rules `prompt` matches; matches fail the command.
pub fn check_prompt(
    config: &AtelierConfig,
    prompt: &str,
    rules_file: Option<&Path>,
    log: &LogContext,
) -> AtelierResult<()> {
    let rules = match rules_file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read rules from {}: {}", path.display(), e))
        })?,
        None => config.blocklist.rule_text()?,
    };

    let matched = log.scope(|| {
        let blocklist = Blocklist::parse(&rules);
        tracing::debug!(rules = blocklist.len(), "Blocklist compiled");
        find_blocked_words(prompt, &blocklist)
    });

    if matched.is_empty() {
        println!("Prompt is clean");
        return Ok(());
    }
    for rule in &matched {
        println!("{}", rule);
    }
    Err(BlockedPromptError::new(matched).into())
}

/// Run the prompt stages and show each step.
pub async fn process_prompt(
    config: &AtelierConfig,
    prompt: &str,
    format: OutputFormat,
    log: LogContext,
) -> AtelierResult<()> {
    let service = GenerationService::from_config(config, &BlocklistCache::default(), log)?;
    let processed = service.prompt_processor().process(prompt).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&processed)
                .map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            for step in processed.steps() {
                let note = if *step.passed_through() {
                    " (passed through)"
                } else {
                    ""
                };
                println!("[{}] {}{}", step.stage(), step.model(), note);
                println!("  in:  {}", step.input());
                println!("  out: {}", step.output());
            }
            println!("{}", processed.prompt());
        }
    }
    Ok(())
}
