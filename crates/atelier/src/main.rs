//! Atelier CLI binary.
//!
//! This binary provides command-line access to Atelier's functionality:
//! - Check prompts against the blocklist and run the prompt stages
//! - Inspect model mapping and the configured model families
//! - Generate videos and character cards

use atelier::LogContext;
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, GenerateArgs, check_prompt, create_character_card, generate, list_models,
        load_config, map_model, process_prompt,
    };

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Logger instance handed to every service
    let log = if cli.verbose {
        LogContext::with_level(tracing::Level::DEBUG, cli.json_logs)
    } else {
        LogContext::from_env(cli.json_logs)
    };

    // Execute the requested command
    match cli.command {
        Commands::MapModel {
            channel_type,
            model,
            aspect_ratio,
            duration,
        } => {
            println!("{}", map_model(channel_type, &model, &aspect_ratio, &duration));
        }

        Commands::CheckPrompt { prompt, rules_file } => {
            let config = load_config(cli.config.as_deref())?;
            check_prompt(&config, &prompt, rules_file.as_deref(), &log)?;
        }

        Commands::Models { all, format } => {
            let config = load_config(cli.config.as_deref())?;
            list_models(&config, all, format)?;
        }

        Commands::ProcessPrompt { prompt, format } => {
            let config = load_config(cli.config.as_deref())?;
            process_prompt(&config, &prompt, format, log).await?;
        }

        Commands::Generate {
            prompt,
            model,
            channel,
            aspect_ratio,
            duration,
            images,
            style,
            remix,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let args = GenerateArgs {
                prompt,
                model,
                channel,
                aspect_ratio,
                duration,
                images,
                style,
                remix,
            };
            generate(&config, args, log).await?;
        }

        Commands::CharacterCard { model, video } => {
            let config = load_config(cli.config.as_deref())?;
            create_character_card(&config, &model, &video, log).await?;
        }
    }

    Ok(())
}
