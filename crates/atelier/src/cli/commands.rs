//! CLI command definitions.

use atelier::ChannelType;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Atelier - video generation gateway with prompt policy and multi-channel routing
#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(
    about = "Video generation gateway with prompt policy and multi-channel routing",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Read configuration from this file only, skipping the layered sources
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a prompt against the blocklist
    CheckPrompt {
        /// Prompt text
        prompt: String,

        /// Use this rule file instead of the configured rules
        #[arg(long)]
        rules_file: Option<PathBuf>,
    },

    /// Show the upstream model identifier a channel would call
    MapModel {
        /// Channel type (sora, flow2api, grok2api, openai-compatible)
        #[arg(long = "type")]
        channel_type: ChannelType,

        /// Logical model name
        model: String,

        /// Aspect ratio or orientation
        #[arg(long, default_value = "16:9")]
        aspect_ratio: String,

        /// Duration label
        #[arg(long, default_value = "10s")]
        duration: String,
    },

    /// List configured models grouped into families
    Models {
        /// Include disabled models and models on disabled channels
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Run the prompt filter and translation stages
    ProcessPrompt {
        /// Prompt text
        prompt: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate a video
    Generate {
        /// Prompt text
        prompt: String,

        /// Model identifier
        #[arg(long)]
        model: String,

        /// Channel the model is expected on
        #[arg(long)]
        channel: Option<String>,

        /// Aspect ratio (16:9, 9:16, landscape, ...)
        #[arg(long)]
        aspect_ratio: Option<String>,

        /// Duration (10s, 15s, 25s)
        #[arg(long)]
        duration: Option<String>,

        /// Image to attach; repeatable
        #[arg(long = "image")]
        images: Vec<PathBuf>,

        /// Style preset
        #[arg(long)]
        style: Option<String>,

        /// Video to remix
        #[arg(long)]
        remix: Option<String>,
    },

    /// Create a character card from a video
    CharacterCard {
        /// Model identifier on a channel that accepts character uploads
        #[arg(long)]
        model: String,

        /// Video file
        video: PathBuf,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
