//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the atelier binary.

mod commands;
mod files;
mod generate;
mod models;
mod prompt;

pub use commands::{Cli, Commands, OutputFormat};
pub use generate::{GenerateArgs, create_character_card, generate};
pub use models::{list_models, map_model};
pub use prompt::{check_prompt, process_prompt};

use atelier::{AtelierConfig, AtelierResult};
use std::path::Path;

/// Configuration from `path` alone, or from the layered sources.
pub fn load_config(path: Option<&Path>) -> AtelierResult<AtelierConfig> {
    match path {
        Some(path) => AtelierConfig::from_file(path),
        None => AtelierConfig::load(),
    }
}
