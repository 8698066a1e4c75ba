//! Layered configuration for the Atelier generation gateway.
//!
//! Configuration sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`atelier.toml` shipped with the library)
//! 2. User config in the home directory (`~/.config/atelier/atelier.toml`)
//! 3. User config in the current directory (`./atelier.toml`)
//! 4. Environment variables prefixed `ATELIER__` (e.g. `ATELIER__PROMPT__API_KEY`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod loader;
mod sections;

pub use loader::AtelierConfig;
pub use sections::{BlocklistConfig, PromptConfig};
