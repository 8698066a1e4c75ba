//! Prompt processor for the Atelier generation gateway.
//!
//! Before a prompt reaches a video model it can be rewritten by chat-completion models:
//!
//! 1. **filter**: a policy rewrite, when enabled
//! 2. **translate**: a translation, when enabled
//! 3. **re-filter**: the translated text always goes through the filter model again
//!
//! Each stage sends the stage instruction plus the current text, pulls text out of the
//! reply, strips code fences, and prefers a known JSON field (`prompt`,
//! `rewritten_prompt`, ...) over the raw reply. What happens when a stage yields
//! nothing is governed by [`EmptyOutputPolicy`](atelier_core::EmptyOutputPolicy).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod instructions;
mod output;
mod processor;

pub use instructions::{DEFAULT_FILTER_INSTRUCTION, DEFAULT_TRANSLATE_INSTRUCTION, instruction_for};
pub use output::{OUTPUT_FIELDS, parse_model_output};
pub use processor::{ProcessedPrompt, PromptProcessor, PromptStep};
