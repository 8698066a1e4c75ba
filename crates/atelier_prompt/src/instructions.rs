//! Built-in stage instructions.

use atelier_core::{PromptStage, StageSettings};

/// Used when the filter stage has no instruction configured.
pub const DEFAULT_FILTER_INSTRUCTION: &str = "You review prompts for a video generation service. \
Rewrite the user's prompt so it contains nothing sexual, gory, hateful, or infringing, \
keeping its subject, style and level of detail otherwise unchanged. \
If the prompt is already acceptable, return it as is. \
Reply only with JSON of the form {\"prompt\": \"<rewritten prompt>\"}.";

/// Used when the translate stage has no instruction configured.
pub const DEFAULT_TRANSLATE_INSTRUCTION: &str = "You translate prompts for a video generation \
service. Translate the user's prompt into natural English, preserving every visual detail, \
camera direction and proper name. If it is already English, return it unchanged. \
Reply only with JSON of the form {\"prompt\": \"<translated prompt>\"}.";

/// The configured instruction for a stage, or the built-in one when blank.
///
/// # Examples
///
/// ```
/// use atelier_core::{PromptStage, StageSettings};
/// use atelier_prompt::{DEFAULT_FILTER_INSTRUCTION, instruction_for};
///
/// let blank = StageSettings::default();
/// assert_eq!(instruction_for(PromptStage::Filter, &blank), DEFAULT_FILTER_INSTRUCTION);
///
/// let custom = StageSettings { instruction: "Be nice.".into(), ..StageSettings::default() };
/// assert_eq!(instruction_for(PromptStage::Filter, &custom), "Be nice.");
/// ```
pub fn instruction_for(stage: PromptStage, settings: &StageSettings) -> &str {
    let configured = settings.instruction.trim();
    if !configured.is_empty() {
        return configured;
    }
    match stage {
        PromptStage::Filter => DEFAULT_FILTER_INSTRUCTION,
        PromptStage::Translate => DEFAULT_TRANSLATE_INSTRUCTION,
    }
}
