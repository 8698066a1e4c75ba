//! Prompt processor pipeline against a mock chat completer.

mod test_utils;

use atelier_core::{
    EmptyOutputPolicy, Endpoint, LogContext, PromptSettings, PromptStage, StageSettings,
};
use atelier_error::AtelierErrorKind;
use atelier_models::{MessageContent, Role};
use atelier_prompt::{DEFAULT_FILTER_INSTRUCTION, PromptProcessor};
use serde_json::json;
use std::sync::Arc;
use test_utils::{MockChatCompleter, MockReply};

fn stage(model: &str) -> StageSettings {
    StageSettings {
        enabled: true,
        model: model.to_string(),
        instruction: String::new(),
    }
}

fn endpoint() -> Endpoint {
    Endpoint::new("https://chat.example.com", "sk-test")
}

fn processor(settings: PromptSettings, mock: &Arc<MockChatCompleter>) -> PromptProcessor {
    PromptProcessor::new(settings, endpoint(), mock.clone(), LogContext::disabled())
        .expect("valid settings")
}

fn user_text(content: &MessageContent) -> &str {
    match content {
        MessageContent::Text(text) => text,
        MessageContent::Parts(_) => panic!("expected text content"),
    }
}

#[tokio::test]
async fn test_no_stages_means_no_calls() -> anyhow::Result<()> {
    let mock = Arc::new(MockChatCompleter::default());
    let processed = processor(PromptSettings::default(), &mock)
        .process("a red fox")
        .await?;
    assert_eq!(processed.prompt(), "a red fox");
    assert!(processed.steps().is_empty());
    assert!(!processed.changed());
    assert_eq!(mock.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_filter_only() -> anyhow::Result<()> {
    let mock = Arc::new(MockChatCompleter::with_contents(&[
        "```json\n{\"prompt\": \"a calm fox\"}\n```",
    ]));
    let settings = PromptSettings {
        filter: stage("filter-model"),
        ..PromptSettings::default()
    };
    let processed = processor(settings, &mock).process("an angry fox").await?;

    assert_eq!(processed.prompt(), "a calm fox");
    assert!(processed.changed());

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "filter-model");
    assert_eq!(requests[0].messages[0].role, Role::System);
    assert_eq!(
        user_text(&requests[0].messages[0].content),
        DEFAULT_FILTER_INSTRUCTION
    );
    assert_eq!(user_text(&requests[0].messages[1].content), "an angry fox");
    Ok(())
}

#[tokio::test]
async fn test_translate_is_always_refiltered() -> anyhow::Result<()> {
    let mock = Arc::new(MockChatCompleter::with_contents(&[
        "{\"translated_prompt\": \"a fox in the snow\"}",
        "{\"prompt\": \"a small fox in the snow\"}",
    ]));
    let settings = PromptSettings {
        filter: StageSettings {
            enabled: false,
            ..stage("filter-model")
        },
        translate: stage("translate-model"),
        ..PromptSettings::default()
    };
    let processed = processor(settings, &mock).process("雪の中の狐").await?;

    assert_eq!(processed.prompt(), "a small fox in the snow");
    let stages: Vec<_> = processed.steps().iter().map(|s| *s.stage()).collect();
    assert_eq!(stages, vec![PromptStage::Translate, PromptStage::Filter]);

    let models: Vec<_> = mock.requests().into_iter().map(|r| r.model).collect();
    assert_eq!(models, vec!["translate-model", "filter-model"]);
    Ok(())
}

#[tokio::test]
async fn test_full_pipeline_chains_outputs() -> anyhow::Result<()> {
    let mock = Arc::new(MockChatCompleter::with_contents(&[
        "filtered",
        "translated",
        "refiltered",
    ]));
    let settings = PromptSettings {
        filter: stage("f"),
        translate: stage("t"),
        ..PromptSettings::default()
    };
    let processed = processor(settings, &mock).process("original").await?;

    assert_eq!(processed.prompt(), "refiltered");
    let inputs: Vec<_> = processed.steps().iter().map(|s| s.input().as_str()).collect();
    assert_eq!(inputs, vec!["original", "filtered", "translated"]);
    Ok(())
}

#[tokio::test]
async fn test_empty_output_fails_by_default() -> anyhow::Result<()> {
    let mock = Arc::new(MockChatCompleter::with_replies([MockReply::Raw(json!({
        "choices": [{"message": {"content": ""}}]
    }))]));
    let settings = PromptSettings {
        filter: stage("f"),
        ..PromptSettings::default()
    };
    let err = processor(settings, &mock)
        .process("original")
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), AtelierErrorKind::Extraction(_)));
    Ok(())
}

#[tokio::test]
async fn test_empty_output_pass_through() -> anyhow::Result<()> {
    let mock = Arc::new(MockChatCompleter::with_contents(&["{\"prompt\": \"\"}"]));
    let settings = PromptSettings {
        filter: stage("f"),
        empty_output: EmptyOutputPolicy::PassThrough,
        ..PromptSettings::default()
    };
    let processed = processor(settings, &mock).process("original").await?;

    assert_eq!(processed.prompt(), "original");
    assert!(*processed.steps()[0].passed_through());
    Ok(())
}

#[tokio::test]
async fn test_upstream_error_propagates() -> anyhow::Result<()> {
    let mock = Arc::new(MockChatCompleter::with_replies([MockReply::Status(500)]));
    let settings = PromptSettings {
        filter: stage("f"),
        ..PromptSettings::default()
    };
    let err = processor(settings, &mock)
        .process("original")
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), AtelierErrorKind::Http(_)));
    Ok(())
}

#[test]
fn test_translate_without_filter_model_is_rejected() {
    let mock = Arc::new(MockChatCompleter::default());
    let settings = PromptSettings {
        translate: stage("t"),
        ..PromptSettings::default()
    };
    let err = PromptProcessor::new(settings, endpoint(), mock, LogContext::disabled()).unwrap_err();
    assert!(matches!(err.kind(), AtelierErrorKind::Config(_)));
}

#[test]
fn test_enabled_stage_requires_endpoint() {
    let mock = Arc::new(MockChatCompleter::default());
    let settings = PromptSettings {
        filter: stage("f"),
        ..PromptSettings::default()
    };
    let result = PromptProcessor::new(
        settings,
        Endpoint::new("", "sk-test"),
        mock,
        LogContext::disabled(),
    );
    assert!(result.is_err());
}
