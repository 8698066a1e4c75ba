//! Tests for the generation pipeline with mocked upstreams.

mod test_utils;

use atelier::{AtelierErrorKind, Attachment, ResultKind, SoraGenerateRequest};
use test_utils::harness;

fn request(prompt: &str, model: &str) -> SoraGenerateRequest {
    SoraGenerateRequest::builder()
        .prompt(prompt)
        .model(model)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_generate_runs_every_stage() -> anyhow::Result<()> {
    let h = harness(
        Some(&[r#"{"prompt": "a calm fox resting in snow"}"#]),
        "substr:gore",
        &["https://cdn.example.com/fox.mp4"],
    );

    let result = h.service.generate(&request("  a fox in snow ", "veo")).await?;

    assert_eq!(result.kind, ResultKind::Video);
    assert_eq!(result.url, "https://cdn.example.com/fox.mp4");
    assert_eq!(result.channel_id, "flow");
    assert_eq!(result.cost, 100);

    assert_eq!(h.prompt_chat.call_count(), 1);
    assert_eq!(h.prompt_chat.sent_text(0), "a fox in snow");
    assert_eq!(h.video_chat.requests()[0].model, "veo_3_1_t2v_fast_landscape");
    assert_eq!(h.video_chat.sent_text(0), "a calm fox resting in snow");
    Ok(())
}

#[tokio::test]
async fn test_rewritten_prompt_is_blocked() {
    let h = harness(
        Some(&["a scene full of gore"]),
        "substr:gore\nword:blood",
        &["https://cdn.example.com/never.mp4"],
    );

    let err = h
        .service
        .generate(&request("a dramatic scene", "veo"))
        .await
        .unwrap_err();

    assert!(err.is_blocked_prompt());
    assert!(err.to_string().contains("substr:gore"));
    assert_eq!(h.video_chat.call_count(), 0);
}

#[tokio::test]
async fn test_only_final_prompt_is_checked() -> anyhow::Result<()> {
    let h = harness(
        Some(&["dim the lights slowly"]),
        "word:kill",
        &["https://cdn.example.com/lights.mp4"],
    );

    let result = h.service.generate(&request("kill the lights", "veo")).await?;

    assert_eq!(result.url, "https://cdn.example.com/lights.mp4");
    Ok(())
}

#[tokio::test]
async fn test_blocklist_applies_without_prompt_stages() {
    let h = harness(None, "word:cat", &[]);

    let err = h
        .service
        .generate(&request("the cat sat", "sora"))
        .await
        .unwrap_err();

    assert!(err.is_blocked_prompt());
    assert_eq!(h.prompt_chat.call_count(), 0);
    assert!(h.sora.jobs().is_empty());
}

#[tokio::test]
async fn test_sora_channel_gets_native_job() -> anyhow::Result<()> {
    let h = harness(None, "", &[]);

    let result = h.service.generate(&request("a lighthouse at dusk", "sora")).await?;

    assert_eq!(result.url, "https://videos.example.com/sora.mp4");
    assert_eq!(result.channel_id, "sora");
    let jobs = h.sora.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].model(), "sora-2");
    assert_eq!(jobs[0].prompt(), "a lighthouse at dusk");
    Ok(())
}

#[tokio::test]
async fn test_blank_prompt_is_rejected() {
    let h = harness(Some(&[]), "", &[]);

    let err = h.service.generate(&request("   ", "veo")).await.unwrap_err();

    assert!(matches!(err.kind(), AtelierErrorKind::Request(_)));
    assert_eq!(h.prompt_chat.call_count(), 0);
}

#[tokio::test]
async fn test_video_attachment_rejected_before_prompt_stages() {
    let h = harness(Some(&["unused"]), "", &[]);
    let request = SoraGenerateRequest::builder()
        .prompt("animate this")
        .model("veo")
        .files(vec![Attachment::new("video/mp4", "AAAA")])
        .build()
        .unwrap();

    let err = h.service.generate(&request).await.unwrap_err();

    assert!(matches!(err.kind(), AtelierErrorKind::Request(_)));
    assert_eq!(h.prompt_chat.call_count(), 0);
    assert_eq!(h.video_chat.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_model_and_channel_mismatch() {
    let h = harness(None, "", &[]);

    let err = h.service.generate(&request("p", "missing")).await.unwrap_err();
    assert!(matches!(err.kind(), AtelierErrorKind::NotFound(_)));

    let request = SoraGenerateRequest::builder()
        .prompt("p")
        .model("veo")
        .channel_id(Some("sora".to_string()))
        .build()
        .unwrap();
    let err = h.service.generate(&request).await.unwrap_err();
    assert!(matches!(err.kind(), AtelierErrorKind::NotFound(_)));
    assert_eq!(h.video_chat.call_count(), 0);
}

#[tokio::test]
async fn test_character_cards_need_a_client() {
    let h = harness(None, "", &[]);

    let err = h
        .service
        .create_character_card("sora", &Attachment::new("video/mp4", "AAAA"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), AtelierErrorKind::Config(_)));
}

#[tokio::test]
async fn test_prepare_prompt_reports_steps() -> anyhow::Result<()> {
    let h = harness(Some(&["```\nsunrise over hills\n```"]), "", &[]);

    let processed = h.service.prepare_prompt("sunrise").await?;

    assert!(processed.changed());
    assert_eq!(processed.prompt(), "sunrise over hills");
    assert_eq!(processed.steps().len(), 1);
    Ok(())
}
