//! Native Sora job flow against a local mock upstream.

use atelier_core::{DurationBucket, Endpoint, HttpSettings, SoraSettings};
use atelier_error::AtelierErrorKind;
use atelier_models::ChatCompletionClient;
use atelier_video::{SoraApiClient, SoraBackend, SoraJob};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> HttpSettings {
    HttpSettings {
        timeout_secs: 10,
        max_retries: 0,
        retry_backoff_ms: 1,
        max_delay_secs: 1,
    }
}

fn sora_settings(max_polls: u32, link_service: Endpoint) -> SoraSettings {
    SoraSettings {
        poll_interval_secs: 0,
        max_polls,
        link_service,
    }
}

fn job() -> SoraJob {
    SoraJob::new("sora-2", "a paper boat", DurationBucket::Fifteen, "1280x720")
}

#[tokio::test]
async fn test_create_poll_and_unwatermark() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .and(header("authorization", "Bearer sk-sora"))
        .and(body_partial_json(json!({
            "model": "sora-2",
            "prompt": "a paper boat",
            "seconds": "15",
            "size": "1280x720"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "video_1", "status": "queued"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/video_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_1",
            "status": "in_progress"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/video_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_1",
            "status": "completed",
            "url": "https://videos.example.com/wm/video_1.mp4",
            "permalink": "https://sora.example.com/p/s_123",
            "revised_prompt": "a small paper boat drifting"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/get-sora-link"))
        .and(header("authorization", "Bearer link-token"))
        .and(body_json(json!({"url": "https://sora.example.com/p/s_123"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"link": "https://cdn.example.com/clean.mp4"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = SoraApiClient::new(
        http(),
        sora_settings(5, Endpoint::new(server.uri(), "link-token")),
    )?;
    let video = client
        .generate(&Endpoint::new(server.uri(), "sk-sora"), &job())
        .await?;

    assert_eq!(video.url, "https://cdn.example.com/clean.mp4");
    assert_eq!(video.permalink.as_deref(), Some("https://sora.example.com/p/s_123"));
    assert_eq!(video.revised_prompt.as_deref(), Some("a small paper boat drifting"));
    Ok(())
}

#[tokio::test]
async fn test_completed_on_create_without_link_service() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_2",
            "status": "succeeded",
            "permalink": "https://sora.example.com/p/s_2",
            "output": {"url": "https://videos.example.com/video_2.mp4"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SoraApiClient::new(http(), sora_settings(5, Endpoint::default()))?;
    let video = client
        .generate(&Endpoint::new(server.uri(), "sk-sora"), &job())
        .await?;

    assert_eq!(video.url, "https://videos.example.com/video_2.mp4");
    Ok(())
}

#[tokio::test]
async fn test_missing_url_falls_back_to_content_endpoint() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_3",
            "status": "completed"
        })))
        .mount(&server)
        .await;

    let client = SoraApiClient::new(http(), sora_settings(5, Endpoint::default()))?;
    let video = client
        .generate(&Endpoint::new(format!("{}/v1", server.uri()), "sk-sora"), &job())
        .await?;

    assert_eq!(video.url, format!("{}/v1/videos/video_3/content", server.uri()));
    assert!(video.permalink.is_none());
    Ok(())
}

#[tokio::test]
async fn test_failed_job_reports_reason() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "video_4", "status": "queued"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/video_4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_4",
            "status": "failed",
            "error": {"message": "content policy"}
        })))
        .mount(&server)
        .await;

    let client = SoraApiClient::new(http(), sora_settings(5, Endpoint::default()))?;
    let err = client
        .generate(&Endpoint::new(server.uri(), "sk-sora"), &job())
        .await
        .unwrap_err();

    match err.kind() {
        AtelierErrorKind::Http(e) => assert!(e.message.contains("content policy")),
        other => panic!("expected HTTP error, got {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_poll_limit() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "video_5", "status": "queued"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/videos/video_5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "video_5", "status": "queued"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = SoraApiClient::new(http(), sora_settings(2, Endpoint::default()))?;
    let err = client
        .generate(&Endpoint::new(server.uri(), "sk-sora"), &job())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), AtelierErrorKind::Http(_)));
    Ok(())
}

#[tokio::test]
async fn test_create_rejection_keeps_status() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid size"))
        .expect(1)
        .mount(&server)
        .await;

    let client = SoraApiClient::new(http(), sora_settings(5, Endpoint::default()))?;
    let err = client
        .generate(&Endpoint::new(server.uri(), "sk-sora"), &job())
        .await
        .unwrap_err();

    match err.kind() {
        AtelierErrorKind::Http(e) => assert_eq!(e.status, Some(400)),
        other => panic!("expected HTTP error, got {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_is_config_error() -> anyhow::Result<()> {
    let client = SoraApiClient::new(http(), sora_settings(5, Endpoint::default()))?;
    let err = client
        .generate(&Endpoint::new("https://sora.example.com", ""), &job())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), AtelierErrorKind::Config(_)));
    Ok(())
}

#[tokio::test]
async fn test_shared_pool_uses_chat_retry_settings() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "video_8",
            "status": "completed",
            "url": "https://videos.example.com/video_8.mp4"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let chat = ChatCompletionClient::new(HttpSettings {
        max_retries: 1,
        ..http()
    })?;
    let client = SoraApiClient::sharing(&chat, sora_settings(5, Endpoint::default()));
    let video = client
        .generate(&Endpoint::new(server.uri(), "sk-sora"), &job())
        .await?;

    assert_eq!(video.url, "https://videos.example.com/video_8.mp4");
    Ok(())
}
