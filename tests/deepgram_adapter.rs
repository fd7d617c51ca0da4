//! End-to-end tests for the synchronous Deepgram adapter against an
//! in-process mock server.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use lectio::error::SttErrorKind;
use lectio::transcription::api::DeepgramAdapter;
use lectio::transcription::{TranscriptionRequest, Transcriber};

async fn start_mock_deepgram(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/v1/listen",
        post(move || async move {
            let status = StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn request() -> TranscriptionRequest {
    TranscriptionRequest::new(vec![0u8; 64], "audio/wav")
}

#[tokio::test]
async fn synchronous_call_returns_nested_transcript() {
    let body = r#"{
        "results": {
            "channels": [
                {"alternatives": [{"transcript": "Chapter two felt slower."}]}
            ]
        }
    }"#;
    let (base_url, shutdown_tx) = start_mock_deepgram(200, body).await;

    let result = DeepgramAdapter::new("test-key")
        .with_base_url(base_url.as_str())
        .transcribe(&request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.provider.id(), "deepgram");
    assert_eq!(result.transcript, "Chapter two felt slower.");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn rejected_key_fails_unauthorized() {
    let (base_url, shutdown_tx) =
        start_mock_deepgram(401, r#"{"err_msg": "invalid credentials"}"#).await;

    let err = DeepgramAdapter::new("bad-key")
        .with_base_url(base_url.as_str())
        .transcribe(&request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SttErrorKind::Unauthorized);
    assert!(!err.retryable());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn blank_transcript_is_empty_transcript() {
    let body = r#"{
        "results": {
            "channels": [
                {"alternatives": [{"transcript": "   "}]}
            ]
        }
    }"#;
    let (base_url, shutdown_tx) = start_mock_deepgram(200, body).await;

    let err = DeepgramAdapter::new("test-key")
        .with_base_url(base_url.as_str())
        .transcribe(&request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SttErrorKind::EmptyTranscript);
    assert!(!err.retryable());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn unreachable_host_is_a_retryable_network_error() {
    // Nothing listens on port 1.
    let err = DeepgramAdapter::new("test-key")
        .with_base_url("http://127.0.0.1:1")
        .transcribe(&request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SttErrorKind::NetworkError);
    assert!(err.retryable());
}

#[tokio::test]
async fn malformed_response_is_provider_error() {
    let (base_url, shutdown_tx) = start_mock_deepgram(200, r#"{"results": {}}"#).await;

    let err = DeepgramAdapter::new("test-key")
        .with_base_url(base_url.as_str())
        .transcribe(&request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), SttErrorKind::ProviderError);
    shutdown_tx.send(()).ok();
}
