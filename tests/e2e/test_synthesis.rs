use crate::helpers;

use helpers::fixtures::{
    expected_request, mock_audio_bytes, provider_error_body, synthesize_body, SYNTHESIZE_PATH,
};
use helpers::{TestContext, TEST_API_KEY};
use mockito::Matcher;
use pretty_assertions::assert_eq;
use speech_player::domain::tts::{AudioEncoding, SynthesisRequest};
use speech_player::error::AppError;
use speech_player::infrastructure::repositories::TtsRepository;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_and_decode_audio_content(ctx: &mut TestContext) {
    let audio = mock_audio_bytes();
    let mock = ctx
        .server
        .mock("POST", SYNTHESIZE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), TEST_API_KEY.into()))
        .match_body(Matcher::Json(expected_request(
            "Hello, this is a test message for text to speech.",
            Some("en-US-Wavenet-C"),
            "MP3",
        )))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(synthesize_body(&audio))
        .expect(1)
        .create_async()
        .await;

    let request = SynthesisRequest::new(
        "Hello, this is a test message for text to speech.",
        Some("en-US-Wavenet-C".to_string()),
        AudioEncoding::Mp3,
    )
    .unwrap();
    let bytes = ctx.repository().synthesize(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, audio);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_leave_out_voice_name_when_none_is_selected(ctx: &mut TestContext) {
    let mock = ctx
        .server
        .mock("POST", SYNTHESIZE_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(expected_request("Hi", None, "LINEAR16")))
        .with_status(200)
        .with_body(synthesize_body(&mock_audio_bytes()))
        .expect(1)
        .create_async()
        .await;

    let request = SynthesisRequest::new("Hi", None, AudioEncoding::Linear16).unwrap();
    ctx.repository().synthesize(&request).await.unwrap();

    mock.assert_async().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_request_each_encoding_by_provider_name(ctx: &mut TestContext) {
    for encoding in AudioEncoding::ALL {
        let mock = ctx
            .server
            .mock("POST", SYNTHESIZE_PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "audioConfig": { "audioEncoding": encoding.as_str() }
            })))
            .with_status(200)
            .with_body(synthesize_body(&mock_audio_bytes()))
            .expect(1)
            .create_async()
            .await;

        let request = SynthesisRequest::new("Encoding check", None, encoding).unwrap();
        ctx.repository().synthesize(&request).await.unwrap();

        mock.assert_async().await;
        mock.remove_async().await;
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_provider_error_status(ctx: &mut TestContext) {
    let _mock = ctx
        .server
        .mock("POST", SYNTHESIZE_PATH)
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(provider_error_body(
            400,
            "INVALID_ARGUMENT",
            "Voice 'xx-XX-Nope' does not exist.",
        ))
        .create_async()
        .await;

    let request =
        SynthesisRequest::new("Hello", Some("xx-XX-Nope".to_string()), AudioEncoding::Mp3)
            .unwrap();
    let err = ctx.repository().synthesize(&request).await.unwrap_err();

    assert!(!err.is_auth_failure());
    match err {
        AppError::Transport { status, message } => {
            assert_eq!(status, Some(400));
            assert!(message.contains("INVALID_ARGUMENT"));
        }
        other => panic!("Expected transport error, got {:?}", other),
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_response_without_audio_content(ctx: &mut TestContext) {
    let _mock = ctx
        .server
        .mock("POST", SYNTHESIZE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let request = SynthesisRequest::new("Hello", None, AudioEncoding::Mp3).unwrap();
    let err = ctx.repository().synthesize(&request).await.unwrap_err();

    assert!(matches!(err, AppError::Protocol(_)));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_audio_content_that_is_not_base64(ctx: &mut TestContext) {
    let _mock = ctx
        .server
        .mock("POST", SYNTHESIZE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"audioContent":"***not base64***"}"#)
        .create_async()
        .await;

    let request = SynthesisRequest::new("Hello", None, AudioEncoding::Mp3).unwrap();
    let err = ctx.repository().synthesize(&request).await.unwrap_err();

    assert!(matches!(err, AppError::Protocol(_)));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &mut TestContext) {
    let _mock = ctx
        .server
        .mock("POST", SYNTHESIZE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{\"audioContent\":")
        .create_async()
        .await;

    let request = SynthesisRequest::new("Hello", None, AudioEncoding::Mp3).unwrap();
    let err = ctx.repository().synthesize(&request).await.unwrap_err();

    assert!(matches!(err, AppError::Protocol(_)));
}
