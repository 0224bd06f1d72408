use persona_core::answer::AnswerGenerator;
use persona_core::config::GeminiSettings;
use persona_infrastructure::SecretServiceImpl;
use persona_interaction::GeminiAnswerClient;
use persona_interaction::gemini::NOT_CONFIGURED_ANSWER;

#[tokio::test]
async fn test_transport_failure_becomes_answer_text() {
    // Port 9 (discard) is closed on test machines, so the connection is refused.
    let client = GeminiAnswerClient::new(Some("test-key".to_string()), GeminiSettings::default())
        .with_base_url("http://127.0.0.1:9/v1beta/models");

    let answer = client.answer("What is the capital of France?", "").await;

    assert!(answer.starts_with("An error occurred while communicating with the AI: "));
    assert!(!answer.contains("test-key"));
}

#[test]
fn test_secret_file_supplies_model_override() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("secret.json");
    std::fs::write(
        &path,
        r#"{"gemini":{"api_key":"from-file","model_name":"gemini-2.5-pro"}}"#,
    )
    .unwrap();

    let secrets = SecretServiceImpl::with_path(path);
    let client = GeminiAnswerClient::from_secrets(&secrets, GeminiSettings::default());

    assert_eq!(client.model(), "gemini-2.5-pro");
    assert!(client.is_configured());
}

#[tokio::test]
async fn test_unconfigured_client_never_calls_out() {
    let client = GeminiAnswerClient::new(None, GeminiSettings::default())
        .with_base_url("http://127.0.0.1:9");
    assert_eq!(client.answer("hello", "ctx").await, NOT_CONFIGURED_ANSWER);
}
