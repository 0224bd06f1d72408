use async_trait::async_trait;
use persona_application::{
    AppState, ChatService, DocumentService, Route, SessionService, ShareService,
};
use persona_core::answer::AnswerGenerator;
use persona_core::session::Sender;
use persona_infrastructure::JsonDirStorageArea;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingGenerator {
    contexts: Mutex<Vec<String>>,
}

#[async_trait]
impl AnswerGenerator for RecordingGenerator {
    async fn answer(&self, _question: &str, context: &str) -> String {
        self.contexts.lock().unwrap().push(context.to_string());
        "Paris.".to_string()
    }
}

fn open_state(dir: &TempDir) -> Arc<AppState> {
    let area = JsonDirStorageArea::open(dir.path().join("store")).unwrap();
    Arc::new(AppState::open(Arc::new(area)))
}

#[tokio::test]
async fn test_upload_then_ask_uses_document_context() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "Paris is the capital of France.").unwrap();

    let state = open_state(&dir);
    let documents = DocumentService::new(state.clone());
    let sessions = SessionService::new(state.clone());
    let generator = Arc::new(RecordingGenerator::default());
    let chat = ChatService::new(state.clone(), generator.clone());

    let outcome = documents.upload_files(&[notes]);
    assert!(outcome.failures.is_empty());

    let session = sessions.create();
    assert!(session.messages[0].text.contains("- notes.txt"));

    chat.send(&session.id, "What is the capital of France?")
        .await
        .unwrap();

    let contexts = generator.contexts.lock().unwrap().clone();
    assert_eq!(contexts.len(), 1);
    assert!(contexts[0].contains("Paris is the capital of France."));

    let stored = sessions.find(&session.id).unwrap();
    let transcript: Vec<_> = stored
        .messages
        .iter()
        .map(|m| (m.sender, m.text.as_str()))
        .collect();
    assert_eq!(transcript[1], (Sender::User, "What is the capital of France?"));
    assert_eq!(transcript[2], (Sender::Bot, "Paris."));
    assert_eq!(transcript.len(), 3);

    // A fresh process sees the same state on disk.
    let reopened = open_state(&dir);
    assert_eq!(reopened.find_session(&session.id), Some(stored));
    assert_eq!(reopened.documents().len(), 1);
}

#[tokio::test]
async fn test_second_tab_follows_first_tab() {
    let dir = TempDir::new().unwrap();
    let area = Arc::new(JsonDirStorageArea::open(dir.path()).unwrap());
    let tab_a = Arc::new(AppState::open(area.clone()));
    let tab_b = Arc::new(AppState::open(area));
    let _sync = tab_b.spawn_sync();
    let mut changes = tab_b.sessions.watch();

    let created = SessionService::new(tab_a).create();

    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .expect("tab B should be notified")
        .unwrap();
    assert_eq!(tab_b.find_session(&created.id), Some(created));
}

#[tokio::test]
async fn test_share_link_round_trip_between_stores() {
    let sender_dir = TempDir::new().unwrap();
    let sender = open_state(&sender_dir);
    DocumentService::new(sender.clone())
        .upload_bytes([("policy.md", b"Returns within 30 days.".as_slice())]);
    let session = SessionService::new(sender.clone()).create();
    let url = ShareService::new(sender, "http://localhost:5173/")
        .share_url(&session.id)
        .unwrap();

    let receiver_dir = TempDir::new().unwrap();
    let receiver = open_state(&receiver_dir);
    let share = ShareService::new(receiver.clone(), "http://localhost:5173/");

    let first = share.open(&url);
    let second = share.open(&url);

    assert_eq!(
        first.route,
        Route::Chat {
            session_id: session.id.clone()
        }
    );
    assert_eq!(first, second);
    assert_eq!(receiver.sessions().len(), 1);
    assert_eq!(receiver.documents().len(), 1);
}
