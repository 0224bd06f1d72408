//! Sequencing a chat turn against the store and the answer generator.
//!
//! Each session has its own [`TurnMachine`] in a registry. The registry lock
//! is held only for state transitions and never across the generator call,
//! so sessions do not wait on each other.

use crate::app_state::AppState;
use persona_core::answer::AnswerGenerator;
use persona_core::chat::{AnswerPlan, TurnMachine, TurnState, TurnTicket, plan_answer};
use persona_core::error::{PersonaError, Result};
use persona_core::session::{Message, Session};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Interval between cooldown ticks.
pub const COOLDOWN_TICK: Duration = Duration::from_secs(1);

type TurnRegistry = Arc<Mutex<HashMap<String, TurnMachine>>>;

/// A finished turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The session as stored after the answer landed.
    pub session: Session,
    pub reply: Message,
    /// `Cooldown` when the session has a delay, otherwise `Idle`.
    pub state: TurnState,
}

pub struct ChatService {
    state: Arc<AppState>,
    generator: Arc<dyn AnswerGenerator>,
    turns: TurnRegistry,
}

impl ChatService {
    pub fn new(state: Arc<AppState>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            state,
            generator,
            turns: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Current turn state of a session. Sessions never used here are `Idle`.
    pub async fn turn_state(&self, session_id: &str) -> TurnState {
        self.turns
            .lock()
            .await
            .get(session_id)
            .map(|machine| machine.state().clone())
            .unwrap_or_default()
    }

    /// Sends a user message and waits for the reply.
    ///
    /// The user message and a pending bot message are stored before the
    /// generator is called, so other views see the question immediately.
    /// Fails without touching the session when the session does not exist
    /// or the turn is rejected.
    pub async fn send(&self, session_id: &str, input: &str) -> Result<TurnOutcome> {
        let ticket = self.begin_turn(session_id, input).await?;

        let plan = plan_answer(&self.state.documents(), &ticket);
        let answer = match plan {
            AnswerPlan::Ask { question, context } => {
                tracing::debug!(session_id, context_len = context.len(), "Asking answer generator");
                self.generator.answer(&question, &context).await
            }
            AnswerPlan::Fallback(text) => text,
        };

        let outcome = self.complete_turn(&ticket, &answer).await?;
        if let TurnState::Cooldown { remaining_seconds } = outcome.state {
            tracing::debug!(session_id, remaining_seconds, "Cooldown started");
            self.spawn_cooldown(session_id.to_string());
        }
        Ok(outcome)
    }

    async fn begin_turn(&self, session_id: &str, input: &str) -> Result<TurnTicket> {
        let mut turns = self.turns.lock().await;
        let machine = turns.entry(session_id.to_string()).or_default();
        let ids = self.state.ids.as_ref();

        self.state.sessions.try_update(|sessions| -> Result<_> {
            let mut next = sessions.clone();
            let session = next
                .iter_mut()
                .find(|s| s.id == session_id)
                .ok_or_else(|| PersonaError::not_found("Session", session_id))?;
            let ticket = machine.begin(session, input, ids, persona_core::now_millis())?;
            Ok((next, ticket))
        })
    }

    async fn complete_turn(&self, ticket: &TurnTicket, answer: &str) -> Result<TurnOutcome> {
        let mut turns = self.turns.lock().await;
        let machine = turns.entry(ticket.session_id.clone()).or_default();

        let completed = self.state.sessions.try_update(|sessions| -> Result<_> {
            let mut next = sessions.clone();
            let session = next
                .iter_mut()
                .find(|s| s.id == ticket.session_id)
                .ok_or_else(|| PersonaError::not_found("Session", ticket.session_id.as_str()))?;
            let state = machine.complete(session, ticket, answer, persona_core::now_millis());
            let session = session.clone();
            Ok((next, (session, state)))
        });

        let (session, state) = match completed {
            Ok(completed) => completed,
            Err(e) => {
                // The session was deleted mid-turn; drop its machine with it.
                tracing::warn!(session_id = %ticket.session_id, "Session vanished before its answer arrived");
                turns.remove(&ticket.session_id);
                return Err(e);
            }
        };

        let reply = session
            .message(&ticket.pending_message_id)
            .cloned()
            .ok_or_else(|| PersonaError::internal("completed turn has no reply message"))?;
        Ok(TurnOutcome {
            session,
            reply,
            state,
        })
    }

    /// Ticks the session's cooldown once per second until it is `Idle`.
    fn spawn_cooldown(&self, session_id: String) {
        let turns = Arc::clone(&self.turns);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(COOLDOWN_TICK);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut turns = turns.lock().await;
                let Some(machine) = turns.get_mut(&session_id) else {
                    break;
                };
                if machine.tick() == &TurnState::Idle {
                    tracing::debug!(session_id = %session_id, "Cooldown finished");
                    break;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use persona_core::chat::{NO_DOCUMENTS_REPLY, TurnRejection};
    use persona_core::id::SequentialIdGenerator;
    use persona_core::session::Sender;
    use persona_infrastructure::MemoryStorageArea;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingGenerator {
        calls: StdMutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl AnswerGenerator for RecordingGenerator {
        async fn answer(&self, question: &str, context: &str) -> String {
            self.calls
                .lock()
                .unwrap()
                .push((question.to_string(), context.to_string()));
            format!("echo: {question}")
        }
    }

    fn setup(delay_seconds: u32) -> (Arc<AppState>, Arc<RecordingGenerator>, ChatService, String) {
        let state = Arc::new(AppState::open_with_ids(
            Arc::new(MemoryStorageArea::new()),
            Arc::new(SequentialIdGenerator::new()),
        ));
        let mut session = Session::create("Test", &[], state.ids.as_ref(), 0);
        session.delay_seconds = delay_seconds;
        let session_id = session.id.clone();
        state.sessions.set(vec![session]);

        let generator = Arc::new(RecordingGenerator::default());
        let service = ChatService::new(state.clone(), generator.clone());
        (state, generator, service, session_id)
    }

    #[tokio::test]
    async fn test_turn_replaces_pending_with_answer() {
        let (state, _, service, session_id) = setup(0);

        let outcome = service.send(&session_id, "hello").await.unwrap();

        assert_eq!(outcome.state, TurnState::Idle);
        assert_eq!(outcome.reply.text, "echo: hello");
        assert!(!outcome.reply.is_loading);

        let stored = state.find_session(&session_id).unwrap();
        let senders: Vec<_> = stored.messages.iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
        assert_eq!(stored, outcome.session);
    }

    #[tokio::test]
    async fn test_no_documents_after_first_turn_skips_generator() {
        let (state, generator, service, session_id) = setup(0);

        service.send(&session_id, "hi").await.unwrap();
        let second = service.send(&session_id, "and now?").await.unwrap();

        assert_eq!(second.reply.text, NO_DOCUMENTS_REPLY);
        assert_eq!(generator.calls.lock().unwrap().len(), 1);
        assert_eq!(state.find_session(&session_id).unwrap().messages.len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_session_and_empty_input() {
        let (_, generator, service, session_id) = setup(0);

        assert!(service.send("chat-missing", "hi").await.unwrap_err().is_not_found());
        assert_eq!(
            service.send(&session_id, "   ").await.unwrap_err(),
            PersonaError::Turn(TurnRejection::EmptyInput)
        );
        assert!(generator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_blocks_until_delay_elapses() {
        let (_, _, service, session_id) = setup(2);

        let outcome = service.send(&session_id, "q1").await.unwrap();
        assert_eq!(outcome.state, TurnState::Cooldown { remaining_seconds: 2 });

        assert_eq!(
            service.send(&session_id, "too soon").await.unwrap_err(),
            PersonaError::Turn(TurnRejection::CoolingDown {
                remaining_seconds: 2
            })
        );

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(
            service.turn_state(&session_id).await,
            TurnState::Cooldown { remaining_seconds: 1 }
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(service.turn_state(&session_id).await, TurnState::Idle);
        assert!(service.send(&session_id, "q2").await.is_ok());
    }
}
