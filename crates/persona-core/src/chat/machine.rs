//! Per-session turn state machine.

use crate::id::IdGenerator;
use crate::session::{Message, Session};
use thiserror::Error;

/// Where a session is in its question/answer cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Ready for the next user message.
    #[default]
    Idle,
    /// A user message was accepted and its answer has not arrived yet.
    AwaitingAnswer { pending_message_id: String },
    /// An answer arrived; input stays closed for the remaining whole seconds.
    Cooldown { remaining_seconds: u32 },
}

/// Why a user message was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnRejection {
    #[error("message is empty")]
    EmptyInput,
    #[error("still waiting for the previous answer")]
    AwaitingAnswer,
    #[error("please wait {remaining_seconds}s before sending another message")]
    CoolingDown { remaining_seconds: u32 },
}

/// Handle for a turn that is awaiting its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    pub session_id: String,
    /// The trimmed user input.
    pub question: String,
    /// Id of the placeholder bot message to replace once the answer arrives.
    pub pending_message_id: String,
    /// Number of messages the session had before this turn began.
    pub prior_message_count: usize,
}

/// Turn state for a single session.
#[derive(Debug, Clone, Default)]
pub struct TurnMachine {
    state: TurnState,
}

impl TurnMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn can_accept_input(&self) -> bool {
        self.state == TurnState::Idle
    }

    /// Accepts a user message.
    ///
    /// Appends the user message and a pending bot message to `session`, in
    /// that order, and moves to `AwaitingAnswer`. On rejection the session is
    /// left untouched.
    pub fn begin(
        &mut self,
        session: &mut Session,
        input: &str,
        ids: &dyn IdGenerator,
        now_ms: i64,
    ) -> Result<TurnTicket, TurnRejection> {
        match &self.state {
            TurnState::AwaitingAnswer { .. } => return Err(TurnRejection::AwaitingAnswer),
            TurnState::Cooldown { remaining_seconds } => {
                return Err(TurnRejection::CoolingDown {
                    remaining_seconds: *remaining_seconds,
                });
            }
            TurnState::Idle => {}
        }

        let question = input.trim();
        if question.is_empty() {
            return Err(TurnRejection::EmptyInput);
        }

        let prior_message_count = session.messages.len();
        let pending_message_id = ids.message_id();
        session
            .messages
            .push(Message::user(ids.message_id(), question, now_ms));
        session
            .messages
            .push(Message::pending_bot(pending_message_id.clone(), now_ms));

        self.state = TurnState::AwaitingAnswer {
            pending_message_id: pending_message_id.clone(),
        };
        tracing::debug!(session_id = %session.id, "Turn accepted");

        Ok(TurnTicket {
            session_id: session.id.clone(),
            question: question.to_string(),
            pending_message_id,
            prior_message_count,
        })
    }

    /// Settles the turn with the final answer text.
    ///
    /// The pending message is replaced in place. If it has disappeared (the
    /// session was overwritten meanwhile) the answer is appended instead.
    /// Returns the new state: `Cooldown` when the session has a delay, else `Idle`.
    pub fn complete(
        &mut self,
        session: &mut Session,
        ticket: &TurnTicket,
        answer: &str,
        now_ms: i64,
    ) -> TurnState {
        let reply = Message::bot(ticket.pending_message_id.clone(), answer, now_ms);
        if !session.replace_message(reply.clone()) {
            tracing::warn!(
                session_id = %session.id,
                message_id = %ticket.pending_message_id,
                "Pending message vanished before the answer arrived; appending"
            );
            session.messages.push(reply);
        }

        self.state = if session.delay_seconds > 0 {
            TurnState::Cooldown {
                remaining_seconds: session.delay_seconds,
            }
        } else {
            TurnState::Idle
        };
        tracing::debug!(session_id = %session.id, state = ?self.state, "Turn completed");
        self.state.clone()
    }

    /// Advances an active cooldown by one second.
    pub fn tick(&mut self) -> &TurnState {
        if let TurnState::Cooldown { remaining_seconds } = self.state {
            self.state = match remaining_seconds.saturating_sub(1) {
                0 => TurnState::Idle,
                remaining_seconds => TurnState::Cooldown { remaining_seconds },
            };
        }
        &self.state
    }
}
