//! Chat turn sequencing.
//!
//! A turn moves a session through `Idle -> AwaitingAnswer -> Cooldown -> Idle`.
//! The machine only mutates the session value it is handed; persisting the
//! result and calling the answer generator is the caller's job.

mod context;
mod machine;

pub use context::{
    AnswerPlan, CONTEXT_SEPARATOR, NO_CONTEXT_MARKER, NO_DOCUMENTS_REPLY, build_context,
    plan_answer,
};
pub use machine::{TurnMachine, TurnRejection, TurnState, TurnTicket};
