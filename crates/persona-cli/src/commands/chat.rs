//! Interactive chat view over one session.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use persona_core::PersonaError;
use persona_core::chat::TurnRejection;
use persona_core::session::{Message, Sender};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::notice;
use crate::context::AppContext;

const COMMANDS: [&str; 3] = ["/share", "/status", "/quit"];

/// Completion and hints for the chat view's slash commands.
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

fn print_message(message: &Message) {
    match message.sender {
        Sender::User => println!("{}", format!("> {}", message.text).green()),
        Sender::Bot if message.is_loading => println!("{}", "...".bright_black()),
        Sender::Bot => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
    println!();
}

pub async fn run(ctx: &AppContext, session_id: &str) -> Result<()> {
    let Some(session) = ctx.sessions().find(session_id) else {
        println!("{}", "Chat session not found.".red());
        notice("List sessions with `persona sessions list`.");
        return Ok(());
    };

    let chat = ctx.chat();
    let _sync = ctx.state.spawn_sync();

    println!("{}", format!("=== {} ===", session.title).bright_magenta().bold());
    notice("Type a question, '/share' for a link, or '/quit' to leave.");
    println!();
    for message in &session.messages {
        print_message(message);
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        let trimmed = line.trim();
        match trimmed {
            "" => continue,
            "/quit" | "/exit" | "quit" | "exit" => break,
            "/share" => {
                match ctx.share().share_url(session_id) {
                    Ok(url) => {
                        println!("{url}");
                        notice(persona_application::share_service::SHARE_LINK_NOTE);
                    }
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
                continue;
            }
            "/status" => {
                println!("{:?}", chat.turn_state(session_id).await);
                continue;
            }
            _ => {}
        }

        let _ = rl.add_history_entry(trimmed);
        // Pick up writes from other processes sharing the store.
        ctx.state.reload();

        match chat.send(session_id, trimmed).await {
            Ok(outcome) => {
                println!();
                print_message(&outcome.reply);
            }
            Err(PersonaError::Turn(TurnRejection::CoolingDown { remaining_seconds })) => {
                println!(
                    "{}",
                    format!("Please wait {remaining_seconds}s before sending another message.")
                        .yellow()
                );
            }
            Err(e) if e.is_not_found() => {
                println!("{}", "Chat session not found.".red());
                break;
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }

    Ok(())
}
