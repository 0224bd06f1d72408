use anyhow::Result;
use colored::Colorize;

use super::notice;
use crate::context::AppContext;

pub fn list(ctx: &AppContext) {
    let sessions = ctx.sessions().list();
    if sessions.is_empty() {
        notice("No chat sessions yet. Create one with `persona sessions new`.");
        return;
    }
    for session in sessions {
        let delay = if session.delay_seconds > 0 {
            format!("  delay {}s", session.delay_seconds)
        } else {
            String::new()
        };
        println!(
            "{}  {}  {}{}",
            session.id.bright_black(),
            session.title,
            format!("{} messages", session.messages.len()).bright_black(),
            delay.bright_black()
        );
    }
}

pub fn create(ctx: &AppContext, title: Option<&str>) {
    let service = ctx.sessions();
    let session = match title {
        Some(title) => service.create_titled(title),
        None => service.create(),
    };
    println!("{} {} ({})", "created".green(), session.title, session.id);
    println!("{}", format!("persona chat {}", session.id).bright_black());
}

pub fn rename(ctx: &AppContext, id: &str, title: &str) -> Result<()> {
    let session = ctx.sessions().rename(id, title)?;
    println!("{} {}", "renamed".green(), session.title);
    Ok(())
}

pub fn set_delay(ctx: &AppContext, id: &str, seconds: u32) -> Result<()> {
    let session = ctx.sessions().set_delay(id, seconds)?;
    println!(
        "{} {} now waits {}s after each answer",
        "updated".green(),
        session.title,
        session.delay_seconds
    );
    Ok(())
}

pub fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    let session = ctx.sessions().delete(id)?;
    println!("{} {}", "deleted".yellow(), session.title);
    Ok(())
}

pub fn stats(ctx: &AppContext) {
    println!("{}", ctx.sessions().stats());
}
