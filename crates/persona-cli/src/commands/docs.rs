use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use super::notice;
use crate::context::AppContext;

pub fn upload(ctx: &AppContext, files: &[PathBuf]) {
    let outcome = ctx.documents().upload_files(files);

    for document in &outcome.added {
        println!("{} {} ({})", "added".green(), document.name, document.id.bright_black());
    }
    for failure in &outcome.failures {
        eprintln!("{} {}", "skipped".red(), failure.message);
    }
    if outcome.added.is_empty() && outcome.failures.is_empty() {
        notice("Nothing to upload.");
    }
}

pub fn list(ctx: &AppContext) {
    let documents = ctx.documents().list();
    if documents.is_empty() {
        notice("No documents uploaded.");
        return;
    }
    for document in documents {
        println!(
            "{}  {}  {}",
            document.id.bright_black(),
            document.name,
            format!("{} chars", document.content.chars().count()).bright_black()
        );
    }
}

pub fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let document = ctx
        .documents()
        .find(id)
        .ok_or_else(|| anyhow::anyhow!("Document not found: {id}"))?;
    println!("{}", document.name.bright_magenta().bold());
    println!();
    println!("{}", document.content);
    Ok(())
}

pub fn remove(ctx: &AppContext, id: &str) -> Result<()> {
    let removed = ctx.documents().remove(id)?;
    println!("{} {}", "removed".yellow(), removed.name);
    Ok(())
}
