use anyhow::Result;
use colored::Colorize;
use persona_application::Route;
use persona_application::share_service::SHARE_LINK_NOTE;

use super::{chat, notice, sessions};
use crate::context::AppContext;

pub fn share(ctx: &AppContext, session_id: &str) -> Result<()> {
    let url = ctx.share().share_url(session_id)?;
    println!("{url}");
    eprintln!("{}", SHARE_LINK_NOTE.bright_black());
    Ok(())
}

/// Follows a route the way the router would and shows the resulting view.
pub async fn open(ctx: &AppContext, target: &str) -> Result<()> {
    let navigation = ctx.share().open(target);
    if let Some(text) = &navigation.notice {
        eprintln!("{}", text.yellow());
    }

    match navigation.route {
        Route::Chat { session_id } => chat::run(ctx, &session_id).await,
        Route::Admin | Route::Share { .. } => {
            println!("{}", "=== Admin ===".bright_magenta().bold());
            sessions::stats(ctx);
            println!();
            sessions::list(ctx);
            notice("Upload files with `persona upload <FILES>`.");
            Ok(())
        }
    }
}
