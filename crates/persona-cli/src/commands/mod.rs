pub mod chat;
pub mod docs;
pub mod sessions;
pub mod share;

use colored::Colorize;

/// Prints a line meant for the user but not part of any conversation.
pub fn notice(text: &str) {
    println!("{}", text.bright_black());
}
