//! Chat header.

use maud::{Markup, html};

/// Title bar above the transcript.
pub fn chat_header(title: &str, subtitle: &str) -> Markup {
    html! {
        header.chat-header {
            h1 { (title) }
            p.chat-subtitle { (subtitle) }
        }
    }
}
