//! Transcript rendering.

use maud::{Markup, html};

use super::quiz_card;
use crate::names;
use crate::ui::ExplanationMarkup;
use crate::widget::{ChatMessage, MessageBody, ReplyId, TranscriptEntry};

/// One chat bubble.
pub fn chat_message(message: &ChatMessage, markup: ExplanationMarkup) -> Markup {
    let class = format!("message {}-message message-animated", message.sender.as_str());
    html! {
        div class=(class) {
            div.message-content {
                p {
                    @match &message.body {
                        MessageBody::Text(text) => { (text) }
                        MessageBody::Markup(html) => { (markup.render(html)) }
                    }
                }
            }
        }
    }
}

/// A message or quiz card.
pub fn transcript_entry(
    session_id: &str,
    entry: &TranscriptEntry,
    markup: ExplanationMarkup,
) -> Markup {
    match entry {
        TranscriptEntry::Message(message) => chat_message(message, markup),
        TranscriptEntry::Quiz(card) => quiz_card(session_id, card),
    }
}

/// The scrollable transcript container with every entry so far.
pub fn message_list(
    session_id: &str,
    entries: &[TranscriptEntry],
    markup: ExplanationMarkup,
) -> Markup {
    html! {
        div.chat-window id=(names::CHAT_WINDOW_ID) aria-live="polite" aria-label="Chat messages" {
            @for entry in entries {
                (transcript_entry(session_id, entry, markup))
            }
        }
    }
}

/// Placeholder that fetches its own reply as soon as htmx loads it.
///
/// The settle response carries no in-band content, so the slot is removed and
/// the reply is appended out of band to the end of the transcript.
pub fn reply_slot(session_id: &str, reply_id: ReplyId) -> Markup {
    html! {
        div.reply-slot
            id=(names::reply_slot_id(reply_id))
            hx-post=(names::reply_url(session_id, reply_id))
            hx-trigger="load"
            hx-swap="outerHTML" {}
    }
}

/// Wrap content so htmx appends it to the transcript out of band.
pub fn append_to_window(content: &Markup) -> Markup {
    html! {
        div hx-swap-oob=(format!("beforeend:#{}", names::CHAT_WINDOW_ID)) {
            (content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_text_is_escaped() {
        let html = chat_message(
            &ChatMessage::user("<b>why</b>?"),
            ExplanationMarkup::Raw,
        )
        .into_string();

        assert!(html.contains("message user-message message-animated"));
        assert!(html.contains("&lt;b&gt;why&lt;/b&gt;?"));
    }

    #[test]
    fn test_explanation_follows_policy() {
        let message = ChatMessage::bot_markup("About <b>'inertia'</b><script>x</script>");

        let restricted = chat_message(&message, ExplanationMarkup::Restricted).into_string();
        assert!(restricted.contains("bot-message"));
        assert!(restricted.contains("<b>'inertia'</b>"));
        assert!(restricted.contains("&lt;script&gt;"));

        let raw = chat_message(&message, ExplanationMarkup::Raw).into_string();
        assert!(raw.contains("<script>x</script>"));
    }

    #[test]
    fn test_reply_slot_loads_itself() {
        let html = reply_slot("abc", 4).into_string();
        assert!(html.contains(r#"id="reply-4""#));
        assert!(html.contains(r#"hx-post="/sessions/abc/replies/4""#));
        assert!(html.contains(r#"hx-trigger="load""#));
    }
}
