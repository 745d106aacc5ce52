//! Chat shell layout.

use maud::{Markup, html};

use super::{chat_header, chat_input_area, loading_indicator, message_list};
use crate::ui::ExplanationMarkup;
use crate::widget::ChatWidget;

/// The complete widget: header, transcript, loading indicator, input.
pub fn chat_shell(session_id: &str, widget: &ChatWidget, markup: ExplanationMarkup) -> Markup {
    html! {
        div.chat-container data-session-id=(session_id) {
            (chat_header("Study Buddy", "Physics \u{00B7} Chemistry \u{00B7} Maths \u{00B7} Biology"))
            (message_list(session_id, widget.transcript().entries(), markup))
            (loading_indicator(widget.is_loading()))
            (chat_input_area(session_id, widget.placeholder()))
        }
    }
}
