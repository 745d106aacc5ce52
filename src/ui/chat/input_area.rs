//! Question input and the placeholder affordances.

use maud::{Markup, html};

use crate::names;

/// Sends only the picked file's name; the file itself never leaves the page.
const IMAGE_VALS: &str = r#"js:{filename: (this.files && this.files[0]) ? this.files[0].name : ""}"#;

/// Question form, record button, and image picker.
///
/// The form appends its response to the transcript. The record button and
/// the image picker only ever produce an alert.
pub fn chat_input_area(session_id: &str, placeholder: &str) -> Markup {
    html! {
        div.chat-input-area {
            div.chat-tools {
                button.icon-button
                    id=(names::RECORD_BUTTON_ID)
                    type="button"
                    title="Ask by voice"
                    hx-post=(names::RECORD_URL)
                    hx-swap="none" {
                    "\u{1F3A4}"
                }
                label.icon-button for=(names::IMAGE_UPLOAD_ID) title="Upload a problem image" {
                    "\u{1F4F7}"
                }
                input.visually-hidden
                    id=(names::IMAGE_UPLOAD_ID)
                    type="file"
                    accept="image/*"
                    hx-post=(names::IMAGE_URL)
                    hx-trigger="change"
                    hx-vals=(IMAGE_VALS)
                    hx-swap="none";
            }
            form.chat-form
                id=(names::CHAT_FORM_ID)
                hx-post=(names::messages_url(session_id))
                hx-target=(format!("#{}", names::CHAT_WINDOW_ID))
                hx-swap="beforeend" {
                input
                    id=(names::USER_INPUT_ID)
                    type="text"
                    name=(names::QUERY_FIELD)
                    placeholder=(placeholder)
                    autocomplete="off"
                    aria-label="Your question";
                button.send-button type="submit" { "Send" }
            }
        }
    }
}
