//! Loading indicator.

use maud::{Markup, html};

use crate::names;

/// The indicator as part of the page.
pub fn loading_indicator(visible: bool) -> Markup {
    indicator(visible, false)
}

/// The indicator as an out-of-band swap, so any response can flip it.
pub fn loading_indicator_oob(visible: bool) -> Markup {
    indicator(visible, true)
}

fn indicator(visible: bool, oob: bool) -> Markup {
    html! {
        div.loading-indicator.hidden[!visible]
            id=(names::LOADING_INDICATOR_ID)
            hx-swap-oob=[oob.then_some("true")]
            aria-live="polite" {
            span.dot {}
            span.dot {}
            span.dot {}
            span.visually-hidden { "Thinking..." }
        }
    }
}
