//! Full page render.

use maud::{DOCTYPE, Markup, html};

use super::ExplanationMarkup;
use super::chat::chat_shell;
use crate::names;
use crate::widget::ChatWidget;

/// htmx build the widget is written against.
pub const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js";

fn head(title: &str) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="description" content="Concept explanations and quick quizzes for JEE and NEET";
            title { (title) }
            link rel="stylesheet" href=(format!("{}/widget.css", names::STATIC_URL));
            script src=(HTMX_SRC) {}
        }
    }
}

/// The page hosting one widget session.
pub fn page(session_id: &str, widget: &ChatWidget, markup: ExplanationMarkup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head("Study Buddy - JEE & NEET"))
            body {
                main.app {
                    (chat_shell(session_id, widget, markup))
                }
                script src=(format!("{}/widget.js", names::STATIC_URL)) {}
            }
        }
    }
}
