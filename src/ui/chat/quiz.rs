//! Quiz card.

use maud::{Markup, html};

use crate::names;
use crate::widget::QuizCard;

/// A quiz card; every control is disabled once the card is answered.
pub fn quiz_card(session_id: &str, card: &QuizCard) -> Markup {
    let answered = card.is_answered();
    let quiz = card.quiz();
    let card_id = names::quiz_card_id(card.id());

    html! {
        div.message.bot-message.message-animated id=(card_id) {
            div.message-content {
                form.quiz-container
                    hx-post=(names::quiz_answer_url(session_id, card.id()))
                    hx-target=(format!("#{card_id}"))
                    hx-swap="outerHTML" {
                    p.quiz-question { (quiz.question) }
                    div.quiz-options {
                        @for option in &quiz.options {
                            label {
                                input type="radio"
                                    name=(names::QUIZ_OPTION_FIELD)
                                    value=(option)
                                    checked[card.choice() == Some(option.as_str())]
                                    disabled[answered];
                                span { (option) }
                            }
                        }
                    }
                    button.quiz-submit type="submit" disabled[answered] { "Check Answer" }
                }
            }
        }
    }
}
