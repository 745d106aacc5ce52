//! Server-rendered widget markup.
//!
//! Everything is rendered with maud and wired with htmx attributes; the only
//! client script is `static/widget.js`, which turns alert events into
//! `window.alert`, clears the input on submit, and keeps the transcript
//! scrolled to the bottom.
//!
//! # Structure
//!
//! - [`app`]: full page
//! - [`chat`]: widget fragments (messages, quiz cards, input, indicator)
//! - [`markup`]: explanation rendering policy

pub mod app;
pub mod chat;
pub mod markup;

pub use markup::ExplanationMarkup;
