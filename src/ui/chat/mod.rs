//! Chat widget fragments.
//!
//! Each function renders one piece of the widget. Full-page renders and
//! htmx fragment responses are built from the same pieces, so a message looks
//! the same whether it arrived with the page or was appended later.

mod header;
mod input_area;
mod loading;
mod message_list;
mod quiz;
mod shell;

pub use header::chat_header;
pub use input_area::chat_input_area;
pub use loading::{loading_indicator, loading_indicator_oob};
pub use message_list::{append_to_window, chat_message, message_list, reply_slot, transcript_entry};
pub use quiz::quiz_card;
pub use shell::chat_shell;
