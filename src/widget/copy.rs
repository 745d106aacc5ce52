//! User-facing copy shown by the widget.

/// Placeholder for the question input.
pub const DEFAULT_PLACEHOLDER: &str = "Ask about Rotational Motion, P-Block Elements...";

/// First bot message of every fresh transcript.
pub const DEFAULT_WELCOME: &str = "Gearing up for JEE or NEET? I'm here to help. Ask a tough \
     concept from Physics, Chemistry, Maths, or Biology to get started!";

/// Shown in place of an explanation when the ask request fails.
pub const APOLOGY: &str = "Oops! I'm having trouble connecting. Don't let this interrupt your \
     study flow. Please check your network and try again.";

/// Alert raised when a quiz is submitted with nothing selected.
pub const SELECT_AN_OPTION: &str = "Please select an option.";

/// Reply to a correct quiz answer.
pub const CORRECT_ANSWER: &str =
    "That's correct! A solid concept, crucial for NEET/JEE. Well done.";

/// Alert raised by the record button.
pub const VOICE_INPUT_NOTICE: &str = "Voice input is coming soon! You'll be able to ask complex \
     Physics and Chemistry questions hands-free.";

/// Reply to an incorrect quiz answer; reveals the expected option.
pub fn incorrect_answer(answer: &str) -> String {
    format!(
        "Not quite. The correct answer is \"{answer}\". Understanding this distinction is key \
         for competitive exams. Let's try another one!"
    )
}

/// Alert raised when an image is picked for upload.
pub fn image_selected(file_name: &str) -> String {
    format!(
        "Image selected: {file_name}. \n\nIn the full version, I'll solve this Maths problem or \
         Biology diagram for you!"
    )
}
