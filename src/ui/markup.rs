//! Rendering policy for explanation markup.
//!
//! Explanations come from the ask endpoint and may contain simple inline
//! HTML such as `<b>`. Under [`ExplanationMarkup::Restricted`] everything is
//! escaped and then a short list of attribute-free formatting tags is let
//! back through; [`ExplanationMarkup::Raw`] inserts the text verbatim.

use maud::{PreEscaped, html};
use serde::Deserialize;

/// Tags re-enabled by the restricted policy.
const ALLOWED_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "code", "sub", "sup", "br", "p", "ul", "ol", "li",
];

/// How server-provided explanation markup is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationMarkup {
    /// Escape, then allow a fixed set of inline formatting tags.
    #[default]
    Restricted,
    /// Insert the explanation unchanged.
    Raw,
}

impl ExplanationMarkup {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restricted => "restricted",
            Self::Raw => "raw",
        }
    }

    /// Render an explanation under this policy.
    #[must_use]
    pub fn render(self, explanation: &str) -> PreEscaped<String> {
        match self {
            Self::Raw => PreEscaped(explanation.to_string()),
            Self::Restricted => PreEscaped(restore_allowed_tags(&escape(explanation))),
        }
    }
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Turn escaped `&lt;tag&gt;` sequences for allowed tags back into tags.
fn restore_allowed_tags(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;

    while let Some(start) = rest.find("&lt;") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start + "&lt;".len()..];

        match parse_allowed_tag(candidate) {
            Some((tag, consumed)) => {
                out.push_str(&tag);
                rest = &candidate[consumed..];
            }
            None => {
                out.push_str("&lt;");
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Recognise `name&gt;`, `/name&gt;`, `name/&gt;` or `name /&gt;`.
///
/// Returns the literal tag and how many bytes of `s` it spans.
fn parse_allowed_tag(s: &str) -> Option<(String, usize)> {
    let end = s.find("&gt;")?;
    let inner = &s[..end];
    let consumed = end + "&gt;".len();

    let (closing, name) = match inner.strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, inner),
    };
    let (self_closing, name) = match name.strip_suffix('/') {
        Some(name) => (true, name.trim_end()),
        None => (false, name),
    };

    let name = name.to_ascii_lowercase();
    if closing && self_closing {
        return None;
    }
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }

    let tag = match (closing, self_closing) {
        (true, _) => format!("</{name}>"),
        (false, true) => format!("<{name}/>"),
        (false, false) => format!("<{name}>"),
    };
    Some((tag, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted(s: &str) -> String {
        ExplanationMarkup::Restricted.render(s).into_string()
    }

    #[test]
    fn test_inline_formatting_survives() {
        assert_eq!(
            restricted("This is about <b>'inertia'</b>."),
            "This is about <b>'inertia'</b>."
        );
        assert_eq!(restricted("a<br>b<BR/>c<br />d"), "a<br>b<br/>c<br/>d");
        assert_eq!(restricted("<Strong>x</STRONG>"), "<strong>x</strong>");
    }

    #[test]
    fn test_everything_else_is_escaped() {
        assert_eq!(
            restricted("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(
            restricted("<b onclick=\"x()\">hi</b>"),
            "&lt;b onclick=&quot;x()&quot;&gt;hi</b>"
        );
        assert_eq!(restricted("1 < 2 && 3 > 2"), "1 &lt; 2 &amp;&amp; 3 &gt; 2");
        assert_eq!(restricted("</>"), "&lt;/&gt;");
    }

    #[test]
    fn test_raw_is_verbatim() {
        let html = "<img src=x onerror=alert(1)>";
        assert_eq!(ExplanationMarkup::Raw.render(html).into_string(), html);
    }
}
