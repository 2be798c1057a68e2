//! Small wikitext/HTML markup helpers shared by the renderers.

/// Placeholder substituted for private persons and notes.
pub const PRIVATE_PLACEHOLDER: &str = "(private)";

/// Display text for a bucket whose date has nothing to show.
pub const UNDATED_PLACEHOLDER: &str = "- - - - -";

/// Escapes text for embedding in HTML markup.
pub fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Note text as a paragraph with `<br/>` line breaks.
pub fn note_paragraph(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    format!("<p>{}</p>\n", lines.join("<br/>\n"))
}

#[cfg(test)]
mod tests {
    use super::{html_escape, note_paragraph};

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            html_escape(r#"<b>"Tom" & 'Jo'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jo&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn note_paragraph_breaks_lines() {
        assert_eq!(note_paragraph("a\nb"), "<p>a<br/>\nb</p>\n");
        assert_eq!(note_paragraph(""), "<p></p>\n");
    }
}
