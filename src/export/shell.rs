//! Minimal HTML document shell
//!
//! Paragraphs are inferred purely from line breaks in the rendered text;
//! markup inside a line is never inspected.

use serde::{Deserialize, Serialize};

/// Per-document metadata handed to assembly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EbookMetadata {
    pub title: String,
}

/// Wrap each line of `rendered` in a paragraph and the whole in an HTML shell
///
/// The title is escaped; rendered lines are passed through as-is since they
/// already carry annotation markup.
pub fn assemble(rendered: &str, title: &str, paragraph_class: &str) -> String {
    let mut document = format!(
        "<html>\n<head>\n\t<title>{}</title>\n</head>\n<body>\n",
        html_escape::encode_text(title)
    );
    for line in rendered.lines() {
        document.push_str(&format!(
            "<p class=\"{}\">{}</p>\n",
            html_escape::encode_double_quoted_attribute(paragraph_class),
            line
        ));
    }
    document.push_str("</body>\n</html>");
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_paragraph_per_line() {
        let html = assemble("first\nsecond", "Title", "tibetan-regular-indented");

        assert_eq!(
            html,
            "<html>\n<head>\n\t<title>Title</title>\n</head>\n<body>\n\
             <p class=\"tibetan-regular-indented\">first</p>\n\
             <p class=\"tibetan-regular-indented\">second</p>\n\
             </body>\n</html>"
        );
    }

    #[test]
    fn test_markup_passes_through() {
        let html = assemble(
            "<span class=\"tibetan-chapter\">ལེའུ།</span>",
            "t",
            "p",
        );
        assert!(html.contains("<p class=\"p\"><span class=\"tibetan-chapter\">ལེའུ།</span></p>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = assemble("", "Tom & <Jerry>", "p");
        assert!(html.contains("<title>Tom &amp; &lt;Jerry&gt;</title>"));
        assert!(!html.contains("<p"));
    }

    #[test]
    fn test_crlf_lines() {
        let html = assemble("a\r\nb\r\n", "t", "p");
        assert_eq!(html.matches("<p class=\"p\">").count(), 2);
        assert!(!html.contains('\r'));
    }
}
