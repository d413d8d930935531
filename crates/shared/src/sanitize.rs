//! Free-text sanitization for user submitted content.
//!
//! Stored text is rendered by the web client, so markup is stripped rather
//! than escaped. This is not an HTML parser; it removes the shapes that
//! matter for stored XSS and leaves plain prose untouched.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCRIPT_BLOCK: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap();
    static ref STYLE_BLOCK: Regex = Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"(?s)</?[a-zA-Z!][^>]*>").unwrap();
    static ref JS_URI: Regex = Regex::new(r"(?i)javascript\s*:").unwrap();
    static ref EVENT_HANDLER: Regex = Regex::new(r"(?i)\bon[a-z]+\s*=").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strips scripts, styles, tags, `javascript:` URIs and inline event handlers,
/// then collapses whitespace.
///
/// Removal passes repeat until nothing changes, so fragments that join up
/// into a new match after one pass (`javajavascript:script:`) are removed too.
pub fn sanitize_text(input: &str) -> String {
    let mut text = input.to_string();
    loop {
        let next = strip_once(&text);
        if next == text {
            break;
        }
        text = next;
    }
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn strip_once(input: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(input, " ");
    let text = STYLE_BLOCK.replace_all(&text, " ");
    let text = HTML_TAG.replace_all(&text, " ");
    let text = JS_URI.replace_all(&text, "");
    EVENT_HANDLER.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(
            sanitize_text("Love the lo-fi channel, thanks!"),
            "Love the lo-fi channel, thanks!"
        );
    }

    #[test]
    fn test_script_block_removed_with_contents() {
        assert_eq!(
            sanitize_text("hello <script>alert('x')</script> world"),
            "hello world"
        );
        assert_eq!(
            sanitize_text("<SCRIPT type=\"text/javascript\">\nsteal()\n</SCRIPT>ok"),
            "ok"
        );
    }

    #[test]
    fn test_style_block_removed() {
        assert_eq!(sanitize_text("<style>body{}</style>text"), "text");
    }

    #[test]
    fn test_tags_stripped_text_kept() {
        assert_eq!(
            sanitize_text("<p>The <b>player</b> froze</p>"),
            "The player froze"
        );
    }

    #[test]
    fn test_javascript_uri_and_handlers_removed() {
        let out = sanitize_text("click javascript:alert(1) onclick=evil()");
        assert!(!out.to_lowercase().contains("javascript:"));
        assert!(!out.contains("onclick="));
    }

    #[test]
    fn test_comparison_operators_survive() {
        assert_eq!(sanitize_text("buffering < 2s and > 1s"), "buffering < 2s and > 1s");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(sanitize_text("  a \n\n\t b  "), "a b");
    }

    #[test]
    fn test_markup_only_is_empty() {
        assert_eq!(sanitize_text("<div><img src=x onerror=y></div>"), "");
        assert_eq!(sanitize_text("<script>long long long text</script>"), "");
    }

    #[test]
    fn test_nested_uri_and_handler_fragments_removed() {
        let out = sanitize_text("see javajavascript:script:alert(1) and ononclick=click=x");
        assert!(!out.to_lowercase().contains("javascript:"), "{}", out);
        assert!(!out.contains("onclick="), "{}", out);
        assert_eq!(out, "see alert(1) and click=x");

        let out = sanitize_text("jajavascript:vajavascript:script:go()");
        assert!(!out.to_lowercase().contains("javascript:"), "{}", out);
        assert_eq!(out, "go()");
    }

    #[test]
    fn test_nested_tags_removed() {
        let out = sanitize_text("<scr<script>x</script>ipt>alert(1)</script>");
        assert!(!out.to_lowercase().contains("<script"), "{}", out);
        assert!(!out.contains('<'), "{}", out);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "ononclick=click=x",
            "<b>bold</b> javajavascript:script:",
            "plain words",
        ];
        for input in inputs {
            let once = sanitize_text(input);
            assert_eq!(sanitize_text(&once), once);
        }
    }

    #[test]
    fn test_plain_sentences_untouched() {
        use fake::{faker::lorem::en::Sentence, Fake};

        for _ in 0..20 {
            let text: String = Sentence(3..10).fake();
            assert_eq!(sanitize_text(&text), text);
        }
    }
}
