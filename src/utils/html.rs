// src/utils/html.rs

use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Assistant replies are rendered by the frontend, so they pass through a
/// whitelist sanitizer: safe tags (like <b>, <p>) stay, dangerous tags
/// (like <script>, <iframe>) and attributes (like onclick) are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_keeps_formatting() {
        let cleaned = clean_html("<b>hint</b><script>alert(1)</script>");
        assert_eq!(cleaned, "<b>hint</b>");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(clean_html("the answer is 42"), "the answer is 42");
    }
}
