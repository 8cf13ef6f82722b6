use ammonia::Builder;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Whitelist cleaner for rich-text blocks (paragraphs, blockquotes).
/// Inline formatting survives; scripts, iframes and event-handler
/// attributes do not.
static CLEANER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder.tags(HashSet::from([
        "a", "b", "strong", "i", "em", "u", "s", "code", "br", "mark", "sub", "sup",
    ]));
    builder
});

/// Clean HTML content using the ammonia library.
///
/// This employs a whitelist-based sanitization strategy: it preserves safe
/// inline tags (like <b>, <em>) while stripping dangerous tags (like <script>)
/// and malicious attributes (like onclick). Serves as a fail-safe against
/// Stored XSS regardless of which client wrote the content.
pub fn clean_html(input: &str) -> String {
    CLEANER.clean(input).to_string()
}

/// Entity-escape raw text. Used for code block content, where `<` and `&`
/// are legitimate characters that must survive display verbatim.
pub fn escape_text(input: &str) -> String {
    ammonia::clean_text(input)
}
