// src/utils/html.rs

use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Post and comment bodies arrive as free-form user text; this applies
/// whitelist-based sanitization so stored content cannot carry scripts or
/// malicious attributes into whatever client renders it later.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
