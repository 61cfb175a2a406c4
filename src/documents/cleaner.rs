// Text normalisation applied to every extracted document

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

static WHITESPACE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(r"\s+"));
static DISALLOWED: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"[^\w\s.,;:!?'"-]"#));

/// Drops characters outside word characters, whitespace and `. , ; : ! ? ' " -`,
/// then collapses whitespace runs to a single space and trims.
///
/// Never fails: if the patterns could not be built the input is returned unchanged.
pub fn clean_text(text: &str) -> String {
    match (&*DISALLOWED, &*WHITESPACE) {
        (Ok(disallowed), Ok(whitespace)) => {
            // Stripping first keeps removed symbols from leaving double spaces behind.
            let stripped = disallowed.replace_all(text, "");
            let collapsed = whitespace.replace_all(&stripped, " ");
            collapsed.trim().to_string()
        }
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Error cleaning text, using original");
            text.to_string()
        }
    }
}
