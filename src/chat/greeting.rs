//! Canned replies for bare greetings.
//!
//! A greeting on its own doesn't need a model call, and the model has a
//! tendency to echo greetings verbatim, so exact matches are answered
//! locally. Matching is equality only after trimming and lowercasing;
//! anything beyond a bare greeting ("hi there") goes to the model.

const GREETINGS: &[&str] = &["hi", "hello", "hey", "你好", "您好"];

const CANNED_REPLY: &str = "Hello! I'm your math tutor. Tell me which problem \
you're working on, or upload a photo of it, and we'll reason through it together \
one step at a time.";

/// The canned reply for a trivial greeting, or `None` when the input
/// should go to the model.
pub fn canned_reply(input: &str) -> Option<&'static str> {
    let normalized = input.trim().to_lowercase();
    GREETINGS
        .contains(&normalized.as_str())
        .then_some(CANNED_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_greetings_match() {
        assert!(canned_reply("hi").is_some());
        assert!(canned_reply("hello").is_some());
        assert!(canned_reply("你好").is_some());
    }

    #[test]
    fn test_matching_normalizes_case_and_whitespace() {
        assert!(canned_reply("Hi").is_some());
        assert!(canned_reply("hi ").is_some());
        assert!(canned_reply("  HELLO  ").is_some());
    }

    #[test]
    fn test_substrings_do_not_match() {
        assert!(canned_reply("hi there").is_none());
        assert!(canned_reply("hello, can you solve 2x=6?").is_none());
        assert!(canned_reply("").is_none());
    }
}
