//! Line tokenization.
//!
//! The input grammar is deliberately small: words separated by whitespace,
//! with single or double quotes grouping words into one argument. There is
//! no escaping and no nesting; only the opening quote character is matched.

/// Split a raw input line into argument strings.
///
/// Splitting happens on runs of whitespace. A chunk that opens with `"` or
/// `'` but does not close with the same character absorbs the following
/// chunks, re-joined with single spaces, until one ends with the matching
/// quote. A completed token bounded by matching quotes front and back loses
/// exactly one quote at each end. Unterminated quotes are not an error: the
/// token simply runs to the end of the line, opening quote included.
///
/// Whitespace-only input yields an empty sequence.
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chunks = line.split_whitespace();
    while let Some(first) = chunks.next() {
        let mut token = first.to_string();
        if let Some(quote) = opening_quote(first) {
            if !first.ends_with(quote) {
                for chunk in chunks.by_ref() {
                    token.push(' ');
                    token.push_str(chunk);
                    if chunk.ends_with(quote) {
                        break;
                    }
                }
            }
        }
        tokens.push(strip_matching_quotes(token));
    }
    tokens
}

fn opening_quote(chunk: &str) -> Option<char> {
    match chunk.chars().next() {
        Some(c @ ('"' | '\'')) => Some(c),
        _ => None,
    }
}

/// Strip one quote from each end when a token is wrapped in the same quote
/// character. Everything else passes through untouched, including a lone
/// quote that never found its partner.
fn strip_matching_quotes(token: String) -> String {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return token[1..token.len() - 1].to_string();
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<String> {
        split_line(line)
    }

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(split("ls   -l \t /tmp"), ["ls", "-l", "/tmp"]);
    }

    #[test]
    fn empty_and_blank_lines_yield_nothing() {
        assert!(split("").is_empty());
        assert!(split("   \t  ").is_empty());
    }

    #[test]
    fn double_quotes_group_words() {
        assert_eq!(split("ls -l \"my dir\""), ["ls", "-l", "my dir"]);
    }

    #[test]
    fn single_quotes_group_words() {
        assert_eq!(split("cat 'a b c.txt'"), ["cat", "a b c.txt"]);
    }

    #[test]
    fn quoted_single_word_is_unwrapped() {
        assert_eq!(split("echo \"hi\""), ["echo", "hi"]);
        assert_eq!(split("echo ''"), ["echo", ""]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        assert_eq!(split("echo \"a b"), ["echo", "\"a b"]);
    }

    #[test]
    fn lone_quote_is_kept_as_is() {
        assert_eq!(split("echo \""), ["echo", "\""]);
    }

    #[test]
    fn only_the_opening_quote_character_matches() {
        // The inner single quote is plain text inside a double-quoted token.
        assert_eq!(split("echo \"it's fine\""), ["echo", "it's fine"]);
    }

    #[test]
    fn retokenizing_unquoted_tokens_is_idempotent() {
        let first = split("grep pattern file.txt");
        let rejoined = first.join(" ");
        assert_eq!(split(&rejoined), first);
    }
}
