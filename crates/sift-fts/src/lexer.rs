//! Query lexer.
//!
//! Turns a raw query string into a [`ParsedInput`] in one pass over its
//! characters. The grammar:
//!
//! | Char | Meaning |
//! |------|---------|
//! | whitespace | ends the current group (literal inside quotes) |
//! | `"` | opens / closes a quoted group |
//! | `\` | the next character is literal |
//! | `-` | at group start: the group is denied |
//! | `@` | at group start: the group is a tag |
//!
//! Quote characters are counted up front. When a quote would open a group but
//! it is the last one left, it has no partner and is taken literally, so a
//! stray `"` never swallows the rest of the query. Escaped quotes count too.
//!
//! ```
//! use sift_fts::lexer::parse;
//!
//! let parsed = parse(r#"foo -bar "baz qux" @tag -@notag"#);
//! assert_eq!(parsed.required_groups, vec!["foo", "baz qux"]);
//! assert_eq!(parsed.denied_groups, vec!["bar"]);
//! assert_eq!(parsed.required_tags, vec!["tag"]);
//! assert_eq!(parsed.denied_tags, vec!["notag"]);
//! ```

use crate::types::ParsedInput;

const QUOTE: char = '"';
const ESCAPE: char = '\\';
const NEGATE: char = '-';
const TAG: char = '@';

/// Parse a raw query.
pub fn parse(raw: &str) -> ParsedInput {
    let trimmed = raw.trim();
    let mut lexer = Lexer {
        remaining_quotes: trimmed.chars().filter(|&c| c == QUOTE).count(),
        ..Lexer::default()
    };
    let mut output = ParsedInput {
        original: raw.to_string(),
        ..ParsedInput::default()
    };

    for c in trimmed.chars() {
        lexer.feed(c, &mut output);
    }
    lexer.flush(&mut output);

    output
}

#[derive(Debug, Default)]
struct Lexer {
    group: String,
    remaining_quotes: usize,
    in_quote: bool,
    quoted: bool,
    escaped: bool,
    negate: bool,
    tag: bool,
}

impl Lexer {
    fn at_group_start(&self) -> bool {
        self.group.is_empty() && !self.quoted && !self.in_quote
    }

    fn feed(&mut self, c: char, output: &mut ParsedInput) {
        if self.escaped {
            self.escaped = false;
            if c == QUOTE {
                self.remaining_quotes = self.remaining_quotes.saturating_sub(1);
            }
            self.group.push(c);
            return;
        }

        match c {
            ESCAPE => self.escaped = true,
            QUOTE => self.quote(),
            c if c.is_whitespace() && !self.in_quote => self.flush(output),
            NEGATE if self.at_group_start() && !self.negate => self.negate = true,
            TAG if self.at_group_start() && !self.tag => self.tag = true,
            c => self.group.push(c),
        }
    }

    fn quote(&mut self) {
        let partnered = self.remaining_quotes >= 2;
        self.remaining_quotes = self.remaining_quotes.saturating_sub(1);
        if self.in_quote {
            self.in_quote = false;
        } else if partnered {
            self.in_quote = true;
            self.quoted = true;
        } else {
            self.group.push(QUOTE);
        }
    }

    fn flush(&mut self, output: &mut ParsedInput) {
        let text = self.group.trim();
        if !text.is_empty() {
            let text = text.to_string();
            let target = match (self.tag, self.negate) {
                (true, true) => &mut output.denied_tags,
                (true, false) => &mut output.required_tags,
                (false, true) => &mut output.denied_groups,
                (false, false) => &mut output.required_groups,
            };
            target.push(text.clone());
            output.last_group = Some(text);
        }

        self.group.clear();
        self.in_quote = false;
        self.quoted = false;
        self.escaped = false;
        self.negate = false;
        self.tag = false;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ------------------------------------------------------------------------
    // Basic grouping
    // ------------------------------------------------------------------------

    #[test]
    fn test_mixed_query() {
        let parsed = parse(r#"foo -bar "baz qux" @tag -@notag"#);
        assert_eq!(parsed.required_groups, vec!["foo", "baz qux"]);
        assert_eq!(parsed.denied_groups, vec!["bar"]);
        assert_eq!(parsed.required_tags, vec!["tag"]);
        assert_eq!(parsed.denied_tags, vec!["notag"]);
        assert_eq!(parsed.last_group.as_deref(), Some("notag"));
    }

    #[test]
    fn test_plain_words() {
        let parsed = parse("a b c");
        assert_eq!(parsed.required_groups, vec!["a", "b", "c"]);
        assert!(parsed.required_tags.is_empty());
        assert!(parsed.denied_groups.is_empty());
        assert!(parsed.denied_tags.is_empty());
    }

    #[test]
    fn test_original_preserved() {
        let parsed = parse("  hello  ");
        assert_eq!(parsed.original, "  hello  ");
        assert_eq!(parsed.required_groups, vec!["hello"]);
    }

    #[test]
    fn test_consecutive_separators() {
        let parsed = parse("a    b\t\tc");
        assert_eq!(parsed.required_groups, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse("   ");
        assert!(parsed.is_empty());
        assert!(parsed.last_group.is_none());
    }

    // ------------------------------------------------------------------------
    // Negation and tags
    // ------------------------------------------------------------------------

    #[test]
    fn test_bare_modifiers_produce_nothing() {
        let parsed = parse("- @ -@ foo");
        assert_eq!(parsed.required_groups, vec!["foo"]);
        assert!(parsed.denied_groups.is_empty());
        assert!(parsed.required_tags.is_empty());
        assert!(parsed.denied_tags.is_empty());
    }

    #[test]
    fn test_inner_hyphen_is_literal() {
        let parsed = parse("full-text e-mail");
        assert_eq!(parsed.required_groups, vec!["full-text", "e-mail"]);
    }

    #[test]
    fn test_flags_reset_after_group() {
        let parsed = parse("-one two @three four");
        assert_eq!(parsed.denied_groups, vec!["one"]);
        assert_eq!(parsed.required_groups, vec!["two", "four"]);
        assert_eq!(parsed.required_tags, vec!["three"]);
    }

    #[test]
    fn test_tag_then_negate_order() {
        let parsed = parse("@-news");
        assert_eq!(parsed.denied_tags, vec!["news"]);
    }

    #[test]
    fn test_double_negate_keeps_second_literal() {
        let parsed = parse("--foo");
        assert_eq!(parsed.denied_groups, vec!["-foo"]);
    }

    #[test]
    fn test_negated_phrase() {
        let parsed = parse(r#"-"cookie banner" privacy"#);
        assert_eq!(parsed.denied_groups, vec!["cookie banner"]);
        assert_eq!(parsed.required_groups, vec!["privacy"]);
    }

    // ------------------------------------------------------------------------
    // Quotes and escapes
    // ------------------------------------------------------------------------

    #[test]
    fn test_single_quote_is_literal() {
        let parsed = parse(r#"say "hello world"#);
        assert_eq!(parsed.required_groups, vec!["say", "\"hello", "world"]);
    }

    #[test]
    fn test_trailing_lone_quote() {
        let parsed = parse(r#"foo bar""#);
        assert_eq!(parsed.required_groups, vec!["foo", "bar\""]);
    }

    #[test]
    fn test_modifiers_inside_quotes_literal() {
        let parsed = parse(r#""-x @y""#);
        assert_eq!(parsed.required_groups, vec!["-x @y"]);
    }

    #[test]
    fn test_escaped_quote_consumes_counter() {
        // Two quotes in total: the escaped one is literal, which leaves the
        // second one without partner, so it is literal as well.
        let parsed = parse(r#"\"a "b"#);
        assert_eq!(parsed.required_groups, vec!["\"a", "\"b"]);
    }

    #[test]
    fn test_escaped_space_joins_words() {
        let parsed = parse(r"new\ york city");
        assert_eq!(parsed.required_groups, vec!["new york", "city"]);
    }

    #[test]
    fn test_escaped_modifiers_literal() {
        let parsed = parse(r"\-5 \@home");
        assert_eq!(parsed.required_groups, vec!["-5", "@home"]);
    }

    #[test]
    fn test_empty_quotes_produce_nothing() {
        let parsed = parse(r#""" foo"#);
        assert_eq!(parsed.required_groups, vec!["foo"]);
    }

    #[test]
    fn test_quote_joined_with_text() {
        let parsed = parse(r#""foo bar"baz"#);
        assert_eq!(parsed.required_groups, vec!["foo barbaz"]);
    }

    #[test]
    fn test_unterminated_quote_with_partner_later_escaped() {
        let parsed = parse(r#""a b\" c"#);
        // Opening quote had a partner when seen; the escaped partner is
        // literal, so the group runs to the end of input.
        assert_eq!(parsed.required_groups, vec!["a b\" c"]);
    }

    // ------------------------------------------------------------------------
    // Property tests
    // ------------------------------------------------------------------------

    proptest! {
        #[test]
        fn prop_groups_never_empty(raw in "\\PC{0,64}") {
            let parsed = parse(&raw);
            for group in parsed
                .required_groups
                .iter()
                .chain(&parsed.denied_groups)
                .chain(&parsed.required_tags)
                .chain(&parsed.denied_tags)
            {
                prop_assert!(!group.is_empty());
                prop_assert_eq!(group.trim(), group.as_str());
            }
        }

        #[test]
        fn prop_clean_words_roundtrip(words in proptest::collection::vec("[a-z]{1,8}", 0..8)) {
            let parsed = parse(&words.join(" "));
            prop_assert_eq!(parsed.required_groups, words);
        }
    }
}
