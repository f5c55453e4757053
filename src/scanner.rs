use crate::prefix_map::PrefixMap;

/// True for characters that can make up a proposition identifier, `[A-Za-z0-9_]`
pub fn is_identifier_char(chr: char) -> bool {
    chr.is_ascii_alphanumeric() || chr == '_'
}

/// True for the characters skipped between tokens
pub fn is_blank(chr: char) -> bool {
    matches!(chr, ' ' | '\t' | '\n')
}

/// Split a maximal identifier run off the front of `inp`
///
/// Identifiers may start with digits, `"2"` is as valid as `"p"`.
fn strip_identifier(inp: &str) -> Option<(&str, &str)> {
    let len = inp
        .find(|chr: char| !is_identifier_char(chr))
        .unwrap_or(inp.len());
    if len > 0 {
        Some(inp.split_at(len))
    } else {
        None
    }
}

/// A cursor over formula text that tracks its position in characters
///
/// The parser decides what it expects next, so rather than classifying tokens itself the cursor
/// offers the primitive steps: skipping blanks, taking an identifier, and taking the longest
/// operator symbol found in a [`PrefixMap`].
///
/// # Example
/// ```
/// use polish_notation::Cursor;
///
/// let mut cursor = Cursor::new("  p_1 & q");
/// cursor.skip_blank();
/// assert_eq!(cursor.position(), 2);
/// assert_eq!(cursor.next_identifier(), Some("p_1"));
/// assert_eq!(cursor.position(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<'a> {
    remaining: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Start at the beginning of `inp`
    pub fn new(inp: &'a str) -> Self {
        Cursor {
            remaining: inp,
            position: 0,
        }
    }

    /// Number of characters consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// The unconsumed input
    pub fn remaining(&self) -> &'a str {
        self.remaining
    }

    /// The next character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let (taken, rest) = self.remaining.split_at(len);
        self.remaining = rest;
        self.position += taken.chars().count();
        taken
    }

    /// Skip spaces, tabs and newlines
    pub fn skip_blank(&mut self) {
        let len = self
            .remaining
            .find(|chr: char| !is_blank(chr))
            .unwrap_or(self.remaining.len());
        self.advance(len);
    }

    /// Consume and return the next character
    pub fn bump(&mut self) -> Option<char> {
        let chr = self.peek()?;
        self.advance(chr.len_utf8());
        Some(chr)
    }

    /// Consume an identifier if one starts at the cursor
    pub fn next_identifier(&mut self) -> Option<&'a str> {
        let (ident, _) = strip_identifier(self.remaining)?;
        Some(self.advance(ident.len()))
    }

    /// Consume the longest symbol of `operators` that starts at the cursor
    ///
    /// Empty symbols never match, so the cursor always advances on success.
    pub fn next_operator<'m, V, M>(&mut self, operators: &'m M) -> Option<&'m V>
    where
        M: PrefixMap<V>,
    {
        match operators.get_longest_prefix(self.remaining) {
            Some((len, val)) if len > 0 => {
                self.advance(len);
                Some(val)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::prefix_map::HashPrefixMap;

    #[test]
    fn identifiers_are_greedy() {
        let mut cursor = Cursor::new("4ab_9&c");
        assert_eq!(cursor.next_identifier(), Some("4ab_9"));
        assert_eq!(cursor.next_identifier(), None);
        assert_eq!(cursor.bump(), Some('&'));
        assert_eq!(cursor.next_identifier(), Some("c"));
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn positions_count_chars() {
        let operators = HashPrefixMap::from_iter([("↑", 0), ("↓", 1)]);
        let mut cursor = Cursor::new("a ↑\tb");
        cursor.next_identifier();
        cursor.skip_blank();
        assert_eq!(cursor.next_operator(&operators), Some(&0));
        assert_eq!(cursor.position(), 3);
        cursor.skip_blank();
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.remaining(), "b");
    }

    #[test]
    fn only_listed_blanks_are_skipped() {
        let mut cursor = Cursor::new(" \t\n\ra");
        cursor.skip_blank();
        assert_eq!(cursor.peek(), Some('\r'));
    }

    #[test]
    fn longest_operator() {
        let operators = HashPrefixMap::from_iter([("<", 0), ("<->", 1), ("", 2)]);
        let mut cursor = Cursor::new("<-><-x");
        assert_eq!(cursor.next_operator(&operators), Some(&1));
        assert_eq!(cursor.next_operator(&operators), Some(&0));
        // the empty symbol is never taken
        assert_eq!(cursor.next_operator(&operators), None);
        assert_eq!(cursor.remaining(), "-x");
    }
}
