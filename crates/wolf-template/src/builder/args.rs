//! Splitting of directive arguments.

/// Tracks bracket depth and string state while walking code.
struct Scanner {
    depth: usize,
    quote: Option<char>,
    escaped: bool,
}

impl Scanner {
    fn new() -> Self {
        Self {
            depth: 0,
            quote: None,
            escaped: false,
        }
    }

    /// Feed one character; returns whether it sits at the top level.
    fn step(&mut self, c: char) -> bool {
        if let Some(quote) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == quote {
                self.quote = None;
            }
            return false;
        }
        match c {
            '"' | '\'' | '`' => {
                self.quote = Some(c);
                false
            }
            '(' | '[' | '{' => {
                self.depth += 1;
                false
            }
            ')' | ']' | '}' => {
                self.depth = self.depth.saturating_sub(1);
                false
            }
            _ => self.depth == 0,
        }
    }
}

/// Split `text` on `sep` where it appears outside brackets and strings.
/// Each piece is returned with its byte offset, untrimmed.
pub(crate) fn split_top_level(text: &str, sep: char) -> Vec<(usize, &str)> {
    let mut scanner = Scanner::new();
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if scanner.step(c) && c == sep {
            pieces.push((start, &text[start..i]));
            start = i + c.len_utf8();
        }
    }
    pieces.push((start, &text[start..]));
    pieces
}

/// Offset of the first top-level `of` keyword surrounded by whitespace.
pub(crate) fn find_of_keyword(text: &str) -> Option<usize> {
    let mut scanner = Scanner::new();
    let mut prev = ' ';
    for (i, c) in text.char_indices() {
        let top = scanner.step(c);
        if top && c == 'o' && prev.is_whitespace() && text[i..].starts_with("of") {
            let after = text[i + 2..].chars().next();
            if after.map_or(false, char::is_whitespace) {
                return Some(i);
            }
        }
        prev = c;
    }
    None
}

/// Parsed `@each` argument.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct EachArgs<'a> {
    pub pattern: &'a str,
    pub index: Option<&'a str>,
    /// Collection expression and its offset within the argument.
    pub collection: (usize, &'a str),
}

/// Parse `pattern[, index] of expr`.
pub(crate) fn parse_each(text: &str) -> Result<EachArgs<'_>, &'static str> {
    let of = find_of_keyword(text).ok_or("expected `item of collection`")?;
    let head = &text[..of];
    let collection = &text[of + 2..];
    if collection.trim().is_empty() {
        return Err("missing collection after `of`");
    }

    let parts = split_top_level(head, ',');
    let (pattern, index) = match parts.as_slice() {
        [(_, pattern)] => (pattern.trim(), None),
        [(_, pattern), (_, index)] => (pattern.trim(), Some(index.trim())),
        _ => return Err("expected at most a pattern and an index before `of`"),
    };
    if pattern.is_empty() {
        return Err("missing loop pattern before `of`");
    }
    if let Some(index) = index {
        if !crate::ast::is_identifier(index) {
            return Err("the loop index must be an identifier");
        }
    }

    Ok(EachArgs {
        pattern,
        index,
        collection: (of + 2, collection),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_top_level() {
        let pieces: Vec<&str> = split_top_level("a, f(b, c), \"d,e\", [1, 2]", ',')
            .into_iter()
            .map(|(_, piece)| piece.trim())
            .collect();
        assert_eq!(pieces, vec!["a", "f(b, c)", "\"d,e\"", "[1, 2]"]);
    }

    #[test]
    fn test_find_of() {
        assert_eq!(find_of_keyword("item of items"), Some(5));
        assert_eq!(find_of_keyword("offset of list"), Some(7));
        assert_eq!(find_of_keyword("{ of } of list"), Some(7));
        assert_eq!(find_of_keyword("item in items"), None);
    }

    #[test]
    fn test_parse_each() {
        let args = parse_each("{ id, name }, i of :users()").unwrap();
        assert_eq!(args.pattern, "{ id, name }");
        assert_eq!(args.index, Some("i"));
        assert_eq!(args.collection.1.trim(), ":users()");

        assert!(parse_each("item").is_err());
        assert!(parse_each("item, 1 of xs").is_err());
        assert!(parse_each("item of ").is_err());
    }
}
