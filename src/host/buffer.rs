//! Built-in in-memory host.
//!
//! `SourceBuffer` owns a string, lexes it once with a logos class lexer,
//! and serves the [`Host`] trait off the resulting lexeme list. Tokens
//! are classified by shape only (words, numbers, operator runs,
//! delimiters, trivia); which of them carry grammar levels is entirely
//! the engine's business.

use logos::Logos;

use super::{DelimStop, Host};

/// Logos token classes - mapped to [`Kind`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*", priority = 10)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", priority = 10)]
    BlockComment,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,

    #[regex(r"[+*/%^&|!<>=:;,.?~$#@\\-]+", priority = 1)]
    Operator,
}

/// Lexical class of one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Whitespace,
    LineComment,
    BlockComment,
    Word,
    Number,
    Str,
    Open,
    Close,
    Operator,
    Unknown,
}

impl Kind {
    fn is_trivia(self) -> bool {
        matches!(self, Kind::Whitespace | Kind::LineComment | Kind::BlockComment)
    }
}

impl From<RawToken> for Kind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Whitespace => Kind::Whitespace,
            RawToken::LineComment => Kind::LineComment,
            RawToken::BlockComment => Kind::BlockComment,
            RawToken::Word => Kind::Word,
            RawToken::Number => Kind::Number,
            RawToken::Str => Kind::Str,
            RawToken::OpenParen | RawToken::OpenBracket | RawToken::OpenBrace => Kind::Open,
            RawToken::CloseParen | RawToken::CloseBracket | RawToken::CloseBrace => Kind::Close,
            RawToken::Operator => Kind::Operator,
        }
    }
}

/// One lexed span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lexeme {
    kind: Kind,
    start: usize,
    end: usize,
}

/// In-memory buffer with a cursor, implementing [`Host`].
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    text: String,
    lexemes: Vec<Lexeme>,
    pos: usize,
}

impl SourceBuffer {
    pub fn new(text: &str) -> Self {
        let mut buffer = Self {
            text: text.to_owned(),
            lexemes: Vec::new(),
            pos: 0,
        };
        buffer.relex();
        buffer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn relex(&mut self) {
        let mut lexer = RawToken::lexer(&self.text);
        let mut lexemes = Vec::new();
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let kind = match result {
                Ok(raw) => Kind::from(raw),
                Err(()) => Kind::Unknown,
            };
            lexemes.push(Lexeme {
                kind,
                start: span.start,
                end: span.end,
            });
        }
        self.lexemes = lexemes;
    }

    /// Lexeme containing `pos`.
    fn lexeme_at(&self, pos: usize) -> Option<Lexeme> {
        let idx = self.lexemes.partition_point(|l| l.end <= pos);
        self.lexemes
            .get(idx)
            .copied()
            .filter(|l| l.start <= pos)
    }

    /// First non-trivia lexeme overlapping or after `pos`.
    fn next_nontrivia(&self, pos: usize) -> Option<(usize, Lexeme)> {
        let mut idx = self.lexemes.partition_point(|l| l.end <= pos);
        while let Some(lex) = self.lexemes.get(idx) {
            if !lex.kind.is_trivia() {
                return Some((idx, *lex));
            }
            idx += 1;
        }
        None
    }

    /// Last non-trivia lexeme starting before `pos`.
    fn prev_nontrivia(&self, pos: usize) -> Option<(usize, Lexeme)> {
        let mut idx = self.lexemes.partition_point(|l| l.start < pos);
        while idx > 0 {
            idx -= 1;
            let lex = self.lexemes[idx];
            if !lex.kind.is_trivia() {
                return Some((idx, lex));
            }
        }
        None
    }
}

impl Host for SourceBuffer {
    fn pos(&self) -> usize {
        self.pos
    }

    fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }

    fn forward_token(&mut self) -> String {
        match self.next_nontrivia(self.pos) {
            None => {
                self.pos = self.text.len();
                String::new()
            }
            Some((_, lex)) if matches!(lex.kind, Kind::Open | Kind::Close) => {
                self.pos = lex.start.max(self.pos);
                String::new()
            }
            Some((_, lex)) => {
                self.pos = lex.end;
                self.text[lex.start..lex.end].to_owned()
            }
        }
    }

    fn backward_token(&mut self) -> String {
        match self.prev_nontrivia(self.pos) {
            None => {
                self.pos = 0;
                String::new()
            }
            Some((_, lex)) if matches!(lex.kind, Kind::Open | Kind::Close) => {
                self.pos = lex.end.min(self.pos);
                String::new()
            }
            Some((_, lex)) => {
                self.pos = lex.start;
                self.text[lex.start..lex.end].to_owned()
            }
        }
    }

    fn forward_group(&mut self) -> Result<(), DelimStop> {
        let Some((start_idx, first)) = self.next_nontrivia(self.pos) else {
            return Err(DelimStop {
                pos: self.text.len(),
            });
        };
        match first.kind {
            Kind::Close => Err(DelimStop { pos: first.start }),
            Kind::Open => {
                let mut depth = 0i32;
                for lex in &self.lexemes[start_idx..] {
                    match lex.kind {
                        Kind::Open => depth += 1,
                        Kind::Close => {
                            depth -= 1;
                            if depth == 0 {
                                self.pos = lex.end;
                                return Ok(());
                            }
                        }
                        _ => {}
                    }
                }
                Err(DelimStop {
                    pos: self.text.len(),
                })
            }
            _ => {
                self.pos = first.end;
                Ok(())
            }
        }
    }

    fn backward_group(&mut self) -> Result<(), DelimStop> {
        let Some((start_idx, first)) = self.prev_nontrivia(self.pos) else {
            return Err(DelimStop { pos: 0 });
        };
        match first.kind {
            Kind::Open => Err(DelimStop { pos: first.start }),
            Kind::Close => {
                let mut depth = 0i32;
                for lex in self.lexemes[..=start_idx].iter().rev() {
                    match lex.kind {
                        Kind::Close => depth += 1,
                        Kind::Open => {
                            depth -= 1;
                            if depth == 0 {
                                self.pos = lex.start;
                                return Ok(());
                            }
                        }
                        _ => {}
                    }
                }
                Err(DelimStop { pos: 0 })
            }
            _ => {
                self.pos = first.start;
                Ok(())
            }
        }
    }

    fn line_start(&self, pos: usize) -> usize {
        match self.text[..pos.min(self.text.len())].rfind('\n') {
            Some(i) => i + 1,
            None => 0,
        }
    }

    fn line_end(&self, pos: usize) -> usize {
        let pos = pos.min(self.text.len());
        match self.text[pos..].find('\n') {
            Some(i) => pos + i,
            None => self.text.len(),
        }
    }

    fn column(&self, pos: usize) -> usize {
        let pos = pos.min(self.text.len());
        self.text[self.line_start(pos)..pos].chars().count()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..).and_then(|s| s.chars().next())
    }

    fn close_delim(&self, pos: usize) -> bool {
        self.lexeme_at(pos)
            .is_some_and(|lex| lex.kind == Kind::Close && lex.start == pos)
    }

    fn comment_span(&self, pos: usize) -> Option<(usize, usize)> {
        self.lexeme_at(pos)
            .filter(|lex| lex.kind == Kind::BlockComment && lex.start < pos)
            .map(|lex| (lex.start, lex.end))
    }

    fn next_token_start(&self, pos: usize) -> Option<usize> {
        let mut idx = self.lexemes.partition_point(|l| l.start < pos);
        while let Some(lex) = self.lexemes.get(idx) {
            if !lex.kind.is_trivia() {
                return Some(lex.start);
            }
            idx += 1;
        }
        None
    }

    fn apply_indent(&mut self, pos: usize, col: usize) {
        let line = self.line_start(pos);
        let indent_end = self.line_indent_end(pos);
        let old_cursor = self.pos;
        let old_len = indent_end - line;
        self.text.replace_range(line..indent_end, &" ".repeat(col));
        self.relex();
        self.pos = if old_cursor >= line && old_cursor <= indent_end {
            line + col
        } else if old_cursor > indent_end {
            old_cursor - old_len + col
        } else {
            old_cursor
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_words_numbers_and_operators() {
        let mut buffer = SourceBuffer::new("foo := bar + 42");
        assert_eq!(buffer.forward_token(), "foo");
        assert_eq!(buffer.forward_token(), ":=");
        assert_eq!(buffer.forward_token(), "bar");
        assert_eq!(buffer.forward_token(), "+");
        assert_eq!(buffer.forward_token(), "42");
        assert_eq!(buffer.forward_token(), "");
        assert_eq!(buffer.pos(), buffer.text().len());
    }

    #[test]
    fn backward_token_mirrors_forward() {
        let mut buffer = SourceBuffer::new("a + b");
        buffer.set_pos(5);
        assert_eq!(buffer.backward_token(), "b");
        assert_eq!(buffer.backward_token(), "+");
        assert_eq!(buffer.backward_token(), "a");
        assert_eq!(buffer.pos(), 0);
        assert_eq!(buffer.backward_token(), "");
    }

    #[test]
    fn tokens_pin_at_delimiters() {
        let mut buffer = SourceBuffer::new("f(x)");
        assert_eq!(buffer.forward_token(), "f");
        assert_eq!(buffer.forward_token(), "");
        assert_eq!(buffer.pos(), 1);
        buffer.set_pos(2);
        assert_eq!(buffer.backward_token(), "");
        assert_eq!(buffer.pos(), 2);
    }

    #[test]
    fn comments_are_trivia() {
        let mut buffer = SourceBuffer::new("a /* note */ b // tail\nc");
        assert_eq!(buffer.forward_token(), "a");
        assert_eq!(buffer.forward_token(), "b");
        assert_eq!(buffer.forward_token(), "c");
    }

    #[test]
    fn group_skipping_matches_delimiters() {
        let mut buffer = SourceBuffer::new("(a (b) c) d");
        assert!(buffer.forward_group().is_ok());
        assert_eq!(buffer.pos(), 9);
        buffer.set_pos(9);
        assert!(buffer.backward_group().is_ok());
        assert_eq!(buffer.pos(), 0);
    }

    #[test]
    fn unbalanced_group_reports_the_obstacle() {
        let mut buffer = SourceBuffer::new("a) b");
        assert!(buffer.forward_group().is_ok());
        let err = buffer.forward_group().unwrap_err();
        assert_eq!(err.pos, 1);

        let mut buffer = SourceBuffer::new("(a");
        buffer.set_pos(2);
        buffer.backward_token();
        let err = buffer.backward_group().unwrap_err();
        assert_eq!(err.pos, 0);
    }

    #[test]
    fn line_geometry() {
        let buffer = SourceBuffer::new("ab\n  cd\n");
        assert_eq!(buffer.line_start(5), 3);
        assert_eq!(buffer.line_end(5), 7);
        assert_eq!(buffer.column(5), 2);
        assert!(buffer.first_on_line(5));
        assert_eq!(buffer.line_indent_end(4), 5);
    }

    #[test]
    fn hanging_detection() {
        let buffer = SourceBuffer::new("x := begin\n  a\n");
        // "begin" spans 5..10, last on its line but not first
        assert!(buffer.hanging(5, 10));
        // "x" starts its line
        assert!(!buffer.hanging(0, 1));
        // "a" is followed by nothing on its line but starts it
        assert!(!buffer.hanging(13, 14));
    }

    #[test]
    fn hanging_ignores_trailing_comment() {
        let buffer = SourceBuffer::new("x := begin // note\n  a\n");
        assert!(buffer.hanging(5, 10));
    }

    #[test]
    fn comment_span_covers_inner_positions() {
        let buffer = SourceBuffer::new("a /* x\n * y */ b");
        assert_eq!(buffer.comment_span(8), Some((2, 14)));
        assert_eq!(buffer.comment_span(2), None);
        assert_eq!(buffer.comment_span(0), None);
    }

    #[test]
    fn apply_indent_rewrites_leading_whitespace() {
        let mut buffer = SourceBuffer::new("a\n    b\n");
        buffer.set_pos(6);
        buffer.apply_indent(6, 2);
        assert_eq!(buffer.text(), "a\n  b\n");
        assert_eq!(buffer.pos(), 4);

        // cursor inside the old indentation lands at the new indentation
        let mut buffer = SourceBuffer::new("a\n    b\n");
        buffer.set_pos(3);
        buffer.apply_indent(3, 1);
        assert_eq!(buffer.text(), "a\n b\n");
        assert_eq!(buffer.pos(), 3);
    }
}
