//! The hand-written scanner that turns source text into tokens.

use super::{Span, Token, TokenKind};
use unicode_xid::UnicodeXID;

/// A scanner that tokenizes script source code.
#[derive(Clone)]
pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            current_pos: 0,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.current_pos;

        let Some((_pos, ch)) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let kind = match ch {
            // Single-character tokens
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,

            // Multi-character tokens
            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.either('=', TokenKind::StarEqual, TokenKind::Star),
            '/' => self.either('=', TokenKind::SlashEqual, TokenKind::Slash),
            '%' => self.either('=', TokenKind::PercentEqual, TokenKind::Percent),
            '<' => self.either('=', TokenKind::LessEqual, TokenKind::Less),
            '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '=' => self.scan_equal(),
            '!' => self.scan_bang(),
            '&' => self.either('&', TokenKind::AmpAmp, TokenKind::Invalid),
            '|' => self.either('|', TokenKind::PipePipe, TokenKind::Invalid),

            // String literals
            '"' | '\'' => self.scan_string(ch),

            // Template literals
            '`' => self.scan_template(),

            // Numbers
            '0'..='9' => self.scan_number(ch),

            // Identifiers and keywords
            _ if is_id_start(ch) => self.scan_identifier(ch),

            _ => TokenKind::Invalid,
        };

        Token::new(kind, Span::new(start, self.current_pos))
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = pos + ch.len_utf8();
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, ch)| ch)
    }

    /// Consumes `expected` and returns `matched` if it is next, else `fallback`.
    fn either(&mut self, expected: char, matched: TokenKind, fallback: TokenKind) -> TokenKind {
        if self.peek() == Some(expected) {
            self.advance();
            matched
        } else {
            fallback
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\n' | '\r') => {
                    self.advance();
                }
                Some('/') => {
                    match self.peek_next() {
                        Some('/') => {
                            // Single-line comment: skip until end of line
                            self.advance();
                            self.advance();
                            while let Some(ch) = self.peek() {
                                if ch == '\n' || ch == '\r' {
                                    break;
                                }
                                self.advance();
                            }
                        }
                        Some('*') => {
                            // Multi-line comment: skip until */
                            self.advance();
                            self.advance();
                            let mut prev = ' ';
                            while let Some(ch) = self.peek() {
                                self.advance();
                                if prev == '*' && ch == '/' {
                                    break;
                                }
                                prev = ch;
                            }
                        }
                        _ => break, // Not a comment, it's a division operator
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        match self.peek() {
            Some('+') => {
                self.advance();
                TokenKind::PlusPlus
            }
            Some('=') => {
                self.advance();
                TokenKind::PlusEqual
            }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        match self.peek() {
            Some('-') => {
                self.advance();
                TokenKind::MinusMinus
            }
            Some('=') => {
                self.advance();
                TokenKind::MinusEqual
            }
            _ => TokenKind::Minus,
        }
    }

    fn scan_equal(&mut self) -> TokenKind {
        match self.peek() {
            Some('=') => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqualEqualEqual
                } else {
                    TokenKind::EqualEqual
                }
            }
            Some('>') => {
                self.advance();
                TokenKind::Arrow
            }
            _ => TokenKind::Equal,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            if self.peek() == Some('=') {
                self.advance();
                TokenKind::BangEqualEqual
            } else {
                TokenKind::BangEqual
            }
        } else {
            TokenKind::Bang
        }
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        let mut value = String::new();

        loop {
            match self.advance() {
                None => return TokenKind::Invalid, // Unterminated string
                Some((_, ch)) if ch == quote => break,
                Some((_, '\\')) => match self.advance() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '0')) => value.push('\0'),
                    Some((_, escaped)) => value.push(escaped),
                    None => return TokenKind::Invalid,
                },
                Some((_, ch)) => value.push(ch),
            }
        }

        TokenKind::String(value)
    }

    /// Scans a template literal, keeping the raw content (including any
    /// `${...}` parts) for the parser to split. Nested backticks inside
    /// substitutions are not supported.
    fn scan_template(&mut self) -> TokenKind {
        let mut raw = String::new();

        loop {
            match self.advance() {
                None => return TokenKind::Invalid, // Unterminated template
                Some((_, '`')) => break,
                Some((_, '\\')) => {
                    raw.push('\\');
                    if let Some((_, escaped)) = self.advance() {
                        raw.push(escaped);
                    }
                }
                Some((_, ch)) => raw.push(ch),
            }
        }

        TokenKind::Template(raw)
    }

    fn scan_number(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);

        // Hex literal
        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            let mut hex = String::new();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_hexdigit() {
                    hex.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return match i64::from_str_radix(&hex, 16) {
                Ok(n) => TokenKind::Number(n as f64),
                Err(_) => TokenKind::Invalid,
            };
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Fractional part
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.advance();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    text.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // Exponent part
        if matches!(self.peek(), Some('e' | 'E')) {
            let mut lookahead = String::from("e");
            let mut iter = self.chars.clone();
            iter.next();
            if let Some((_, sign @ ('+' | '-'))) = iter.peek().copied() {
                lookahead.push(sign);
                iter.next();
            }
            if iter.peek().is_some_and(|(_, c)| c.is_ascii_digit()) {
                self.advance();
                text.push_str(&lookahead[..1]);
                if lookahead.len() > 1 {
                    text.push_str(&lookahead[1..]);
                    self.advance();
                }
                while let Some(ch) = self.peek() {
                    if ch.is_ascii_digit() {
                        text.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        match text.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => TokenKind::Invalid,
        }
    }

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut name = String::from(first);

        while let Some(ch) = self.peek() {
            if is_id_continue(ch) {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        TokenKind::keyword(&name).unwrap_or(TokenKind::Identifier(name))
    }
}

fn is_id_start(ch: char) -> bool {
    ch == '$' || ch == '_' || UnicodeXID::is_xid_start(ch)
}

fn is_id_continue(ch: char) -> bool {
    ch == '$' || ch == '_' || UnicodeXID::is_xid_continue(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push(token.kind);
        }
        out
    }

    #[test]
    fn scans_punctuation_and_operators() {
        assert_eq!(
            kinds("a += b === c => d"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::PlusEqual,
                TokenKind::Identifier("b".into()),
                TokenKind::EqualEqualEqual,
                TokenKind::Identifier("c".into()),
                TokenKind::Arrow,
                TokenKind::Identifier("d".into()),
            ]
        );
    }

    #[test]
    fn scans_numbers() {
        assert_eq!(kinds("42"), vec![TokenKind::Number(42.0)]);
        assert_eq!(kinds("3.25"), vec![TokenKind::Number(3.25)]);
        assert_eq!(kinds("0xff"), vec![TokenKind::Number(255.0)]);
        assert_eq!(kinds("1e3"), vec![TokenKind::Number(1000.0)]);
    }

    #[test]
    fn scans_strings_with_escapes() {
        assert_eq!(
            kinds(r#"'a\nb' "c\"d""#),
            vec![
                TokenKind::String("a\nb".into()),
                TokenKind::String("c\"d".into()),
            ]
        );
    }

    #[test]
    fn scans_template_raw_content() {
        assert_eq!(
            kinds("`a ${b} c`"),
            vec![TokenKind::Template("a ${b} c".into())]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("x // line\n/* block */ y"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Identifier("y".into()),
            ]
        );
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert_eq!(
            kinds("var undefined"),
            vec![TokenKind::Var, TokenKind::Undefined]
        );
    }
}
