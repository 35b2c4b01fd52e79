//! Scanner: source text to green tokens with attached trivia.
//!
//! Trivia ownership follows the usual convention for lossless trees: a token's
//! trailing trivia runs up to and including the first line break after it;
//! everything else (blank lines, indentation, comments on their own line,
//! preprocessor directives) is leading trivia of the next token.

use crate::green::{DirectiveKind, GreenToken, Trivia, TriviaKind};
use crate::kind::{SyntaxKind, reserved_keyword};

pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Scan the whole source. The last token is always `EndOfFileToken`.
    pub fn scan_all(mut self) -> Vec<GreenToken> {
        let mut tokens = Vec::new();
        loop {
            let leading = self.scan_trivia(false);
            let (kind, text) = self.scan_token();
            let trailing = if kind == SyntaxKind::EndOfFileToken {
                Vec::new()
            } else {
                self.scan_trivia(true)
            };
            tokens.push(
                GreenToken::new(kind, text)
                    .with_leading(leading)
                    .with_trailing(trailing),
            );
            if kind == SyntaxKind::EndOfFileToken {
                return tokens;
            }
        }
    }

    #[inline]
    fn peek(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    fn at_line_start(&self) -> bool {
        self.source[..self.pos]
            .bytes()
            .rev()
            .take_while(|&b| b != b'\n' && b != b'\r')
            .all(|b| b == b' ' || b == b'\t')
    }

    fn scan_trivia(&mut self, trailing: bool) -> Vec<Trivia> {
        let mut trivia = Vec::new();
        while let Some(b) = self.peek(0) {
            let start = self.pos;
            let kind = match b {
                b' ' | b'\t' => {
                    while matches!(self.peek(0), Some(b' ' | b'\t')) {
                        self.pos += 1;
                    }
                    TriviaKind::Whitespace
                }
                b'\r' | b'\n' => {
                    if b == b'\r' && self.peek(1) == Some(b'\n') {
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                    trivia.push(Trivia::new(
                        TriviaKind::EndOfLine,
                        &self.source[start..self.pos],
                    ));
                    if trailing {
                        return trivia;
                    }
                    continue;
                }
                b'/' if self.peek(1) == Some(b'/') => {
                    self.skip_to_line_end();
                    TriviaKind::SingleLineComment
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    self.pos += 2;
                    while self.pos < self.bytes.len()
                        && !(self.peek(0) == Some(b'*') && self.peek(1) == Some(b'/'))
                    {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.bytes.len());
                    TriviaKind::MultiLineComment
                }
                b'#' if !trailing && self.at_line_start() => {
                    self.skip_to_line_end();
                    if self.peek(0) == Some(b'\r') && self.peek(1) == Some(b'\n') {
                        self.pos += 2;
                    } else if matches!(self.peek(0), Some(b'\r' | b'\n')) {
                        self.pos += 1;
                    }
                    let text = &self.source[start..self.pos];
                    TriviaKind::Directive(DirectiveKind::classify(text))
                }
                _ => break,
            };
            trivia.push(Trivia::new(kind, &self.source[start..self.pos]));
        }
        trivia
    }

    fn skip_to_line_end(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }

    fn scan_token(&mut self) -> (SyntaxKind, &'a str) {
        let start = self.pos;
        let Some(b) = self.peek(0) else {
            return (SyntaxKind::EndOfFileToken, "");
        };

        let kind = match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while matches!(self.peek(0), Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_'))
                {
                    self.pos += 1;
                }
                reserved_keyword(&self.source[start..self.pos])
                    .unwrap_or(SyntaxKind::IdentifierToken)
            }
            b'0'..=b'9' => {
                self.scan_number();
                SyntaxKind::NumericLiteralToken
            }
            b'"' => {
                self.scan_quoted(b'"');
                SyntaxKind::StringLiteralToken
            }
            b'\'' => {
                self.scan_quoted(b'\'');
                SyntaxKind::CharacterLiteralToken
            }
            _ => self.scan_punctuation(b),
        };

        (kind, &self.source[start..self.pos])
    }

    fn scan_number(&mut self) {
        while matches!(self.peek(0), Some(b'0'..=b'9' | b'_')) {
            self.pos += 1;
        }
        if self.peek(0) == Some(b'.') && matches!(self.peek(1), Some(b'0'..=b'9')) {
            self.pos += 1;
            while matches!(self.peek(0), Some(b'0'..=b'9' | b'_')) {
                self.pos += 1;
            }
        }
        // type suffixes: 1L, 2.0f, 3m, 4UL
        while matches!(
            self.peek(0),
            Some(b'f' | b'F' | b'd' | b'D' | b'm' | b'M' | b'l' | b'L' | b'u' | b'U')
        ) {
            self.pos += 1;
        }
    }

    fn scan_quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'\n' | b'\r' => return,
                _ if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn scan_punctuation(&mut self, b: u8) -> SyntaxKind {
        use SyntaxKind::*;
        let next = self.peek(1);
        let (kind, len) = match (b, next) {
            (b'=', Some(b'>')) => (EqualsGreaterThanToken, 2),
            (b'=', Some(b'=')) => (EqualsEqualsToken, 2),
            (b'!', Some(b'=')) => (ExclamationEqualsToken, 2),
            (b'<', Some(b'=')) => (LessThanEqualsToken, 2),
            (b'>', Some(b'=')) => (GreaterThanEqualsToken, 2),
            (b'+', Some(b'=')) => (PlusEqualsToken, 2),
            (b'-', Some(b'=')) => (MinusEqualsToken, 2),
            (b'+', Some(b'+')) => (PlusPlusToken, 2),
            (b'-', Some(b'-')) => (MinusMinusToken, 2),
            (b'&', Some(b'&')) => (AmpersandAmpersandToken, 2),
            (b'|', Some(b'|')) => (BarBarToken, 2),
            (b'{', _) => (OpenBraceToken, 1),
            (b'}', _) => (CloseBraceToken, 1),
            (b'(', _) => (OpenParenToken, 1),
            (b')', _) => (CloseParenToken, 1),
            (b'[', _) => (OpenBracketToken, 1),
            (b']', _) => (CloseBracketToken, 1),
            (b';', _) => (SemicolonToken, 1),
            (b',', _) => (CommaToken, 1),
            (b'.', _) => (DotToken, 1),
            (b'?', _) => (QuestionToken, 1),
            (b'=', _) => (EqualsToken, 1),
            (b'+', _) => (PlusToken, 1),
            (b'-', _) => (MinusToken, 1),
            (b'*', _) => (AsteriskToken, 1),
            (b'/', _) => (SlashToken, 1),
            (b'%', _) => (PercentToken, 1),
            (b'!', _) => (ExclamationToken, 1),
            (b'<', _) => (LessThanToken, 1),
            (b'>', _) => (GreaterThanToken, 1),
            _ => {
                // one whole char, never a partial UTF-8 sequence
                let width = self.source[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                (BadToken, width)
            }
        };
        self.pos += len;
        kind
    }
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
