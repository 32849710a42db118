//! Lexer for LineScript
//!
//! Works one source line at a time: `split_statements` cuts a line into
//! `;`-terminated fragments, and `Lexer::tokenize` turns one fragment into
//! categorized tokens.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{ErrorKind, Result, ScriptError};
use crate::token::{separator, Token, TokenKind};

/// Split a source line into statement fragments.
///
/// A `#` outside quotes drops the rest of the line. A `;` outside quotes
/// closes the current fragment (and stays part of it). A trailing fragment
/// holding only whitespace is discarded.
pub fn split_statements(line: &str) -> Vec<String> {
    let line = line.trim();
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut in_string = false;

    for (index, ch) in line.char_indices() {
        if ch == '#' && !in_string {
            break;
        }
        if ch == '"' {
            in_string = !in_string;
        }
        current.push(ch);
        if ch == ';' && !in_string && index + 1 < line.len() {
            fragments.push(std::mem::take(&mut current));
        }
    }
    fragments.push(current);

    if fragments.last().is_some_and(|f| f.trim().is_empty()) {
        fragments.pop();
    }

    fragments
        .into_iter()
        .map(|fragment| fragment.trim().to_string())
        .collect()
}

/// The lexer state for a single fragment
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    current: String,
    in_string: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(fragment: &'a str) -> Self {
        Self {
            chars: fragment.chars().peekable(),
            tokens: Vec::new(),
            current: String::new(),
            in_string: false,
        }
    }

    /// Tokenize the whole fragment. A `;` outside a string is always the
    /// last token produced.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        while let Some(ch) = self.chars.next() {
            if self.in_string {
                self.current.push(ch);
                if ch == '"' {
                    self.in_string = false;
                    self.flush();
                }
                continue;
            }

            match ch {
                '"' => {
                    self.flush();
                    self.current.push(ch);
                    self.in_string = true;
                }
                ';' => {
                    self.flush();
                    self.tokens.push(Token::semicolon());
                    break;
                }
                c if c.is_whitespace() => self.flush(),
                c => self.scan_separator(c),
            }
        }

        if self.in_string {
            return Err(ScriptError::new(ErrorKind::UnterminatedString, None));
        }
        self.flush();

        Ok(std::mem::take(&mut self.tokens))
    }

    /// Two-character separators win over single-character ones
    fn scan_separator(&mut self, ch: char) {
        if let Some(&next) = self.chars.peek() {
            let pair: String = [ch, next].iter().collect();
            if let Some(kind) = separator(&pair) {
                self.chars.next();
                self.emit(kind, pair);
                return;
            }
        }

        let single = ch.to_string();
        match separator(&single) {
            Some(kind) => self.emit(kind, single),
            None => self.current.push(ch),
        }
    }

    fn emit(&mut self, kind: TokenKind, lexeme: String) {
        self.flush();
        self.tokens.push(Token::new(kind, lexeme));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let lexeme = std::mem::take(&mut self.current);
            self.tokens.push(Token::classify(lexeme));
        }
    }
}

/// Tokenize a single fragment
pub fn tokenize(fragment: &str) -> Result<Vec<Token>> {
    Lexer::new(fragment).tokenize()
}
