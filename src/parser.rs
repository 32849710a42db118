//! Parser for LineScript
//!
//! Assembles the per-fragment token streams into statements. Most
//! statements end at a `;`, but block headers end at their opener and a
//! `for` header keeps its inner `;`s because they sit inside parentheses.

use std::fmt;

use crate::error::Result;
use crate::lexer::{split_statements, Lexer};
use crate::token::{lookup_keyword, Keyword, Token, TokenKind};

/// One statement with the source line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub tokens: Vec<Token>,
}

impl Statement {
    pub fn new(line: usize, tokens: Vec<Token>) -> Self {
        Self { line, tokens }
    }

    pub fn head(&self) -> Option<&Token> {
        self.tokens.first()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<&str> = self.tokens.iter().map(|t| t.lexeme.as_str()).collect();
        write!(f, "{}", text.join(" "))
    }
}

/// The parser state
pub struct Parser<'a> {
    source: &'a str,
    statements: Vec<Statement>,
    pending: Vec<Token>,
    pending_line: usize,
    depth: i32,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            statements: Vec::new(),
            pending: Vec::new(),
            pending_line: 0,
            depth: 0,
        }
    }

    /// Parse the whole source into statements
    pub fn parse(&mut self) -> Result<Vec<Statement>> {
        let source = self.source;
        for (index, text) in source.lines().enumerate() {
            let line = index + 1;
            for fragment in split_statements(text) {
                let tokens = Lexer::new(&fragment)
                    .tokenize()
                    .map_err(|e| e.or_line(line))?;
                for token in tokens {
                    self.accept(token, line);
                }
            }

            // A lone `}` waits for a possible `else` on the next line
            if self.depth <= 0 && !self.awaiting_else() {
                self.flush();
            }
        }
        self.flush();

        Ok(std::mem::take(&mut self.statements))
    }

    fn accept(&mut self, token: Token, line: usize) {
        if self.awaiting_else() {
            if token.is_word("else") {
                self.pending.push(token);
                return;
            }
            if token.kind == TokenKind::Semicolon {
                self.pending.push(token);
                self.flush();
                return;
            }
            self.flush();
        }

        if self.pending.is_empty() {
            self.pending_line = line;
        }

        let at_top = self.depth <= 0;
        match token.kind {
            TokenKind::OpenParen => self.depth += 1,
            TokenKind::CloseParen => self.depth -= 1,
            _ => {}
        }

        match token.kind {
            TokenKind::Semicolon | TokenKind::OpenBlock if at_top => {
                self.pending.push(token);
                self.flush();
            }
            TokenKind::Colon if at_top && self.opens_block() => {
                self.pending.push(token);
                self.flush();
            }
            TokenKind::CloseBlock if at_top => {
                self.flush();
                self.pending_line = line;
                self.pending.push(token);
            }
            _ => self.pending.push(token),
        }
    }

    fn awaiting_else(&self) -> bool {
        self.pending.len() == 1 && self.pending[0].kind == TokenKind::CloseBlock
    }

    /// Whether the pending statement is a header for the `:` grammar
    fn opens_block(&self) -> bool {
        self.pending
            .iter()
            .find(|t| t.kind != TokenKind::CloseBlock)
            .filter(|t| t.is_argument())
            .and_then(|t| lookup_keyword(&t.lexeme))
            .is_some_and(|k| {
                matches!(
                    k,
                    Keyword::If | Keyword::Else | Keyword::For | Keyword::While | Keyword::Func
                )
            })
    }

    fn flush(&mut self) {
        self.depth = 0;
        if self.pending.is_empty() {
            return;
        }
        let tokens = std::mem::take(&mut self.pending);
        self.statements.push(Statement::new(self.pending_line, tokens));
    }
}
