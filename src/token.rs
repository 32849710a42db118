//! Token definitions for LineScript
//!
//! A token is a lexeme plus the category the separator table assigns to it.
//! Anything that is not a separator is an argument (identifier or literal).

use std::fmt;

/// Token categories in LineScript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Argument,   // identifier or literal
    Colon,      // :
    Semicolon,  // ;
    Comma,      // ,
    Negation,   // !
    OpenParen,  // (
    CloseParen, // )
    OpenBlock,  // {
    CloseBlock, // }
    LeftShift,  // <<
    RightShift, // >>
    Assign,     // =
    CompoundOp, // ++ -- += -= *= /= %=
    Comparison, // == != < > <= >=
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Argument => write!(f, "argument"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Negation => write!(f, "'!'"),
            TokenKind::OpenParen => write!(f, "'('"),
            TokenKind::CloseParen => write!(f, "')'"),
            TokenKind::OpenBlock => write!(f, "'{{'"),
            TokenKind::CloseBlock => write!(f, "'}}'"),
            TokenKind::LeftShift => write!(f, "'<<'"),
            TokenKind::RightShift => write!(f, "'>>'"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::CompoundOp => write!(f, "modification operator"),
            TokenKind::Comparison => write!(f, "comparison operator"),
        }
    }
}

/// Separator table. Two-character entries come first so a linear scan
/// doubles as the longest-match rule.
pub const SEPARATORS: &[(&str, TokenKind)] = &[
    ("++", TokenKind::CompoundOp),
    ("--", TokenKind::CompoundOp),
    ("+=", TokenKind::CompoundOp),
    ("-=", TokenKind::CompoundOp),
    ("*=", TokenKind::CompoundOp),
    ("/=", TokenKind::CompoundOp),
    ("%=", TokenKind::CompoundOp),
    ("==", TokenKind::Comparison),
    ("!=", TokenKind::Comparison),
    ("<=", TokenKind::Comparison),
    (">=", TokenKind::Comparison),
    ("<<", TokenKind::LeftShift),
    (">>", TokenKind::RightShift),
    (":", TokenKind::Colon),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("!", TokenKind::Negation),
    ("=", TokenKind::Assign),
    ("<", TokenKind::Comparison),
    (">", TokenKind::Comparison),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("{", TokenKind::OpenBlock),
    ("}", TokenKind::CloseBlock),
];

/// Look up the category of a separator lexeme
pub fn separator(lexeme: &str) -> Option<TokenKind> {
    SEPARATORS
        .iter()
        .find(|(text, _)| *text == lexeme)
        .map(|(_, kind)| *kind)
}

/// A token with its category and source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }

    /// Build a token, deriving the category from the lexeme alone
    pub fn classify(lexeme: impl Into<String>) -> Self {
        let lexeme = lexeme.into();
        let kind = separator(&lexeme).unwrap_or(TokenKind::Argument);
        Self { kind, lexeme }
    }

    pub fn argument(lexeme: impl Into<String>) -> Self {
        Self::new(TokenKind::Argument, lexeme)
    }

    pub fn semicolon() -> Self {
        Self::new(TokenKind::Semicolon, ";")
    }

    pub fn is_argument(&self) -> bool {
        self.kind == TokenKind::Argument
    }

    /// True for an argument token spelling exactly `word`
    pub fn is_word(&self, word: &str) -> bool {
        self.is_argument() && self.lexeme == word
    }

    /// `{` or the legacy `:` block opener
    pub fn opens_block(&self) -> bool {
        matches!(self.kind, TokenKind::OpenBlock | TokenKind::Colon)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Control keywords handled by the desugarer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Else,
    For,
    While,
    Func,
    Break,
    Continue,
    Return,
    End,
}

pub const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "func", "break", "continue", "return", "end",
];

/// Check if a lexeme is a control keyword and return it
pub fn lookup_keyword(ident: &str) -> Option<Keyword> {
    match ident {
        "if" => Some(Keyword::If),
        "else" => Some(Keyword::Else),
        "for" => Some(Keyword::For),
        "while" => Some(Keyword::While),
        "func" => Some(Keyword::Func),
        "break" => Some(Keyword::Break),
        "continue" => Some(Keyword::Continue),
        "return" => Some(Keyword::Return),
        "end" => Some(Keyword::End),
        _ => None,
    }
}
