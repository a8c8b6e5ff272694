//! Heuristic SQL tokenizer
//!
//! The tokenizer never fails: characters it cannot classify are skipped, so a
//! half-typed editor buffer still produces a best-effort token stream.

mod matchers;
mod scanner;

use serde::{Deserialize, Serialize};

use crate::dialect::{DialectSettings, SqlDialect};
use crate::error::Position;
use scanner::{ScanMode, Scanner};

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    Number,
    String,
    Comment,
    Operator,
    Punctuation,
    Bracket,
    Semi,
    Comma,
    TemplatedTag,
    TemplatedBlock,
    Url,
    Variable,
    Word,
    Keyword,
    Bool,
    Type,
    /// Only emitted when `include_unknown` is requested
    Unknown,
}

/// A lexed token. `line` is where the token starts; `end` is measured on the
/// line where it ends, which differs only for multi-line strings and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub text: String,
    pub line: usize,
    pub start: usize,
    pub end: usize,
    /// Index of the matching closing bracket, set on opening brackets by the simple parser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_index: Option<usize>,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        text: impl Into<String>,
        line: usize,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            token_type,
            text: text.into(),
            line,
            start,
            end,
            bracket_index: None,
        }
    }

    /// Is this the keyword `keyword` (given in lowercase)
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.token_type == TokenType::Keyword && self.text == keyword
    }

    pub fn is_open_bracket(&self) -> bool {
        self.token_type == TokenType::Bracket && (self.text == "(" || self.text == "[")
    }

    pub fn is_close_bracket(&self) -> bool {
        self.token_type == TokenType::Bracket && (self.text == ")" || self.text == "]")
    }

    /// Line on which the token ends
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.line, self.start)
    }

    pub fn end_position(&self) -> Position {
        Position::new(self.end_line(), self.end)
    }
}

/// Tokenizer options
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizeOptions {
    pub dialect: SqlDialect,
    /// Emit `Unknown` tokens for characters no matcher claims
    pub include_unknown: bool,
}

impl TokenizeOptions {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            include_unknown: false,
        }
    }
}

/// Tokenize `code` into a flat token stream
pub fn tokenize(code: &str, options: &TokenizeOptions) -> Vec<Token> {
    let scanner = Scanner {
        settings: options.dialect.settings(),
        include_unknown: options.include_unknown,
    };
    let lines: Vec<&str> = code.split('\n').collect();
    let mut tokens = Vec::new();
    let mut mode = ScanMode::Base;

    for (line_no, line) in lines.iter().enumerate() {
        if line_no > 0 {
            mode.break_line();
        }
        let mut pos = 0;
        while pos < line.len() {
            let step = scanner.step(mode, line, line_no, pos);
            mode = step.mode;
            pos = step.pos;
            tokens.extend(step.token);
        }
    }

    let last_len = lines.last().map_or(0, |line| line.len());
    tokens.extend(mode.finish(last_len));
    tokens
}

/// Classify a bare word against the dialect vocabulary. Keywords come back lowercased.
pub fn categorize_word(word: &str, settings: &DialectSettings) -> (TokenType, String) {
    let lower = word.to_lowercase();
    if settings.keywords.contains(lower.as_str()) {
        (TokenType::Keyword, lower)
    } else if settings.bool.contains(lower.as_str()) {
        (TokenType::Bool, word.to_string())
    } else if settings.types.contains(lower.as_str()) {
        (TokenType::Type, word.to_string())
    } else {
        (TokenType::Variable, word.to_string())
    }
}
