//! Line scanner state machine
//!
//! Strings and block comments may span lines, so the scanner carries the
//! in-progress token inside the mode between lines.

use super::matchers::{match_len, MATCH_ORDER};
use super::{categorize_word, Token, TokenType};
use crate::dialect::DialectSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ScanMode {
    Base,
    InString { quote: char, token: Token },
    InComment { token: Token },
}

impl ScanMode {
    /// Record a line break inside a pending multi-line token
    pub(super) fn break_line(&mut self) {
        if let ScanMode::InString { token, .. } | ScanMode::InComment { token } = self {
            token.text.push('\n');
        }
    }

    /// Flush a pending token at end of input. `end` is the length of the last line.
    pub(super) fn finish(self, end: usize) -> Option<Token> {
        match self {
            ScanMode::Base => None,
            ScanMode::InString { mut token, .. } | ScanMode::InComment { mut token } => {
                token.end = end;
                Some(token)
            }
        }
    }
}

/// Outcome of one scanner step
#[derive(Debug)]
pub(super) struct Step {
    pub(super) mode: ScanMode,
    pub(super) pos: usize,
    pub(super) token: Option<Token>,
}

pub(super) struct Scanner<'a> {
    pub(super) settings: &'a DialectSettings,
    pub(super) include_unknown: bool,
}

impl Scanner<'_> {
    /// Advance over `line` from byte offset `pos` in the given mode
    pub(super) fn step(&self, mode: ScanMode, line: &str, line_no: usize, pos: usize) -> Step {
        match mode {
            ScanMode::Base => self.step_base(line, line_no, pos),
            ScanMode::InString { quote, token } => step_string(quote, token, line, pos),
            ScanMode::InComment { token } => step_comment(token, line, pos),
        }
    }

    fn step_base(&self, line: &str, line_no: usize, pos: usize) -> Step {
        let rest = &line[pos..];
        let whitespace = rest.len() - rest.trim_start().len();
        if whitespace > 0 {
            return Step {
                mode: ScanMode::Base,
                pos: pos + whitespace,
                token: None,
            };
        }

        for kind in MATCH_ORDER {
            let Some(len) = match_len(kind, rest, self.settings) else {
                continue;
            };
            let text = &rest[..len];
            let token = Token::new(kind, text, line_no, pos, pos + len);

            return match kind {
                TokenType::String => Step {
                    mode: ScanMode::InString {
                        quote: text.chars().next().unwrap_or('\''),
                        token,
                    },
                    pos: pos + len,
                    token: None,
                },
                TokenType::Comment if text == "/*" => Step {
                    mode: ScanMode::InComment { token },
                    pos: pos + len,
                    token: None,
                },
                TokenType::Word => {
                    let (token_type, text) = categorize_word(text, self.settings);
                    Step {
                        mode: ScanMode::Base,
                        pos: pos + len,
                        token: Some(Token {
                            token_type,
                            text,
                            ..token
                        }),
                    }
                }
                _ => Step {
                    mode: ScanMode::Base,
                    pos: pos + len,
                    token: Some(token),
                },
            };
        }

        let skipped = rest.chars().next().map_or(1, char::len_utf8);
        Step {
            mode: ScanMode::Base,
            pos: pos + skipped,
            token: self.include_unknown.then(|| {
                Token::new(
                    TokenType::Unknown,
                    &rest[..skipped],
                    line_no,
                    pos,
                    pos + skipped,
                )
            }),
        }
    }
}

fn step_string(quote: char, mut token: Token, line: &str, pos: usize) -> Step {
    let rest = &line[pos..];
    let mut chars = rest.char_indices();
    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if ch == quote {
            let end = pos + i + ch.len_utf8();
            token.text.push_str(&line[pos..end]);
            token.end = end;
            return Step {
                mode: ScanMode::Base,
                pos: end,
                token: Some(token),
            };
        }
    }

    token.text.push_str(rest);
    Step {
        mode: ScanMode::InString { quote, token },
        pos: line.len(),
        token: None,
    }
}

fn step_comment(mut token: Token, line: &str, pos: usize) -> Step {
    let rest = &line[pos..];
    match rest.find("*/") {
        Some(i) => {
            let end = pos + i + 2;
            token.text.push_str(&line[pos..end]);
            token.end = end;
            Step {
                mode: ScanMode::Base,
                pos: end,
                token: Some(token),
            }
        }
        None => {
            token.text.push_str(rest);
            Step {
                mode: ScanMode::InComment { token },
                pos: line.len(),
                token: None,
            }
        }
    }
}
