//! Statement splitting and bracket matching over token streams

use crate::lexer::{Token, TokenType};

/// Token types kept in the structural view used for lineage
const STRUCTURAL_TYPES: [TokenType; 5] = [
    TokenType::Keyword,
    TokenType::Bracket,
    TokenType::Semi,
    TokenType::Variable,
    TokenType::Number,
];

/// Group tokens into statements, keeping only structural tokens and
/// recording matching bracket indices
pub fn simple_parse(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut statements = Vec::new();
    let mut current = Vec::new();

    for token in tokens
        .iter()
        .filter(|t| STRUCTURAL_TYPES.contains(&t.token_type))
    {
        if token.token_type == TokenType::Semi {
            flush_statement(&mut statements, &mut current);
        } else {
            current.push(token.clone());
        }
    }
    flush_statement(&mut statements, &mut current);

    statements
}

fn flush_statement(statements: &mut Vec<Vec<Token>>, current: &mut Vec<Token>) {
    if current.is_empty() {
        return;
    }
    let mut statement = std::mem::take(current);
    assign_bracket_indices(&mut statement);
    statements.push(statement);
}

/// Set `bracket_index` on every opening bracket. Brackets left open at the end
/// of the slice point at its last index.
pub fn assign_bracket_indices(tokens: &mut [Token]) {
    let mut stack: Vec<usize> = Vec::new();

    for i in 0..tokens.len() {
        if tokens[i].is_open_bracket() {
            stack.push(i);
        } else if tokens[i].is_close_bracket() {
            if let Some(open) = stack.pop() {
                tokens[open].bracket_index = Some(i);
            }
        }
    }

    let last = tokens.len().saturating_sub(1);
    for open in stack {
        tokens[open].bracket_index = Some(last);
    }
}

/// First keyword of a statement, lowercased. A leading `with` clause is looked
/// through, so `WITH x AS (...) SELECT ...` is a `select`.
pub fn get_statement_type(tokens: &[Token]) -> Option<String> {
    let first = tokens
        .iter()
        .position(|t| t.token_type == TokenType::Keyword)?;
    if !tokens[first].is_keyword("with") {
        return Some(tokens[first].text.clone());
    }

    let mut depth = 0usize;
    for token in &tokens[first + 1..] {
        if token.is_open_bracket() {
            depth += 1;
        } else if token.is_close_bracket() {
            depth = depth.saturating_sub(1);
        } else if depth == 0
            && token.token_type == TokenType::Keyword
            && !matches!(token.text.as_str(), "as" | "recursive")
        {
            return Some(token.text.clone());
        }
    }
    Some("with".to_string())
}
