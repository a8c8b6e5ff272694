//! Ordered token matchers for the base scan mode

use once_cell::sync::Lazy;
use regex::Regex;

use super::TokenType;
use crate::dialect::DialectSettings;

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"[xX]'[0-9a-fA-F]*'",
        r"|[bB]'[01]*'",
        r"|0[xX][0-9a-fA-F]+",
        r"|0[bB][01]+",
        r"|(?:\d+(?:\.\d*)?|\.\d+)[eE][+-]?\d+",
        r"|\d+\.\d*|\.\d+",
        r#"|\{\s*(?:d|t|ts)\s+(?:'[^']*'|"[^"]*")\s*\}"#,
        r"|\d+",
        r")"
    ))
    .unwrap()
});
static STRING_START: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^['"]"#).unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:--.*|/\*)").unwrap());
static BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[()\[\]]").unwrap());
static SEMI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^;").unwrap());
static COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^,").unwrap());
static TEMPLATED_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{.*?\}\}").unwrap());
static TEMPLATED_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{[%#].*?[%#]\}").unwrap());
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s'"`()]+"#).unwrap());
static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:[^\W\d][\w$]*|`[^`]*`)(?:\.(?:[\w$]+|`[^`]*`|\*))+|`[^`]*`)").unwrap()
});
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w[\w$]*").unwrap());

/// Base-mode matchers in priority order. Reordering changes how ambiguous
/// prefixes such as `0x` or `--` are claimed.
pub(super) const MATCH_ORDER: [TokenType; 13] = [
    TokenType::Number,
    TokenType::String,
    TokenType::Comment,
    TokenType::Operator,
    TokenType::Punctuation,
    TokenType::Bracket,
    TokenType::Semi,
    TokenType::Comma,
    TokenType::TemplatedTag,
    TokenType::TemplatedBlock,
    TokenType::Url,
    TokenType::Variable,
    TokenType::Word,
];

/// Length in bytes of the `kind` token at the start of `rest`
pub(super) fn match_len(kind: TokenType, rest: &str, settings: &DialectSettings) -> Option<usize> {
    let pattern: &Regex = match kind {
        TokenType::Number => &NUMBER,
        TokenType::String => &STRING_START,
        TokenType::Comment => &COMMENT,
        TokenType::Operator => &settings.operator_chars,
        TokenType::Punctuation => &settings.punctuation_chars,
        TokenType::Bracket => &BRACKET,
        TokenType::Semi => &SEMI,
        TokenType::Comma => &COMMA,
        TokenType::TemplatedTag => &TEMPLATED_TAG,
        TokenType::TemplatedBlock => &TEMPLATED_BLOCK,
        TokenType::Url => &URL,
        TokenType::Variable => {
            let placeholder = settings
                .placeholder_variable
                .as_ref()
                .and_then(|re| re.find(rest));
            return placeholder
                .or_else(|| QUALIFIED_NAME.find(rest))
                .map(|m| m.end())
                .filter(|len| *len > 0);
        }
        TokenType::Word => &WORD,
        _ => return None,
    };
    pattern.find(rest).map(|m| m.end()).filter(|len| *len > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqlDialect;

    fn number(text: &str) -> Option<usize> {
        match_len(TokenType::Number, text, SqlDialect::Hive.settings())
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(number("x'1F' rest"), Some(5));
        assert_eq!(number("b'0101'"), Some(7));
        assert_eq!(number("0xFF,"), Some(4));
        assert_eq!(number("0b11)"), Some(4));
        assert_eq!(number("1.5e-3 "), Some(6));
        assert_eq!(number("12.75"), Some(5));
        assert_eq!(number("{ts '2020-01-01 00:00:00'}"), Some(26));
        assert_eq!(number("42abc"), Some(2));
        assert_eq!(number("abc"), None);
    }

    #[test]
    fn test_qualified_names() {
        let settings = SqlDialect::Hive.settings();
        assert_eq!(match_len(TokenType::Variable, "db.tbl x", settings), Some(6));
        assert_eq!(match_len(TokenType::Variable, "`my db`.`t`", settings), Some(11));
        assert_eq!(match_len(TokenType::Variable, "t.*", settings), Some(3));
        assert_eq!(match_len(TokenType::Variable, "${hivevar:day}", settings), Some(14));
        assert_eq!(match_len(TokenType::Variable, "plain", settings), None);
    }

    #[test]
    fn test_operators_do_not_swallow_comments() {
        let settings = SqlDialect::Presto.settings();
        assert_eq!(match_len(TokenType::Operator, ">=1", settings), Some(2));
        assert_eq!(match_len(TokenType::Operator, "=--x", settings), Some(1));
    }
}
