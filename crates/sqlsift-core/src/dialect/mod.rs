//! SQL dialect support

mod keywords;

use std::collections::HashSet;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::dialect::{
    BigQueryDialect, Dialect, GenericDialect, HiveDialect, MySqlDialect, PostgreSqlDialect,
    SQLiteDialect, SnowflakeDialect,
};

use crate::error::Error;
use keywords::*;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SqlDialect {
    #[default]
    Hive,
    SparkSql,
    Presto,
    Trino,
    MySQL,
    PostgreSQL,
    SQLite,
    BigQuery,
    Snowflake,
}

/// Vocabulary and character classes the tokenizer needs for one dialect
#[derive(Debug)]
pub struct DialectSettings {
    pub keywords: HashSet<&'static str>,
    pub bool: HashSet<&'static str>,
    pub types: HashSet<&'static str>,
    pub operator_chars: Regex,
    pub punctuation_chars: Regex,
    pub placeholder_variable: Option<Regex>,
}

const OPERATOR_CHARS: &str = r"^(?:<=>|<>|<=|>=|!=|==|\|\||::|->>|->|=>|&&|[*+\-%:|=<>!/^&~])";
const PUNCTUATION_CHARS: &str = r"^\.";

impl DialectSettings {
    fn build(
        extra_keywords: &[&'static str],
        extra_types: &[&'static str],
        placeholder_variable: Option<&str>,
    ) -> Self {
        Self {
            keywords: COMMON_KEYWORDS
                .iter()
                .chain(extra_keywords)
                .copied()
                .collect(),
            bool: BOOLS.iter().copied().collect(),
            types: COMMON_TYPES.iter().chain(extra_types).copied().collect(),
            operator_chars: static_regex(OPERATOR_CHARS),
            punctuation_chars: static_regex(PUNCTUATION_CHARS),
            placeholder_variable: placeholder_variable.map(static_regex),
        }
    }
}

/// Patterns here are compile-time constants, so a failure is a programming error
fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid dialect pattern {pattern}: {e}"))
}

static HIVE: Lazy<DialectSettings> =
    Lazy::new(|| DialectSettings::build(HIVE_KEYWORDS, HIVE_TYPES, Some(r"^\$\{[^}]*\}")));
static PRESTO: Lazy<DialectSettings> =
    Lazy::new(|| DialectSettings::build(PRESTO_KEYWORDS, PRESTO_TYPES, Some(r"^\?")));
static MYSQL: Lazy<DialectSettings> = Lazy::new(|| {
    DialectSettings::build(MYSQL_KEYWORDS, MYSQL_TYPES, Some(r"^@@?[A-Za-z_][\w.$]*"))
});
static POSTGRES: Lazy<DialectSettings> =
    Lazy::new(|| DialectSettings::build(POSTGRES_KEYWORDS, POSTGRES_TYPES, Some(r"^\$\d+")));
static SQLITE: Lazy<DialectSettings> = Lazy::new(|| {
    DialectSettings::build(SQLITE_KEYWORDS, SQLITE_TYPES, Some(r"^(?:\?\d*|[@$][A-Za-z_]\w*)"))
});
static BIGQUERY: Lazy<DialectSettings> = Lazy::new(|| {
    DialectSettings::build(BIGQUERY_KEYWORDS, BIGQUERY_TYPES, Some(r"^@@?[A-Za-z_]\w*"))
});
static SNOWFLAKE: Lazy<DialectSettings> =
    Lazy::new(|| DialectSettings::build(SNOWFLAKE_KEYWORDS, SNOWFLAKE_TYPES, Some(r"^\$\d+")));

impl SqlDialect {
    pub const ALL: [SqlDialect; 9] = [
        SqlDialect::Hive,
        SqlDialect::SparkSql,
        SqlDialect::Presto,
        SqlDialect::Trino,
        SqlDialect::MySQL,
        SqlDialect::PostgreSQL,
        SqlDialect::SQLite,
        SqlDialect::BigQuery,
        SqlDialect::Snowflake,
    ];

    /// Get the tokenizer vocabulary for this dialect
    pub fn settings(&self) -> &'static DialectSettings {
        match self {
            SqlDialect::Hive | SqlDialect::SparkSql => &HIVE,
            SqlDialect::Presto | SqlDialect::Trino => &PRESTO,
            SqlDialect::MySQL => &MYSQL,
            SqlDialect::PostgreSQL => &POSTGRES,
            SqlDialect::SQLite => &SQLITE,
            SqlDialect::BigQuery => &BIGQUERY,
            SqlDialect::Snowflake => &SNOWFLAKE,
        }
    }

    /// Get the sqlparser dialect used by the default pretty-printer
    pub fn parser_dialect(&self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Hive | SqlDialect::SparkSql => Box::new(HiveDialect {}),
            SqlDialect::Presto | SqlDialect::Trino => Box::new(GenericDialect {}),
            SqlDialect::MySQL => Box::new(MySqlDialect {}),
            SqlDialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
            SqlDialect::SQLite => Box::new(SQLiteDialect {}),
            SqlDialect::BigQuery => Box::new(BigQueryDialect {}),
            SqlDialect::Snowflake => Box::new(SnowflakeDialect {}),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlDialect::Hive => "hive",
            SqlDialect::SparkSql => "sparksql",
            SqlDialect::Presto => "presto",
            SqlDialect::Trino => "trino",
            SqlDialect::MySQL => "mysql",
            SqlDialect::PostgreSQL => "postgresql",
            SqlDialect::SQLite => "sqlite",
            SqlDialect::BigQuery => "bigquery",
            SqlDialect::Snowflake => "snowflake",
        }
    }

    /// Comma separated list of accepted dialect names
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for SqlDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hive" => Ok(SqlDialect::Hive),
            "sparksql" | "spark" => Ok(SqlDialect::SparkSql),
            "presto" => Ok(SqlDialect::Presto),
            "trino" => Ok(SqlDialect::Trino),
            "mysql" => Ok(SqlDialect::MySQL),
            "postgresql" | "postgres" | "pg" => Ok(SqlDialect::PostgreSQL),
            "sqlite" => Ok(SqlDialect::SQLite),
            "bigquery" => Ok(SqlDialect::BigQuery),
            "snowflake" => Ok(SqlDialect::Snowflake),
            _ => Err(Error::UnknownDialect(s.to_string())),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect_names() {
        assert_eq!("Hive".parse::<SqlDialect>().unwrap(), SqlDialect::Hive);
        assert_eq!("pg".parse::<SqlDialect>().unwrap(), SqlDialect::PostgreSQL);
        assert_eq!("trino".parse::<SqlDialect>().unwrap(), SqlDialect::Trino);
    }

    #[test]
    fn test_unknown_dialect_is_an_error() {
        let err = "oracle".parse::<SqlDialect>().unwrap_err();
        assert!(matches!(err, Error::UnknownDialect(ref name) if name == "oracle"));
        assert!(err.to_string().contains("presto"));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for dialect in SqlDialect::ALL {
            assert_eq!(dialect.to_string().parse::<SqlDialect>().unwrap(), dialect);
        }
    }

    #[test]
    fn test_settings_vocabulary() {
        let hive = SqlDialect::Hive.settings();
        assert!(hive.keywords.contains("msck"));
        assert!(hive.types.contains("string"));
        assert!(hive.bool.contains("true"));
        assert!(!SqlDialect::MySQL.settings().keywords.contains("msck"));
    }
}
