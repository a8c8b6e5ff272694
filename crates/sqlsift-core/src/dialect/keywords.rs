//! Per-dialect word lists

pub(super) const COMMON_KEYWORDS: &[&str] = &[
    "add", "all", "alter", "analyze", "and", "any", "as", "asc", "between", "both", "by",
    "cascade", "case", "cast", "check", "column", "columns", "comment", "constraint", "create",
    "cross", "cube", "current", "database", "databases", "default", "delete", "desc",
    "describe", "distinct", "drop", "else", "end", "escape", "except", "exists", "explain",
    "extended", "fetch", "filter", "first", "following", "for", "foreign", "formatted", "from",
    "full", "function", "grant", "group", "grouping", "having", "if", "ilike", "in", "index",
    "inner", "insert", "intersect", "interval", "into", "is", "join", "last", "lateral", "left",
    "like", "limit", "natural", "next", "not", "null", "nulls", "offset", "on", "only", "or",
    "order", "outer", "over", "partition", "partitions", "preceding", "primary", "range",
    "recursive", "references", "rename", "replace", "revoke", "right", "rollup", "row", "rows",
    "schema", "schemas", "select", "set", "sets", "show", "table", "tables", "tablesample",
    "temporary", "then", "to", "truncate", "unbounded", "union", "unique", "unnest", "update",
    "use", "using", "values", "view", "when", "where", "window", "with",
];

pub(super) const COMMON_TYPES: &[&str] = &[
    "array", "bigint", "binary", "boolean", "char", "date", "decimal", "double", "float", "int",
    "integer", "map", "numeric", "real", "smallint", "time", "timestamp", "tinyint", "varchar",
];

pub(super) const BOOLS: &[&str] = &["true", "false"];

pub(super) const HIVE_KEYWORDS: &[&str] = &[
    "buckets", "cluster", "clustered", "compute", "directory", "distribute", "external",
    "fields", "format", "inputformat", "load", "local", "location", "msck", "outputformat",
    "overwrite", "partitioned", "repair", "rlike", "regexp", "serde", "sort", "sorted",
    "statistics", "stored", "tblproperties", "terminated",
];

pub(super) const HIVE_TYPES: &[&str] = &["string", "struct", "uniontype"];

pub(super) const PRESTO_KEYWORDS: &[&str] = &[
    "at", "call", "deallocate", "execute", "prepare", "session", "stats", "zone",
];

pub(super) const PRESTO_TYPES: &[&str] = &["json", "ipaddress", "row", "uuid", "varbinary"];

pub(super) const MYSQL_KEYWORDS: &[&str] = &[
    "auto_increment", "engine", "ignore", "key", "keys", "lock", "regexp", "rlike",
    "straight_join", "unlock",
];

pub(super) const MYSQL_TYPES: &[&str] = &[
    "blob", "datetime", "enum", "longtext", "mediumint", "mediumtext", "text", "varbinary",
    "year",
];

pub(super) const POSTGRES_KEYWORDS: &[&str] = &[
    "conflict", "do", "nothing", "returning", "similar", "vacuum",
];

pub(super) const POSTGRES_TYPES: &[&str] = &[
    "bytea", "jsonb", "json", "serial", "bigserial", "text", "timestamptz", "uuid",
];

pub(super) const SQLITE_KEYWORDS: &[&str] = &["autoincrement", "glob", "pragma", "vacuum"];

pub(super) const SQLITE_TYPES: &[&str] = &["blob", "text"];

pub(super) const BIGQUERY_KEYWORDS: &[&str] = &["qualify", "struct", "except", "safe"];

pub(super) const BIGQUERY_TYPES: &[&str] = &[
    "bignumeric", "bytes", "datetime", "float64", "geography", "int64", "json", "string",
];

pub(super) const SNOWFLAKE_KEYWORDS: &[&str] = &["clone", "qualify", "stage", "warehouse"];

pub(super) const SNOWFLAKE_TYPES: &[&str] = &[
    "number", "object", "string", "text", "timestamp_ltz", "timestamp_ntz", "timestamp_tz",
    "variant",
];
