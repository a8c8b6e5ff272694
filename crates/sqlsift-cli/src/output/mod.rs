//! Output formatting

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use sqlsift_core::{EditorLines, Lineage, LinterWarning, Severity};

use crate::args::OutputFormat;

/// Output formatter for lint warnings
pub struct OutputFormatter {
    format: OutputFormat,
    file_name: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, file_name: String) -> Self {
        Self { format, file_name }
    }

    /// Print warnings in the configured format
    pub fn print_warnings(&self, warnings: &[LinterWarning], source: &str) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                self.print_human(warnings, source);
                Ok(())
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "file": self.file_name,
                "warnings": warnings,
            })),
            OutputFormat::Sarif => self.print_sarif(warnings),
        }
    }

    fn print_human(&self, warnings: &[LinterWarning], source: &str) {
        let lines = EditorLines::new(source);
        for warning in warnings {
            let severity_str = match warning.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
            };

            eprintln!("{}[{}]: {}", severity_str, warning.code(), warning.message);

            // Positions are 0-indexed, editors count from 1
            let line = warning.from.line + 1;
            let col = warning.from.ch + 1;
            eprintln!("  --> {}:{}:{}", self.file_name, line, col);

            if let Some(source_line) = lines.line(warning.from.line) {
                eprintln!("   |");
                eprintln!("{:>3} | {}", line, source_line);

                let end = if warning.to.line == warning.from.line {
                    warning.to.ch
                } else {
                    source_line.len()
                };
                let padding = " ".repeat(warning.from.ch);
                let underline = "^".repeat(end.saturating_sub(warning.from.ch).max(1));
                eprintln!("   | {}{}", padding, underline);
            }

            eprintln!();
        }
    }

    fn print_sarif(&self, warnings: &[LinterWarning]) -> Result<()> {
        let results: Vec<serde_json::Value> = warnings
            .iter()
            .map(|w| {
                serde_json::json!({
                    "ruleId": w.code(),
                    "level": match w.severity {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                    },
                    "message": {
                        "text": w.message
                    },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": {
                                "uri": self.file_name
                            },
                            "region": {
                                "startLine": w.from.line + 1,
                                "startColumn": w.from.ch + 1,
                                "endLine": w.to.line + 1,
                                "endColumn": w.to.ch + 1
                            }
                        }
                    }]
                })
            })
            .collect();

        let sarif = serde_json::json!({
            "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": "sqlsift",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                },
                "results": results
            }]
        });

        print_json(&sarif)
    }
}

/// Pretty-print any serializable value to stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

/// Print statement-by-statement lineage
pub fn print_lineage(lineage: &Lineage, format: OutputFormat) -> Result<()> {
    if format != OutputFormat::Human {
        return print_json(lineage);
    }

    for (statement, tables) in &lineage.references {
        println!("statement {}:", statement);
        for table in tables {
            println!("  {} ({}:{})", table.full_name(), table.line + 1, table.start + 1);
        }
        if let Some(aliases) = lineage.aliases.get(statement) {
            for (alias, table) in aliases {
                println!("  {} -> {}", alias, table.full_name());
            }
        }
    }
    Ok(())
}
