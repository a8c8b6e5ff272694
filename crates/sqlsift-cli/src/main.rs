//! sqlsift CLI - tokenize, trace, lint, limit and format notebook SQL

mod args;
mod config;
mod output;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use futures::executor::block_on;
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use sqlsift_core::{
    format, get_context_sensitive_warnings, get_dropped_tables, get_limited_query, tokenize,
    transform_data, CodeAnalysis, KeywordCase, MissingTableCache, Severity, TokenizeOptions,
    TransformOptions,
};

use crate::args::{Args, Command};
use crate::config::Config;
use crate::output::{print_json, print_lineage, OutputFormatter};

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match (args.quiet, args.verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Read a file, or stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .into_diagnostic()?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).into_diagnostic()
}

/// Expand glob patterns in file arguments
fn expand_files(patterns: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern_str = pattern.display().to_string();
        if pattern_str.contains('*') {
            for path in glob::glob(&pattern_str).into_diagnostic()?.flatten() {
                files.push(path);
            }
        } else {
            files.push(pattern.clone());
        }
    }
    Ok(files)
}

fn run(args: Args) -> Result<bool> {
    let config = Config::load(args.config.as_deref())?;
    let dialect = config.dialect(args.dialect.as_deref())?;
    tracing::debug!(%dialect, "resolved dialect");

    match args.command {
        Command::Tokens {
            file,
            include_unknown,
        } => {
            let content = read_input(&file)?;
            let tokens = tokenize(
                &content,
                &TokenizeOptions {
                    dialect,
                    include_unknown,
                },
            );
            print_json(&tokens)?;
            Ok(false)
        }

        Command::Lineage { file, format } => {
            let content = read_input(&file)?;
            let analysis = CodeAnalysis::new(&content, dialect);
            print_lineage(&analysis.lineage, format.unwrap_or_default())?;
            Ok(false)
        }

        Command::Lint {
            files,
            metastore,
            metastore_id,
            disable,
            format,
        } => {
            let config = config.merge_lint_args(&metastore, metastore_id, &disable, format);
            let output_format = config.output_format();
            let metastore = config.load_metastore()?;

            let files = expand_files(&files)?;
            if files.is_empty() {
                miette::bail!("No SQL files specified");
            }

            let disabled: HashSet<&str> = config.disable.iter().map(String::as_str).collect();
            // Shared across files so a missing table is looked up once per run
            let mut cache = MissingTableCache::new();
            let mut total_errors = 0;
            let mut total_warnings = 0;

            for file in &files {
                let content = read_input(file)?;
                let analysis = CodeAnalysis::new(&content, dialect);

                let mut warnings = analysis.context_free_warnings();
                if let Some((metastore, metastore_id)) = &metastore {
                    warnings.extend(block_on(get_context_sensitive_warnings(
                        *metastore_id,
                        &analysis.lineage,
                        metastore,
                        &mut cache,
                    ))?);
                }
                warnings.retain(|w| !disabled.iter().any(|id| w.rule.matches(id)));

                if warnings.is_empty() {
                    continue;
                }
                let formatter = OutputFormatter::new(output_format, file.display().to_string());
                formatter.print_warnings(&warnings, &content)?;

                for warning in &warnings {
                    match warning.severity {
                        Severity::Error => total_errors += 1,
                        Severity::Warning => total_warnings += 1,
                    }
                }
            }

            if !args.quiet {
                if total_errors > 0 || total_warnings > 0 {
                    eprintln!(
                        "Found {} error(s), {} warning(s) in {} file(s)",
                        total_errors,
                        total_warnings,
                        files.len()
                    );
                } else {
                    eprintln!("All {} file(s) passed", files.len());
                }
            }

            Ok(total_errors > 0)
        }

        Command::Limit { file, row_limit } => {
            let content = read_input(&file)?;
            let row_limit = row_limit.or(config.row_limit);
            print!("{}", get_limited_query(&content, row_limit, dialect));
            Ok(false)
        }

        Command::Format {
            file,
            lowercase,
            tab_width,
            use_tabs,
            strict,
        } => {
            let content = read_input(&file)?;
            let mut options = config.format.clone();
            if lowercase {
                options.case = KeywordCase::Lower;
            }
            if let Some(tab_width) = tab_width {
                options.tab_width = tab_width;
            }
            options.use_tabs |= use_tabs;
            if strict {
                options.silent = false;
            }

            println!("{}", format(&content, dialect, &options)?);
            Ok(false)
        }

        Command::Dropped { file } => {
            let content = read_input(&file)?;
            for table in get_dropped_tables(&content, dialect) {
                println!("{}", table);
            }
            Ok(false)
        }

        Command::Chart { file, options } => {
            let data: Vec<Vec<Value>> =
                serde_json::from_str(&read_input(&file)?).into_diagnostic()?;
            let options: TransformOptions = match options {
                Some(path) => serde_json::from_str(&read_input(&path)?).into_diagnostic()?,
                None => TransformOptions::default(),
            };
            print_json(&transform_data(&data, &options))?;
            Ok(false)
        }
    }
}
