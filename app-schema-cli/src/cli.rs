use anyhow::{Result, bail};
use app_schema::AppSchemaOps;
use app_schema::catalog::ids;
use app_schema::ops::PathsValidationResult;
use clap::{Parser, Subcommand};
use std::io::Write;

use crate::server::AppSchemaServer;

#[derive(Parser)]
#[command(name = "app-schema")]
#[command(about = "Validate integration app definitions against the app schema catalog", long_about = None)]
pub struct Cli {
    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to an optional config JSON overriding the version and link base URLs
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate app definition files (JSON or YAML) against the app schema
    Validate {
        /// Files or directories, can be given multiple times
        #[arg(long, required = true, action = clap::ArgAction::Append)]
        path: Vec<String>,
    },
    /// Validate definition files against any registered schema
    ValidateAgainst {
        #[arg(long)]
        schema_id: String,
        #[arg(long, required = true, action = clap::ArgAction::Append)]
        path: Vec<String>,
    },
    /// Export the app schema and everything it references
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
    /// Replay every schema's examples and anti-examples
    CheckExamples,
    /// List registered schemas
    ListSchemas,
    /// Print one registered schema with its examples
    GetSchema {
        #[arg(long)]
        schema_id: String,
    },
    /// Start the HTTP validation service
    Server {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value = "8000")]
        port: u16,
    },
}

/// Run the CLI application
///
/// # Errors
///
/// Returns an error if command execution fails or a definition is invalid
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli).await
}

/// Execute CLI commands with a parsed Cli struct
///
/// # Errors
///
/// Returns an error if:
/// - The schema catalog cannot be built
/// - File I/O operations fail
/// - Any validated definition is invalid, or an example misbehaves
pub async fn run_with_cli(cli: Cli) -> Result<()> {
    // WARNING (no -v), INFO (-v), DEBUG (-vv)
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    // Tests run several commands in one process
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    run_command(cli).await
}

async fn run_command(cli: Cli) -> Result<()> {
    let ops = AppSchemaOps::new(cli.config.as_deref(), usize::from(cli.verbose))?;

    match cli.command {
        Commands::Server { host, port } => {
            println!("starting the server @ http://{host}:{port}");
            if cli.verbose == 0 {
                println!("use --verbose to see server logs");
            }
            AppSchemaServer::new(ops, host, port, cli.verbose).run().await?;
        }
        Commands::Validate { path } => {
            let result = ops.validate_paths(&path, Some(ids::APP));
            print_result(&result)?;
            ensure_valid(&result)?;
        }
        Commands::ValidateAgainst { schema_id, path } => {
            let result = ops.validate_paths(&path, Some(&schema_id));
            print_result(&result)?;
            ensure_valid(&result)?;
        }
        Commands::Export { out } => {
            let exported = ops.export_schema()?;
            match out {
                Some(out) => {
                    std::fs::write(&out, serde_json::to_string_pretty(&exported)?)?;
                    print_result(&serde_json::json!({"ok": true, "out": out}))?;
                }
                None => print_result(&exported)?,
            }
        }
        Commands::CheckExamples => {
            let result = ops.check_examples();
            print_result(&result)?;
            if !result.ok {
                bail!("{} example(s) misbehave", result.failures.len());
            }
        }
        Commands::ListSchemas => print_result(&ops.list_schemas())?,
        Commands::GetSchema { schema_id } => {
            let result = ops.get_schema(&schema_id);
            print_result(&result)?;
            if result.schema.is_none() {
                bail!("{}", result.error);
            }
        }
    }

    Ok(())
}

fn ensure_valid(result: &PathsValidationResult) -> Result<()> {
    if result.count == 0 {
        bail!("no definition files found");
    }
    let invalid = result.results.iter().filter(|r| !r.valid).count();
    if invalid > 0 {
        bail!("{invalid} of {} definition(s) invalid", result.count);
    }
    Ok(())
}

fn print_result<T: serde::Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::try_parse_from(["app-schema", "validate", "--path", "app.json"]).unwrap();

        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Validate { path } => assert_eq!(path, vec!["app.json"]),
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_multiple_paths() {
        let cli = Cli::try_parse_from(["app-schema", "validate", "--path", "a.json", "--path", "defs/"]).unwrap();

        match cli.command {
            Commands::Validate { path } => assert_eq!(path, vec!["a.json", "defs/"]),
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_requires_path() {
        assert!(Cli::try_parse_from(["app-schema", "validate"]).is_err());
    }

    #[test]
    fn test_cli_parse_validate_against() {
        let cli = Cli::try_parse_from([
            "app-schema",
            "validate-against",
            "--schema-id",
            "/FieldSchema",
            "--path",
            "field.yaml",
        ])
        .unwrap();

        match cli.command {
            Commands::ValidateAgainst { schema_id, path } => {
                assert_eq!(schema_id, "/FieldSchema");
                assert_eq!(path, vec!["field.yaml"]);
            }
            _ => panic!("Expected ValidateAgainst command"),
        }
    }

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::try_parse_from(["app-schema", "export", "--out", "/tmp/exported.json"]).unwrap();
        match cli.command {
            Commands::Export { out } => assert_eq!(out.as_deref(), Some("/tmp/exported.json")),
            _ => panic!("Expected Export command"),
        }

        let cli = Cli::try_parse_from(["app-schema", "export"]).unwrap();
        assert!(matches!(cli.command, Commands::Export { out: None }));
    }

    #[test]
    fn test_cli_parse_unit_commands() {
        let cli = Cli::try_parse_from(["app-schema", "check-examples"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckExamples));

        let cli = Cli::try_parse_from(["app-schema", "list-schemas"]).unwrap();
        assert!(matches!(cli.command, Commands::ListSchemas));
    }

    #[test]
    fn test_cli_parse_get_schema() {
        let cli = Cli::try_parse_from(["app-schema", "get-schema", "--schema-id", "/KeySchema"]).unwrap();
        match cli.command {
            Commands::GetSchema { schema_id } => assert_eq!(schema_id, "/KeySchema"),
            _ => panic!("Expected GetSchema command"),
        }
    }

    #[test]
    fn test_cli_parse_server_defaults() {
        let cli = Cli::try_parse_from(["app-schema", "server"]).unwrap();
        match cli.command {
            Commands::Server { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8000);
            }
            _ => panic!("Expected Server command"),
        }
    }

    #[test]
    fn test_cli_parse_server_command() {
        let cli = Cli::try_parse_from(["app-schema", "server", "--host", "0.0.0.0", "--port", "3000"]).unwrap();
        match cli.command {
            Commands::Server { host, port } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 3000);
            }
            _ => panic!("Expected Server command"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "app-schema",
            "-vvv",
            "--config",
            "/path/to/config.json",
            "list-schemas",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.config.as_deref(), Some("/path/to/config.json"));
    }

    #[test]
    fn test_ensure_valid_rejects_empty_runs() {
        let result = PathsValidationResult {
            ok: false,
            count: 0,
            results: Vec::new(),
        };
        let err = ensure_valid(&result).unwrap_err();
        assert!(err.to_string().contains("no definition files"));
    }
}
