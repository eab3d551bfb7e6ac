#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use app_schema_cli::{Cli, Commands, run_with_cli};
use std::fs;
use tempfile::TempDir;

fn cli(command: Commands) -> Cli {
    Cli {
        verbose: 0,
        config: None,
        command,
    }
}

fn write_definitions(dir: &TempDir, files: &[(&str, &str)]) -> String {
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir.path().to_string_lossy().to_string()
}

#[tokio::test]
async fn test_run_validate_valid_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_definitions(
        &temp_dir,
        &[
            ("app.json", r#"{"version": "1.0.0", "platformVersion": "1.0.0"}"#),
            ("other.yaml", "version: 2.0.0\nplatformVersion: 1.0.0\n"),
        ],
    );

    run_with_cli(cli(Commands::Validate { path: vec![path] })).await
}

#[tokio::test]
async fn test_run_validate_invalid_definition_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_definitions(&temp_dir, &[("app.json", r#"{"version": "1.0.0"}"#)]);

    let err = run_with_cli(cli(Commands::Validate { path: vec![path] }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("1 of 1 definition(s) invalid"));
}

#[tokio::test]
async fn test_run_validate_unparsable_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_definitions(&temp_dir, &[("app.json", "{")]);

    assert!(
        run_with_cli(cli(Commands::Validate { path: vec![path] }))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_run_validate_missing_path_fails() {
    let err = run_with_cli(cli(Commands::Validate {
        path: vec!["/nonexistent/app-definitions".to_owned()],
    }))
    .await
    .unwrap_err();
    assert!(err.to_string().contains("no definition files"));
}

#[tokio::test]
async fn test_run_validate_against_field_schema() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_definitions(&temp_dir, &[("field.json", r#"{"key": "sku", "list": true}"#)]);

    run_with_cli(cli(Commands::ValidateAgainst {
        schema_id: "/FieldSchema".to_owned(),
        path: vec![path],
    }))
    .await
}

#[tokio::test]
async fn test_run_validate_against_unknown_schema_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_definitions(&temp_dir, &[("field.json", r#"{"key": "sku"}"#)]);

    assert!(
        run_with_cli(cli(Commands::ValidateAgainst {
            schema_id: "/NopeSchema".to_owned(),
            path: vec![path],
        }))
        .await
        .is_err()
    );
}

#[tokio::test]
async fn test_run_export_to_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let out = temp_dir.path().join("exported.json");

    run_with_cli(cli(Commands::Export {
        out: Some(out.to_string_lossy().to_string()),
    }))
    .await?;

    let exported: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
    assert!(exported["version"].is_string());
    assert_eq!(exported["schemas"]["/AppSchema"]["id"], "/AppSchema");
    assert!(exported["schemas"]["/AppSchema"].get("examples").is_none());
    Ok(())
}

#[tokio::test]
async fn test_run_export_with_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{"version": "9.9.9"}"#)?;
    let out = temp_dir.path().join("exported.json");

    run_with_cli(Cli {
        verbose: 1,
        config: Some(config.to_string_lossy().to_string()),
        command: Commands::Export {
            out: Some(out.to_string_lossy().to_string()),
        },
    })
    .await?;

    let exported: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
    assert_eq!(exported["version"], "9.9.9");
    Ok(())
}

#[tokio::test]
async fn test_run_check_examples() -> Result<()> {
    run_with_cli(cli(Commands::CheckExamples)).await
}

#[tokio::test]
async fn test_run_list_schemas() -> Result<()> {
    run_with_cli(cli(Commands::ListSchemas)).await
}

#[tokio::test]
async fn test_run_get_schema() -> Result<()> {
    run_with_cli(cli(Commands::GetSchema {
        schema_id: "/KeySchema".to_owned(),
    }))
    .await
}

#[tokio::test]
async fn test_run_get_unknown_schema_fails() {
    assert!(
        run_with_cli(cli(Commands::GetSchema {
            schema_id: "/NopeSchema".to_owned(),
        }))
        .await
        .is_err()
    );
}
