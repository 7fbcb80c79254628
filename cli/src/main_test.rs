use std::path::PathBuf;

use clap::CommandFactory;
use serde_json::json;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("techinfo").chain(args.iter().copied())).unwrap()
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Result<Value, CliError> {
    let cli = parse(args);
    run(&cli.command, &TabLabels::default(), &mut stdin.as_bytes())
}

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("techinfo-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn input_defaults_to_stdin() {
    let cli = parse(&["migrate"]);
    let Command::Migrate(args) = cli.command else {
        panic!("expected migrate");
    };
    assert_eq!(args.input, "-");
    assert!(!cli.compact);
}

#[test]
fn compact_flag_is_global() {
    let cli = parse(&["patch", "--compact"]);
    assert!(cli.compact);
}

#[test]
fn migrate_reads_stdin() {
    let output = run_with_stdin(&["migrate"], r#"{"bimObjects": "IFC 4"}"#).unwrap();
    assert_eq!(
        output,
        json!([{ "id": "bim-objects", "name": "BIM Objects", "type": "bimObjects", "content": "IFC 4" }])
    );
}

#[test]
fn migrate_empty_product_prints_empty_list() {
    let output = run_with_stdin(&["migrate"], "{}").unwrap();
    assert_eq!(output, json!([]));
}

#[test]
fn patch_always_has_four_keys() {
    let output = run_with_stdin(&["patch"], r#"{"name": "Gate"}"#).unwrap();
    let keys = output.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys.len(), 4);
    for key in ["technicalInfoTabs", "specifications", "panelVariations", "bimObjects"] {
        assert!(keys.iter().any(|k| k == key), "missing {key}");
    }
}

#[test]
fn apply_reads_ops_file() {
    let ops = temp_file(
        "ops.json",
        &json!([
            { "op": "addHeader", "tabId": "panel-variations" },
            { "op": "setCell", "tabId": "panel-variations", "rowIndex": 0, "key": "coating", "value": "Zinc" },
            { "op": "removeTab", "tabId": "missing" }
        ])
        .to_string(),
    );
    let ops_path = ops.to_string_lossy().to_string();

    let output = run_with_stdin(
        &["apply", "--ops", &ops_path],
        r#"{"panelVariations": [{"panelType": "A"}]}"#,
    )
    .unwrap();

    let table = &output["technicalInfoTabs"][0]["content"];
    assert_eq!(table["headers"].as_array().map(Vec::len), Some(5));
    assert_eq!(table["rows"][0]["coating"], json!("Zinc"));
    assert_eq!(table["rows"][0]["column5"], json!(""));
    assert!(output["panelVariations"].as_str().unwrap().contains("Zinc"));
}

#[test]
fn apply_rejects_double_stdin() {
    let err = run_with_stdin(&["apply", "--ops", "-"], "{}").unwrap_err();
    assert!(matches!(err, CliError::StdinTwice));
}

#[test]
fn invalid_product_json_is_an_error() {
    let err = run_with_stdin(&["migrate"], "[1, 2]").unwrap_err();
    assert!(matches!(err, CliError::Model(techinfo::Error::NotAnObject(_))));

    let err = run_with_stdin(&["patch"], "{oops").unwrap_err();
    assert!(matches!(err, CliError::Model(techinfo::Error::Json(_))));
}

#[test]
fn missing_file_reports_path() {
    let err = run_with_stdin(&["migrate", "--input", "/nonexistent/product.json"], "").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/product.json"));
}

#[test]
fn invalid_ops_report_path() {
    let ops = temp_file("bad-ops.json", r#"[{"op": "explode"}]"#);
    let ops_path = ops.to_string_lossy().to_string();
    let err = run_with_stdin(&["apply", "--ops", &ops_path], "{}").unwrap_err();
    assert!(matches!(err, CliError::InvalidOps { .. }));
}

#[test]
fn render_json_compact_and_pretty() {
    let value = json!({ "a": [1] });
    assert_eq!(render_json(&value, true).unwrap(), r#"{"a":[1]}"#);
    assert!(render_json(&value, false).unwrap().contains('\n'));
}
