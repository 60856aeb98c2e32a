//! CLI end-to-end tests.
//!
//! These tests spawn the `classref` binary and validate stdout and exit codes.
//!
//! Exit code expectations:
//! - 0: Success
//! - 2: Invalid arguments (missing or malformed unit document, bad names)
//! - 3: Resolution error (unknown class or supertype)

use std::io::Write;
use std::process::Command;

use serde_json::Value;
use tempfile::NamedTempFile;

const UNIT: &str = r#"{
    "config": { "root_type": "kotlin.Any" },
    "files": [{
        "path": "app/Factories.kt",
        "package": "app",
        "imports": [{ "path": "lib.Factory" }],
        "classes": [
            { "name": "Service" },
            {
                "name": "BaseFactory",
                "modifiers": ["abstract"],
                "type_parameters": ["S"],
                "super_types": [{ "name": "Factory", "arguments": [{ "name": "S" }] }]
            },
            {
                "name": "ServiceFactory",
                "super_types": [
                    { "name": "BaseFactory", "arguments": [{ "name": "Service" }] },
                    { "name": "Any" }
                ],
                "classes": [{ "name": "Companion", "kind": "object", "modifiers": ["companion"] }]
            },
            { "name": "Orphan", "super_types": [{ "name": "Nowhere" }] }
        ]
    }],
    "symbols": [
        { "class_id": "lib/Factory", "kind": "interface", "type_parameters": ["T"] },
        { "class_id": "kotlin/Any" }
    ]
}"#;

/// Run classref with given arguments and return (stdout, stderr, exit_code).
fn run_classref(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_classref"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute classref");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn unit_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(UNIT.as_bytes()).unwrap();
    file
}

fn json(stdout: &str) -> Value {
    serde_json::from_str(stdout).expect("stdout should be valid JSON")
}

fn fq_names(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|c| c["fq_name"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Success Paths
// ============================================================================

#[test]
fn inspect_reports_hierarchy_and_companion() {
    let unit = unit_file();
    let path = unit.path().to_str().unwrap();
    let (stdout, _stderr, exit_code) =
        run_classref(&["inspect", "--unit", path, "--class", "app.ServiceFactory"]);
    assert_eq!(exit_code, 0);

    let json = json(&stdout);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["schema_version"], "1");
    let class = &json["class"];
    assert_eq!(class["variant"], "syntax");
    assert_eq!(class["visibility"], "public");
    assert_eq!(class["super_types"], serde_json::json!(["BaseFactory<Service>"]));
    assert_eq!(fq_names(&class["direct_super_classes"]), vec!["app.BaseFactory"]);
    assert_eq!(
        fq_names(&class["all_super_classes"]),
        vec!["app.BaseFactory", "lib.Factory"]
    );
    assert_eq!(
        fq_names(&class["companion_objects"]),
        vec!["app.ServiceFactory.Companion"]
    );
}

#[test]
fn supertypes_include_self_first() {
    let unit = unit_file();
    let path = unit.path().to_str().unwrap();
    let (stdout, _stderr, exit_code) = run_classref(&[
        "supertypes",
        "--unit",
        path,
        "--class",
        "app.ServiceFactory",
        "--include-self",
    ]);
    assert_eq!(exit_code, 0);
    assert_eq!(
        fq_names(&json(&stdout)["supertypes"]),
        vec!["app.ServiceFactory", "app.BaseFactory", "lib.Factory"]
    );
}

#[test]
fn resolve_generic_through_intermediate_class() {
    let unit = unit_file();
    let path = unit.path().to_str().unwrap();
    let (stdout, _stderr, exit_code) = run_classref(&[
        "resolve-generic",
        "--unit",
        path,
        "--class",
        "app.ServiceFactory",
        "--declaring",
        "lib.Factory",
        "--parameter",
        "T",
    ]);
    assert_eq!(exit_code, 0);
    let json = json(&stdout);
    assert_eq!(json["resolved"]["display"], "Service");
    assert_eq!(json["resolved"]["fq_name"], "app.Service");
}

#[test]
fn list_reports_every_class() {
    let unit = unit_file();
    let path = unit.path().to_str().unwrap();
    let (stdout, _stderr, exit_code) = run_classref(&["list", "--unit", path]);
    assert_eq!(exit_code, 0);
    let json = json(&stdout);
    assert_eq!(
        fq_names(&json["classes"]),
        vec![
            "app.BaseFactory",
            "app.Orphan",
            "app.Service",
            "app.ServiceFactory",
            "app.ServiceFactory.Companion",
            "kotlin.Any",
            "lib.Factory",
        ]
    );
    assert_eq!(json["classes"][0]["availability"], "syntax_only");
    assert_eq!(json["classes"][6]["variant"], "symbol");
}

// ============================================================================
// Error Paths
// ============================================================================

#[test]
fn unknown_class_returns_exit_3() {
    let unit = unit_file();
    let path = unit.path().to_str().unwrap();
    let (stdout, _stderr, exit_code) =
        run_classref(&["inspect", "--unit", path, "--class", "app.Missing"]);
    assert_eq!(exit_code, 3);
    let json = json(&stdout);
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["kind"], "unresolved_reference");
}

#[test]
fn unresolvable_supertype_returns_exit_3_with_origin() {
    let unit = unit_file();
    let path = unit.path().to_str().unwrap();
    let (stdout, _stderr, exit_code) =
        run_classref(&["supertypes", "--unit", path, "--class", "app.Orphan"]);
    assert_eq!(exit_code, 3);
    let json = json(&stdout);
    assert!(json["error"]["origin"].is_object());
}

#[test]
fn missing_unit_returns_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let (stdout, _stderr, exit_code) =
        run_classref(&["list", "--unit", missing.to_str().unwrap()]);
    assert_eq!(exit_code, 2);
    assert_eq!(json(&stdout)["error"]["kind"], "unit_read");
}

#[test]
fn malformed_unit_returns_exit_2() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let (stdout, _stderr, exit_code) =
        run_classref(&["list", "--unit", file.path().to_str().unwrap()]);
    assert_eq!(exit_code, 2);
    assert_eq!(json(&stdout)["error"]["kind"], "unit_parse");
}

#[test]
fn empty_class_name_returns_exit_2() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "files": [{ "package": "app", "classes": [{ "name": "" }] }] }"#)
        .unwrap();
    let (stdout, _stderr, exit_code) =
        run_classref(&["list", "--unit", file.path().to_str().unwrap()]);
    assert_eq!(exit_code, 2);
    assert_eq!(json(&stdout)["error"]["kind"], "unit_parse");
}
