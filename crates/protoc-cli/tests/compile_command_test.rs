use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const TELEMETRY: &str = r#"{
    "messages": [
        {
            "name": "SensorData",
            "id": 0,
            "fields": [
                {"name": "id", "id": 0, "type": "uint8"},
                {"name": "value", "id": 1, "type": "Value"}
            ]
        },
        {
            "name": "Value",
            "id": 1,
            "fields": [
                {"name": "value", "id": 0, "type": "float32"}
            ]
        }
    ]
}"#;

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_beta-protoc") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("beta-protoc{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_beta-protoc is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn write_schema(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("schema file should be created");
    path
}

fn run_compile(input: &Path, out: &Path, extra: &[&str]) -> Output {
    Command::new(cargo_bin())
        .arg(input)
        .arg("-o")
        .arg(out)
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .expect("beta-protoc should execute")
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn compile_generates_every_language_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(dir.path(), "telemetry.json", TELEMETRY);
    let out = dir.path().join("generated");

    let output = run_compile(&input, &out, &[]);
    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No language specified"));
    assert!(stdout.contains("C, Python"));
    assert!(stdout.contains("Successfully generated code in"));

    for file in ["C/SensorData.c", "C/SensorData.h", "C/Value.c", "C/Value.h"] {
        assert!(out.join(file).is_file(), "{file} should be generated");
    }
    assert!(out.join("Python/SensorData.py").is_file());
    assert!(out.join("Python/Value.py").is_file());

    let header = fs::read_to_string(out.join("C/SensorData.h")).unwrap();
    assert!(header.contains("uint8_t id;"));
    assert!(header.contains("#include \"Value.h\""));
}

#[test]
fn compile_selected_language_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(dir.path(), "telemetry.json", TELEMETRY);
    let out = dir.path().join("generated");

    let output = run_compile(&input, &out, &["-l", "c"]);
    assert_exit_code(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("No language specified"));
    assert!(out.join("C/Value.h").is_file());
    assert!(!out.join("Python").exists());
}

#[test]
fn compile_accepts_yaml_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(
        dir.path(),
        "ping.yaml",
        "messages:\n  - name: Ping\n    id: 0\n    fields:\n      - {name: seq, id: 0, type: uint32}\n",
    );
    let out = dir.path().join("generated");

    let output = run_compile(&input, &out, &["--lang", "Python"]);
    assert_exit_code(&output, 0);
    let module = fs::read_to_string(out.join("Python/Ping.py")).unwrap();
    assert!(module.contains("seq: int = 0"));
}

#[test]
fn compile_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_compile(
        &dir.path().join("missing.json"),
        &dir.path().join("generated"),
        &[],
    );

    assert_exit_code(&output, 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: The specified JSON file does not exist."));
}

#[test]
fn compile_reports_every_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(
        dir.path(),
        "broken.json",
        r#"{"messages": [
            {"name": "1Bad", "id": 0, "fields": []},
            {"name": "Parent", "id": 1, "fields": [
                {"name": "child", "id": 0, "type": "Ghost"}
            ]}
        ]}"#,
    );
    let out = dir.path().join("generated");

    let output = run_compile(&input, &out, &[]);
    assert_exit_code(&output, 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: JSON parsing error:"));
    assert!(stderr.contains("\t- in /messages/1Bad/name: \"1Bad\" is not a valid name"));
    assert!(stderr.contains(
        "\t- in /messages/Parent/fields/child/type: Ghost is not a valid type (not a primitive nor a defined message)."
    ));
    assert!(!out.join("C").exists());
}

#[test]
fn compile_reports_missing_type_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(dir.path(), "telemetry.json", TELEMETRY);
    let descriptors = write_schema(
        dir.path(),
        "languages.yaml",
        "languages:\n  - name: Tiny\n    src_ext: c\n    header_ext: h\n    templates: C\n    types_mapping:\n      float32: float\n",
    );
    let out = dir.path().join("generated");

    let output = run_compile(
        &input,
        &out,
        &["--languages", descriptors.to_str().unwrap(), "-l", "Tiny"],
    );
    assert_exit_code(&output, 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: uint8 is not defined for Tiny language."));
}

#[test]
fn compile_rejects_unknown_language() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(dir.path(), "telemetry.json", TELEMETRY);

    let output = run_compile(&input, &dir.path().join("generated"), &["-l", "Cobol"]);
    assert_exit_code(&output, 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Unknown language: Cobol (supported: C, Python)"));
}

#[test]
fn compile_clean_removes_stale_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(dir.path(), "telemetry.json", TELEMETRY);
    let out = dir.path().join("generated");
    fs::create_dir_all(out.join("C")).unwrap();
    fs::write(out.join("C/Stale.h"), "/* stale */").unwrap();

    let output = run_compile(&input, &out, &["-l", "C", "--clean"]);
    assert_exit_code(&output, 0);
    assert!(!out.join("C/Stale.h").exists());
    assert!(out.join("C/SensorData.h").is_file());
}

#[test]
fn compile_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(dir.path(), "telemetry.json", TELEMETRY);
    let out = dir.path().join("generated");

    assert_exit_code(&run_compile(&input, &out, &["--clean"]), 0);
    let first = fs::read(out.join("C/SensorData.h")).unwrap();
    let first_py = fs::read(out.join("Python/SensorData.py")).unwrap();

    assert_exit_code(&run_compile(&input, &out, &["--clean"]), 0);
    assert_eq!(first, fs::read(out.join("C/SensorData.h")).unwrap());
    assert_eq!(first_py, fs::read(out.join("Python/SensorData.py")).unwrap());
}

#[test]
fn compile_rejects_recursive_message() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(
        dir.path(),
        "tree.json",
        r#"{"messages": [
            {"name": "Node", "id": 0, "fields": [
                {"name": "value", "id": 0, "type": "int32"},
                {"name": "next", "id": 1, "type": "Node"}
            ]}
        ]}"#,
    );
    let out = dir.path().join("generated");

    let output = run_compile(&input, &out, &[]);
    assert_exit_code(&output, 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(
        "\t- in /messages/Node/fields/next/type: \"Node\" refers back to itself through field \"next\""
    ));
    assert!(!out.join("C").exists());
}

#[test]
fn compile_reports_colliding_member_names() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_schema(
        dir.path(),
        "reading.json",
        r#"{"messages": [
            {"name": "Reading", "id": 0, "fields": [
                {"name": "rawValue", "id": 0, "type": "float32"},
                {"name": "raw_value", "id": 1, "type": "float32"}
            ]}
        ]}"#,
    );
    let out = dir.path().join("generated");

    let output = run_compile(&input, &out, &["-l", "Python"]);
    assert_exit_code(&output, 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(
        "Error: Fields \"rawValue\", \"raw_value\" of message Reading all become member \"raw_value\" in Python language."
    ));
    assert!(!out.join("Python").exists());
}
