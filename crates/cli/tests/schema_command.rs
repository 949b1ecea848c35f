use assert_cmd::Command;
use serde_json::Value;

#[allow(deprecated)]
fn schema(target: &str) -> Value {
    let output = Command::cargo_bin("depscope")
        .expect("binary")
        .args(["schema", target])
        .output()
        .expect("command run");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn snapshot_schema_lists_inputs() {
    let schema = schema("snapshot");
    let properties = schema["properties"].as_object().expect("properties");

    for key in ["framework", "injector", "scripts", "provided_tokens"] {
        assert!(properties.contains_key(key), "missing {key}");
    }
}

#[test]
fn options_schema_lists_knobs() {
    let schema = schema("options");
    let properties = schema["properties"].as_object().expect("properties");

    assert!(properties.contains_key("max_services"));
    assert!(properties.contains_key("generate_visualization"));
}
