use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

const HEALTH_REQUEST: &str = r#"{"age":62,"gender":"Male","systolicBP":155,"diastolicBP":96,"bloodSugar":135,"bmi":31.2}"#;

fn command(bin: &str, dir: &Path) -> Command {
    let mut command = Command::new(bin);
    for (key, _) in std::env::vars().filter(|(k, _)| k.starts_with("VITALSCAN_")) {
        command.env_remove(key);
    }
    command
        .current_dir(dir)
        .env("VITALSCAN_LOG__LEVEL", "error")
        .env("VITALSCAN_MODELS__SCALER_SAMPLES", "200");
    command
}

fn run(bin: &str, dir: &Path, args: &[&str]) -> (Output, Value) {
    let output = command(bin, dir)
        .args(args)
        .output()
        .expect("spawn binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value = serde_json::from_str(stdout.trim())
        .unwrap_or_else(|err| panic!("stdout is not JSON ({err}): {stdout}"));
    (output, value)
}

#[cfg(feature = "ml")]
#[test]
fn health_prediction_creates_models_and_predicts() {
    let dir = tempfile::tempdir().unwrap();

    let (output, value) = run(
        env!("CARGO_BIN_EXE_health_prediction"),
        dir.path(),
        &[HEALTH_REQUEST],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(value.get("error").is_none());
    for key in ["cardiovascularRisk", "diabetesRisk", "overallHealthScore"] {
        let percentage = value[key].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&percentage), "{key} = {percentage}");
    }

    let recommendations = value["recommendations"].as_array().unwrap();
    assert_eq!(
        recommendations[0],
        "Monitor blood pressure regularly and consider lifestyle changes"
    );
    assert_eq!(
        recommendations[1],
        "Consult endocrinologist for diabetes management"
    );
    assert_eq!(recommendations[2], "Consider weight management program");

    let models = dir.path().join("models");
    assert!(models.join("health_model.bin").exists());
    assert!(models.join("scaler.json").exists());
    assert!(models.join("image_model.bin").exists());
}

#[cfg(feature = "ml")]
#[test]
fn cached_models_give_the_same_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_health_prediction");

    let (_, first) = run(bin, dir.path(), &[HEALTH_REQUEST]);
    let (_, second) = run(bin, dir.path(), &[HEALTH_REQUEST]);

    assert_eq!(first, second);
}

#[cfg(feature = "ml")]
#[test]
fn wrong_argument_count_exits_with_error_payload() {
    let dir = tempfile::tempdir().unwrap();

    for args in [&[][..], &[HEALTH_REQUEST, HEALTH_REQUEST][..]] {
        let (output, value) = run(env!("CARGO_BIN_EXE_health_prediction"), dir.path(), args);

        assert_eq!(output.status.code(), Some(1));
        assert!(value["error"].is_string());
        assert_eq!(value["cardiovascularRisk"], 30.0);
        assert_eq!(value["diabetesRisk"], 25.0);
        assert_eq!(value["overallHealthScore"], 70.0);
    }

    let (output, value) = run(env!("CARGO_BIN_EXE_image_analysis"), dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        value["findings"],
        "Unable to complete AI analysis. Manual review required."
    );
}

#[cfg(feature = "ml")]
#[test]
fn missing_field_is_named_in_the_error() {
    let dir = tempfile::tempdir().unwrap();

    let (output, value) = run(
        env!("CARGO_BIN_EXE_health_prediction"),
        dir.path(),
        &[r#"{"age":40,"gender":"female","systolicBP":120,"diastolicBP":80,"bmi":24}"#],
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(value["error"], "Missing required field: bloodSugar");

    let (output, value) = run(
        env!("CARGO_BIN_EXE_image_analysis"),
        dir.path(),
        &[r#"{"analysisType":"xray"}"#],
    );

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(value["error"], "Missing required field: filename");
}

#[cfg(feature = "ml")]
#[test]
fn unrecognised_gender_is_predicted_as_female() {
    let dir = tempfile::tempdir().unwrap();
    let request = |gender: &str| {
        format!(
            r#"{{"age":50,"gender":"{gender}","systolicBP":130,"diastolicBP":85,"bloodSugar":110,"bmi":27}}"#
        )
    };

    let (output, other) = run(
        env!("CARGO_BIN_EXE_health_prediction"),
        dir.path(),
        &[&request("nonbinary")],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(other.get("error").is_none());

    let (_, female) = run(
        env!("CARGO_BIN_EXE_health_prediction"),
        dir.path(),
        &[&request("female")],
    );
    assert_eq!(other, female);
}

#[cfg(feature = "ml")]
#[test]
fn image_analysis_is_deterministic_per_filename() {
    let dir = tempfile::tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_image_analysis");
    let request = r#"{"filename":"lumbar-spine.dcm","analysisType":"mri"}"#;

    let (output, first) = run(bin, dir.path(), &[request]);
    let (_, second) = run(bin, dir.path(), &[request]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(first, second);

    let confidence = first["confidence"].as_f64().unwrap();
    assert!((0.85..1.0).contains(&confidence));
    assert_eq!(first["recommendations"].as_array().unwrap().len(), 3);
}

#[cfg(not(feature = "ml"))]
#[test]
fn without_model_support_the_unavailable_payload_is_returned() {
    let dir = tempfile::tempdir().unwrap();

    let (output, value) = run(
        env!("CARGO_BIN_EXE_image_analysis"),
        dir.path(),
        &[r#"{"filename":"a.png","analysisType":"xray"}"#],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Import error: "));
    assert_eq!(value["confidence"], 0.85);
    assert_eq!(value["recommendations"][1], "Contact IT support");
}

#[cfg(not(feature = "ml"))]
#[test]
fn without_model_support_health_prediction_succeeds_without_arguments() {
    let dir = tempfile::tempdir().unwrap();

    let (output, value) = run(env!("CARGO_BIN_EXE_health_prediction"), dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        value,
        serde_json::json!({
            "error": "Import error: vitalscan was built without model support",
            "cardiovascularRisk": 25.0,
            "diabetesRisk": 20.0,
            "overallHealthScore": 75.0,
            "recommendations": ["Schedule health checkup", "Maintain healthy lifestyle"]
        })
    );
}
