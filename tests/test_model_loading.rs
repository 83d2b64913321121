//! Startup-time weights handling.

use drawscan::{DetectError, Detector};

#[test]
fn missing_weights_reports_model_not_found() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let missing = dir.path().join("weights").join("best.onnx");

    let result = Detector::load(&missing);

    match result {
        Err(DetectError::ModelNotFound { path }) => {
            assert_eq!(path, missing);
        }
        Err(other) => panic!("expected ModelNotFound, got {other}"),
        Ok(_) => panic!("loading nonexistent weights must fail"),
    }
    Ok(())
}

#[test]
fn garbage_weights_fail_as_model_error() -> anyhow::Result<()> {
    // A file that exists but is not a valid ONNX graph must fail past the
    // existence check, as a model error rather than ModelNotFound.
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("best.onnx");
    std::fs::write(&path, b"not an onnx model")?;

    match Detector::load(&path) {
        Err(DetectError::Model { .. }) => Ok(()),
        Err(other) => panic!("expected a model error, got {other}"),
        Ok(_) => panic!("loading garbage weights must fail"),
    }
}
