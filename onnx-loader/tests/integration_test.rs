//! Integration tests for ONNX session loading
//!
//! These tests exercise the failure paths the detection engine relies on:
//! a missing or unreadable artifact must surface as `ModelLoadFailed`.

use derma_onnx_loader::{OnnxError, OnnxSession};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_missing_model_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("VIT23n_quantmodel.onnx");

    let result = OnnxSession::load(&model_path);

    match result {
        Err(OnnxError::ModelLoadFailed(msg)) => {
            assert!(msg.contains("not found"), "Unexpected message: {}", msg);
        }
        Err(other) => panic!("Expected ModelLoadFailed, got {:?}", other),
        Ok(_) => panic!("Loading a missing model must fail"),
    }
}

#[test]
fn test_corrupt_model_file() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"definitely not a protobuf model")
        .expect("Failed to write temp file");

    let result = OnnxSession::load(file.path());

    assert!(
        matches!(result, Err(OnnxError::ModelLoadFailed(_))),
        "Corrupt model should fail to load"
    );
}
