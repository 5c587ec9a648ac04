//! Installs the global subscriber, so it lives in its own test binary

use calls_common::{init_logging, LoggingConfig};

#[test]
fn test_init_logging_writes_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calls911.log");

    let config = LoggingConfig {
        level: "debug".to_string(),
        json_format: true,
        file_path: Some(path.to_string_lossy().into_owned()),
        ..LoggingConfig::default()
    };
    init_logging(config.clone()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Logging initialized"));
    assert!(contents.contains("\"level\":\"debug\"") || contents.contains("DEBUG"));

    // A second subscriber cannot be installed
    assert!(init_logging(config).is_err());
}
