//! Configuration loading tests

use clipstream::config::{load_config_from_path, Config};
use std::io::Write;

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[server]
host = "127.0.0.1"
port = 8080

[auth]
access_secret = "test-access"
refresh_secret = "test-refresh"
access_ttl_secs = 60
refresh_ttl_secs = 600

[cookies]
secure = false
"#
    )
    .unwrap();

    let config = load_config_from_path(file.path()).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.auth.access_ttl_secs, 60);
    assert!(!config.cookies.secure);
    // Unset fields fall back to defaults
    assert!(config.cookies.http_only);
}

#[test]
fn test_env_interpolation_in_config_file() {
    std::env::set_var("CLIPSTREAM_TEST_SECRET", "from-env");
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[auth]
access_secret = "${{CLIPSTREAM_TEST_SECRET}}"
refresh_secret = "${{MISSING_SECRET:-fallback}}"
"#
    )
    .unwrap();

    let config = load_config_from_path(file.path()).unwrap();
    assert_eq!(config.auth.access_secret, "from-env");
    assert_eq!(config.auth.refresh_secret, "fallback");
    std::env::remove_var("CLIPSTREAM_TEST_SECRET");
}

#[test]
fn test_missing_file_errors() {
    let result = load_config_from_path(std::path::Path::new("/nonexistent/clipstream.toml"));
    assert!(result.is_err());
}

#[test]
fn test_default_config_is_complete() {
    let config = Config::default();
    assert_eq!(config.server.port, 4000);
    assert_ne!(config.auth.access_secret, config.auth.refresh_secret);
    assert!(config.auth.refresh_ttl_secs > config.auth.access_ttl_secs);
}
