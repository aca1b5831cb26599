// tests/error_handling.rs

use std::io::Write;
use tempfile::NamedTempFile;
use sitepipe::config::load_and_validate;
use sitepipe::errors::SitepipeError;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn alias_cycle_returns_structured_error() {
    let file = config_file(
        r#"
[alias]
site = ["styles", "pages"]
pages = ["templates", "site"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(SitepipeError::TaskCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("site") || msg.contains("pages"));
        }
        Err(e) => panic!("Expected TaskCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_alias_member_returns_config_error() {
    let file = config_file(
        r#"
[alias]
default = ["styles", "fonts"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(SitepipeError::ConfigError(msg)) => {
            assert!(msg.contains("unknown task"));
            assert!(msg.contains("fonts"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn alias_shadowing_watch_is_rejected() {
    let file = config_file("[alias]\nwatch = [\"styles\"]\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SitepipeError::ConfigError(msg)) if msg.contains("shadows")
    ));
}

#[test]
fn bad_browserslist_query_is_rejected() {
    let file = config_file("[style]\nbrowsers = [\"definitely not a query\"]\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SitepipeError::ConfigError(msg)) if msg.contains("[style].browsers")
    ));
}

#[test]
fn clashing_ports_are_rejected() {
    let file = config_file("[serve]\nport = 4000\nreload_port = 4000\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SitepipeError::ConfigError(msg)) if msg.contains("must differ")
    ));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = config_file("[project\ntitle = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SitepipeError::TomlError(_))
    ));
}

#[test]
fn missing_config_file_is_a_config_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("Sitepipe.toml");
    match load_and_validate(&missing) {
        Err(SitepipeError::ConfigError(msg)) => assert!(msg.contains("cannot read config")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_config_gets_defaults() {
    let file = config_file("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.style.pattern, "*.scss");
    assert_eq!(cfg.script.suffix, ".min");
    assert_eq!(cfg.serve.port, 3000);
    assert_eq!(cfg.serve.reload_port, 35729);
    assert_eq!(
        cfg.aliases().get("default").unwrap(),
        &vec!["styles", "scripts", "templates", "images"]
    );
}
