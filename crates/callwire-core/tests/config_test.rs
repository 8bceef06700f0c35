//! Tests for the callwire configuration system.

use std::sync::Mutex;

use callwire_core::config::{CallwireConfig, ConfigOverrides};
use callwire_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear CALLWIRE_ env vars and point HOME at an empty directory so a real
/// user config never leaks into the tests.
fn isolate_env(home: &std::path::Path) {
    for key in [
        "CALLWIRE_PROJECT_ROOT",
        "CALLWIRE_MAX_FILE_BYTES",
        "CALLWIRE_TOLERATE_SYNTAX_ERRORS",
        "CALLWIRE_MODULE_ROOTS",
        "USERPROFILE",
    ] {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", home);
}

#[test]
fn test_defaults_without_any_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());
    let project = tempdir();

    let config = CallwireConfig::load(project.path(), None).unwrap();
    assert_eq!(config, CallwireConfig::default());
    assert_eq!(config.analysis.effective_max_file_bytes(), 2 * 1024 * 1024);
    assert!(!config.analysis.effective_tolerate_syntax_errors());
    assert_eq!(config.conventions.effective_module_decorators(), vec!["Module"]);
    assert_eq!(config.conventions.effective_module_file_markers(), vec![".module."]);
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::fs::create_dir_all(home.path().join(".callwire")).unwrap();
    std::fs::write(
        home.path().join(".callwire").join("config.toml"),
        r#"
[analysis]
max_file_bytes = 1000
module_roots = ["lib"]
"#,
    )
    .unwrap();

    let project = tempdir();
    std::fs::write(
        project.path().join("callwire.toml"),
        r#"
[analysis]
max_file_bytes = 5000
tolerate_syntax_errors = false

[conventions]
module_decorators = ["Module", "Global"]
"#,
    )
    .unwrap();

    std::env::set_var("CALLWIRE_TOLERATE_SYNTAX_ERRORS", "true");

    let overrides = ConfigOverrides {
        project_root: Some("/repo".into()),
        ..Default::default()
    };
    let config = CallwireConfig::load(project.path(), Some(&overrides)).unwrap();
    std::env::remove_var("CALLWIRE_TOLERATE_SYNTAX_ERRORS");

    // project beats user
    assert_eq!(config.analysis.max_file_bytes, Some(5000));
    // user value survives where the project is silent
    assert_eq!(config.analysis.module_roots, vec!["lib".to_string()]);
    // env beats project
    assert_eq!(config.analysis.tolerate_syntax_errors, Some(true));
    // overrides beat everything
    assert_eq!(config.analysis.project_root.as_deref(), Some("/repo"));
    assert_eq!(
        config.conventions.effective_module_decorators(),
        vec!["Module", "Global"]
    );
    assert_eq!(
        config.conventions.effective_controller_decorators(),
        vec!["Controller"]
    );
}

#[test]
fn test_env_module_roots_split() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());
    std::env::set_var("CALLWIRE_MODULE_ROOTS", "src, libs ,,");

    let project = tempdir();
    let config = CallwireConfig::load(project.path(), None).unwrap();
    std::env::remove_var("CALLWIRE_MODULE_ROOTS");

    assert_eq!(config.analysis.module_roots, vec!["src".to_string(), "libs".to_string()]);
}

#[test]
fn test_override_module_roots_beat_env_and_project() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());
    std::env::set_var("CALLWIRE_MODULE_ROOTS", "src");

    let project = tempdir();
    std::fs::write(
        project.path().join("callwire.toml"),
        "[analysis]\nmodule_roots = [\"packages\"]\n",
    )
    .unwrap();

    let overrides = ConfigOverrides {
        module_roots: Some(vec!["vendor".into(), "lib".into()]),
        ..Default::default()
    };
    let config = CallwireConfig::load(project.path(), Some(&overrides)).unwrap();
    std::env::remove_var("CALLWIRE_MODULE_ROOTS");

    assert_eq!(config.analysis.module_roots, vec!["vendor".to_string(), "lib".to_string()]);
}

#[test]
fn test_invalid_project_toml_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let project = tempdir();
    std::fs::write(project.path().join("callwire.toml"), "[analysis\nbroken").unwrap();

    let err = CallwireConfig::load(project.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_validation_rejects_zero_file_size() {
    let err = CallwireConfig::from_toml("[analysis]\nmax_file_bytes = 0\n").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "analysis.max_file_bytes");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_validation_rejects_blank_convention() {
    let err = CallwireConfig::from_toml("[conventions]\ninject_decorators = [\" \"]\n").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config = CallwireConfig::from_toml(
        r#"
[analysis]
module_roots = ["src"]
future_option = 42

[something_else]
x = 1
"#,
    )
    .unwrap();
    assert_eq!(config.analysis.module_roots, vec!["src".to_string()]);
}

#[test]
fn test_toml_roundtrip_preserves_values() {
    let config = CallwireConfig::from_toml(
        r#"
[analysis]
project_root = "/work/app"
max_file_bytes = 4096

[conventions]
inject_decorators = ["Inject", "InjectRepository"]
"#,
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let reparsed = CallwireConfig::from_toml(&text).unwrap();
    assert_eq!(config, reparsed);
}
