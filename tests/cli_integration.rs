//! Configuration loading combined with command-line overrides

use clap::Parser;
use schoa::cli::{Args, Commands, Verbosity};
use schoa::config::Config;
use schoa::records;
use schoa::views::ViewKind;
use tempfile::TempDir;

#[test]
fn test_file_then_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schoa.toml");
    std::fs::write(
        &path,
        r#"
[gemini]
endpoint = "http://gateway.internal:8080/"
model = "gemini-file"
api_key_env = "HOSPITAL_GEMINI_KEY"
temperature = 0.5

[display]
default_view = "operations"
show_spinner = false
"#,
    )
    .unwrap();

    let args = Args::try_parse_from([
        "schoa",
        "--config",
        path.to_str().unwrap(),
        "--model",
        "gemini-flag",
        "-v",
        "start",
        "--view",
        "search",
    ])
    .unwrap();

    let mut config = Config::load(args.config.clone()).unwrap();
    assert_eq!(config.default_view(), ViewKind::Operations);

    args.apply_overrides(&mut config);
    config.validate().unwrap();

    assert_eq!(config.gemini.model, "gemini-flag");
    assert_eq!(config.gemini.endpoint, "http://gateway.internal:8080/");
    assert_eq!(config.gemini.api_key_env, "HOSPITAL_GEMINI_KEY");
    assert_eq!(config.gemini.temperature, 0.5);
    assert!(!config.display.show_spinner);
    assert_eq!(config.default_view(), ViewKind::Search);
    assert_eq!(args.verbosity(), Verbosity::Verbose);
    assert_eq!(args.verbosity().log_directive(), "info");
}

#[test]
fn test_invalid_view_flag_fails_validation() {
    let args = Args::try_parse_from(["schoa", "start", "--view", "billing"]).unwrap();
    let mut config = Config::default();
    args.apply_overrides(&mut config);
    assert!(config.validate().is_err());
}

#[test]
fn test_one_shot_commands_parse() {
    let args = Args::try_parse_from(["schoa", "image", "scan.png"]).unwrap();
    assert!(matches!(args.command(), Commands::Image { .. }));

    let args = Args::try_parse_from(["schoa", "payroll", "--process"]).unwrap();
    assert_eq!(args.command(), Commands::Payroll { process: true });

    let args = Args::try_parse_from(["schoa", "-q", "finance", "--data"]).unwrap();
    assert_eq!(args.command(), Commands::Finance { data: true });
    assert!(!args.verbosity().show_progress());
}

#[test]
fn test_patient_json_uses_camel_case_and_iso_dates() {
    let json: serde_json::Value = serde_json::from_str(&records::patients_json().unwrap()).unwrap();
    let first = &json[0];
    assert_eq!(first["id"], "P-1001");
    assert_eq!(first["dob"], "1980-05-15");
    assert_eq!(first["lastVisit"], "2023-10-12");
    assert!(first.get("last_visit").is_none());
    assert_eq!(json.as_array().unwrap().len(), 4);
}
