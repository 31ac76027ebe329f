use clap::Parser;
use form_field_state::cli::commands::{build_hooks, format_state_table};
use form_field_state::cli::config::{
    AppConfig, Cli, Commands, StorageConfig, build_tracker, load_config, resolve_storage,
};
use form_field_state::state::state_model::{FieldStateMap, FieldStateRecord};

use crate::common::fixtures::{CONTACT_FORM, contact_form};

mod common;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_bootstrap_minimal() {
    let cli = Cli::parse_from(["form-field-state", "bootstrap", "--form", "contact.form.yaml"]);
    match cli.command {
        Commands::Bootstrap {
            form,
            all_in_list_view,
            force,
        } => {
            assert_eq!(form, "contact.form.yaml");
            assert!(!all_in_list_view);
            assert!(!force);
        }
        _ => panic!("Expected Bootstrap command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.forms_dir.is_none());
}

#[test]
fn cli_parse_bootstrap_all_args() {
    let cli = Cli::parse_from([
        "form-field-state",
        "-vv",
        "bootstrap",
        "--form",
        "contact.form.yaml",
        "--all-in-list-view",
        "--force",
        "--forms-dir",
        "fileadmin/forms",
    ]);
    match cli.command {
        Commands::Bootstrap {
            all_in_list_view,
            force,
            ..
        } => {
            assert!(all_in_list_view);
            assert!(force);
        }
        _ => panic!("Expected Bootstrap command"),
    }
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.forms_dir.as_deref(), Some("fileadmin/forms"));
}

#[test]
fn cli_parse_state_default_format() {
    let cli = Cli::parse_from(["form-field-state", "state", "--form", "a.form.yaml"]);
    match cli.command {
        Commands::State { form, format } => {
            assert_eq!(form, "a.form.yaml");
            assert_eq!(format, "table");
        }
        _ => panic!("Expected State command"),
    }
}

#[test]
fn cli_parse_save_and_delete() {
    let cli = Cli::parse_from(["form-field-state", "save", "--form", "a.form.yaml"]);
    assert!(matches!(cli.command, Commands::Save { ref form } if form == "a.form.yaml"));

    let cli = Cli::parse_from(["form-field-state", "delete", "--form", "a.form.yaml"]);
    assert!(matches!(cli.command, Commands::Delete { ref form } if form == "a.form.yaml"));
}

#[test]
fn cli_requires_form_argument() {
    assert!(Cli::try_parse_from(["form-field-state", "save"]).is_err());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn config_defaults_when_file_missing() {
    let config = load_config(Some("/nonexistent/form-field-state.yaml"));
    assert_eq!(config.tracker.list_view_limit, 4);
    assert!(!config.tracker.enable_all_in_list_view);
    assert!(config.tracker.composite_types.is_empty());
    assert_eq!(config.storage.forms_dir, "forms");
    assert_eq!(config.storage.submissions_file, "submissions.json");
    assert!(config.trace.enabled);
    assert_eq!(config.trace.path, "field_state_trace.jsonl");
}

#[test]
fn config_partial_yaml_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("form-field-state.yaml");
    std::fs::write(
        &path,
        "tracker:\n  list_view_limit: 2\n  composite_types: [Repeater]\ntrace:\n  enabled: false\n",
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.tracker.list_view_limit, 2);
    assert_eq!(config.tracker.composite_types, vec!["Repeater".to_string()]);
    assert!(!config.trace.enabled);
    assert_eq!(config.storage.forms_dir, "forms");
}

#[test]
fn config_malformed_yaml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "tracker: [not, a, mapping").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.tracker.list_view_limit, 4);
}

#[test]
fn cli_flags_override_storage_config() {
    let cli = Cli::parse_from([
        "form-field-state",
        "save",
        "--form",
        "a.form.yaml",
        "--submissions",
        "results.json",
    ]);
    let config = StorageConfig {
        forms_dir: "configured".into(),
        submissions_file: "configured.json".into(),
    };

    let resolved = resolve_storage(&cli, &config);
    assert_eq!(resolved.forms_dir, "configured");
    assert_eq!(resolved.submissions_file, "results.json");
}

#[test]
fn configured_tracker_applies_options() {
    let mut config = AppConfig::default();
    config.tracker.list_view_limit = 1;
    config.tracker.composite_types = vec!["Checkbox".into()];

    let tracker = build_tracker(&config.tracker);
    let mut form = contact_form();
    tracker.update_form_definition(&mut form).unwrap();

    let state = FieldStateMap::from_definition(&form).unwrap();
    assert!(!state.contains("checkbox-1"));
    assert_eq!(state.iter().filter(|r| r.list_view()).count(), 1);
}

#[test]
fn built_hooks_use_configured_directories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("contact.form.yaml"), CONTACT_FORM).unwrap();

    let mut config = AppConfig::default();
    config.trace.enabled = false;
    let storage = StorageConfig {
        forms_dir: dir.path().to_string_lossy().into_owned(),
        submissions_file: dir.path().join("s.json").to_string_lossy().into_owned(),
    };

    let hooks = build_hooks(&config, &storage);
    let report = hooks.save_form("contact.form.yaml").unwrap();
    assert_eq!(report.bootstrapped.len(), 6);
}

// ============================================================================
// Output formatting
// ============================================================================

#[test]
fn state_table_lists_deleted_records_last() {
    let mut deleted = FieldStateRecord::new("text-1", "Name", "Text", true);
    deleted.options.deleted = true;
    let state: FieldStateMap = vec![deleted, FieldStateRecord::new("email-1", "E-Mail", "Email", false)]
        .into_iter()
        .collect();

    let table = format_state_table(&state);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("IDENTIFIER"));
    assert!(lines[1].starts_with("email-1"));
    assert!(lines[1].contains(" no "));
    assert!(lines[2].starts_with("text-1"));
    assert!(lines[2].ends_with("Name (deleted)"));
}

#[test]
fn state_table_for_empty_state() {
    assert_eq!(format_state_table(&FieldStateMap::new()), "(no field state)\n");
}
