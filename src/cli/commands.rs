use crate::cli::config::{AppConfig, StorageConfig, build_tracker};
use crate::hooks::form_hooks::FormHooks;
use crate::hooks::storage::{FileFormStorage, FormPersistence, JsonSubmissionStore};
use crate::state::state_model::FieldStateMap;
use crate::trace::logger::TraceLogger;

/// Wire the hooks against the filesystem stores.
pub fn build_hooks(config: &AppConfig, storage: &StorageConfig) -> FormHooks {
    let tracer = if config.trace.enabled {
        TraceLogger::new(&config.trace.path)
    } else {
        TraceLogger::disabled()
    };

    FormHooks::new(
        build_tracker(&config.tracker),
        Box::new(FileFormStorage::new(&storage.forms_dir)),
        Box::new(JsonSubmissionStore::new(&storage.submissions_file)),
        tracer,
    )
}

// ============================================================================
// bootstrap subcommand
// ============================================================================

pub fn cmd_bootstrap(
    hooks: &FormHooks,
    form: &str,
    all_in_list_view: bool,
    force: bool,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let all_in_list_view = all_in_list_view || hooks.tracker().options().enable_all_in_list_view;
    let added = hooks.bootstrap_form(form, all_in_list_view, force)?;

    if added.is_empty() {
        println!("{}: field state already present, nothing added", form);
    } else {
        println!("{}: added {} fields to the field state", form, added.len());
    }
    if verbose > 0 {
        for id in &added {
            eprintln!("  + {}", id);
        }
    }
    Ok(())
}

// ============================================================================
// save subcommand
// ============================================================================

pub fn cmd_save(hooks: &FormHooks, form: &str, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let report = hooks.save_form(form)?;

    if report.is_noop() {
        println!("{}: field state up to date", form);
        return Ok(());
    }

    println!(
        "{}: {} new, {} updated, {} deleted",
        form,
        report.allocated.len() + report.bootstrapped.len(),
        report.updated.len(),
        report.deleted.len()
    );

    if verbose > 0 {
        for field in &report.allocated {
            eprintln!("  {} -> {} ({})", field.previous, field.assigned, field.element_type);
        }
        for id in &report.updated {
            eprintln!("  ~ {}", id);
        }
        for id in &report.deleted {
            eprintln!("  - {}", id);
        }
    }
    Ok(())
}

// ============================================================================
// delete subcommand
// ============================================================================

pub fn cmd_delete(hooks: &FormHooks, form: &str, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = hooks.before_form_delete(form)?;

    match &outcome.archived_persistence_identifier {
        Some(copy) => println!(
            "{}: archived as {} ({} submissions moved)",
            form, copy, outcome.repointed
        ),
        None => println!("{}: no stored file to archive", form),
    }
    if verbose > 0 {
        eprintln!(
            "  identifier {} archived as {}",
            outcome.original_identifier, outcome.archive_identifier
        );
    }
    Ok(())
}

// ============================================================================
// state subcommand
// ============================================================================

pub fn cmd_state(hooks: &FormHooks, form: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let definition = hooks.forms().load(form)?;
    let state = hooks.tracker().field_state(&definition)?;

    let output = match format {
        "yaml" => serde_yaml::to_string(&state.to_value())?,
        "json" => serde_json::to_string_pretty(&state.to_value())?,
        _ => format_state_table(&state),
    };
    print!("{}", output);
    Ok(())
}

/// Plain-text listing, one record per line, deleted records last.
pub fn format_state_table(state: &FieldStateMap) -> String {
    let mut out = String::new();

    if state.is_empty() {
        out.push_str("(no field state)\n");
        return out;
    }

    let width = state.identifiers().map(str::len).max().unwrap_or(0).max("IDENTIFIER".len());
    out.push_str(&format!("{:<width$}  {:<16}  {:<4}  {}\n", "IDENTIFIER", "TYPE", "LIST", "LABEL"));

    for record in state.active().chain(state.deleted()) {
        let list = if record.list_view() { "yes" } else { "no" };
        let label = if record.is_deleted() {
            format!("{} (deleted)", record.label)
        } else {
            record.label.clone()
        };
        out.push_str(&format!(
            "{:<width$}  {:<16}  {:<4}  {}\n",
            record.identifier, record.element_type, list, label
        ));
    }

    out
}
