use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::definition::registry::StandardTypeRegistry;
use crate::state::tracker::{DEFAULT_LIST_VIEW_LIMIT, FieldStateTracker, TrackerOptions};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-field-state",
    version,
    about = "Keeps form field identifiers stable across form definition edits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the form definition YAML files
    #[arg(long, global = true)]
    pub forms_dir: Option<String>,

    /// JSON file holding stored submissions
    #[arg(long, global = true)]
    pub submissions: Option<String>,

    /// Path to config file (default: form-field-state.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the field state of a form that has none yet
    Bootstrap {
        /// Persistence identifier (file name below the forms directory)
        #[arg(long)]
        form: String,

        /// Show every field in the results list by default
        #[arg(long)]
        all_in_list_view: bool,

        /// Add missing fields even if a field state already exists
        #[arg(long)]
        force: bool,
    },

    /// Reconcile field identifiers and save the form, as the save hook does
    Save {
        #[arg(long)]
        form: String,
    },

    /// Archive a form and move its submissions over, as the delete hook does
    Delete {
        #[arg(long)]
        form: String,
    },

    /// Print the field state of a form
    State {
        #[arg(long)]
        form: String,

        /// Output format: table, yaml, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-field-state.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_list_view_limit")]
    pub list_view_limit: usize,

    #[serde(default)]
    pub enable_all_in_list_view: bool,

    /// Container types on top of the standard ones
    #[serde(default)]
    pub composite_types: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            list_view_limit: DEFAULT_LIST_VIEW_LIMIT,
            enable_all_in_list_view: false,
            composite_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_forms_dir")]
    pub forms_dir: String,

    #[serde(default = "default_submissions_file")]
    pub submissions_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            forms_dir: default_forms_dir(),
            submissions_file: default_submissions_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_trace_path")]
    pub path: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_trace_path(),
        }
    }
}

// Serde default helpers
fn default_list_view_limit() -> usize { DEFAULT_LIST_VIEW_LIMIT }
fn default_true() -> bool { true }
fn default_forms_dir() -> String { "forms".to_string() }
fn default_submissions_file() -> String { "submissions.json".to_string() }
fn default_trace_path() -> String { "field_state_trace.jsonl".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-field-state.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: ignoring malformed config '{}': {}", config_path, e);
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

pub fn build_tracker(config: &TrackerConfig) -> FieldStateTracker {
    let registry = StandardTypeRegistry::with_composite_types(config.composite_types.iter().cloned());
    FieldStateTracker::new(
        Box::new(registry),
        TrackerOptions {
            list_view_limit: config.list_view_limit,
            enable_all_in_list_view: config.enable_all_in_list_view,
        },
    )
}

/// CLI flags win over the config file.
pub fn resolve_storage(cli: &Cli, config: &StorageConfig) -> StorageConfig {
    StorageConfig {
        forms_dir: cli.forms_dir.clone().unwrap_or_else(|| config.forms_dir.clone()),
        submissions_file: cli
            .submissions
            .clone()
            .unwrap_or_else(|| config.submissions_file.clone()),
    }
}
