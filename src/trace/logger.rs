use std::{fs::File, fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

/// Field state trace, one JSON object per line.
///
/// Tracing never fails a save or delete: a trace that cannot be written is
/// reported on stderr and skipped.
pub struct TraceLogger {
    path: String,
    file: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Some(Mutex::new(f)),
            Err(e) => {
                eprintln!("field state trace disabled, cannot open {}: {}", path, e);
                None
            }
        };

        Self {
            path: path.to_string(),
            file,
        }
    }

    pub fn disabled() -> Self {
        Self {
            path: String::new(),
            file: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        if let Err(reason) = self.append(event) {
            eprintln!(
                "field state trace {}: dropped {:?} event for {}: {}",
                self.path, event.kind, event.persistence_identifier, reason
            );
        }
    }

    pub fn log_all(&self, events: &[TraceEvent]) {
        for event in events {
            self.log(event);
        }
    }

    fn append(&self, event: &TraceEvent) -> Result<(), String> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let line = serde_json::to_string(event).map_err(|e| e.to_string())?;
        let mut file = file.lock().map_err(|_| "writer poisoned".to_string())?;
        writeln!(file, "{}", line).map_err(|e| e.to_string())
    }
}
