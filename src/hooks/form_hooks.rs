use serde_yaml::Value;

use crate::definition::form_model::{form_identifier, set_form_identifier};
use crate::error::StorageError;
use crate::hooks::archive::{archive_file_name, archive_identifier, archive_tag};
use crate::hooks::storage::{FormPersistence, SubmissionRepository};
use crate::state::report::ReconcileReport;
use crate::state::tracker::FieldStateTracker;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind, report_events};

/// Result of archiving a definition before the host deletes it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub original_identifier: String,
    pub archive_identifier: String,

    /// Persistence identifier of the archived copy, if a file was copied
    pub archived_persistence_identifier: Option<String>,

    /// Submissions now pointing at the archived copy
    pub repointed: usize,
}

/// Save and delete hooks of the form editor lifecycle.
pub struct FormHooks {
    tracker: FieldStateTracker,
    forms: Box<dyn FormPersistence>,
    submissions: Box<dyn SubmissionRepository>,
    tracer: TraceLogger,
}

impl FormHooks {
    pub fn new(
        tracker: FieldStateTracker,
        forms: Box<dyn FormPersistence>,
        submissions: Box<dyn SubmissionRepository>,
        tracer: TraceLogger,
    ) -> Self {
        Self {
            tracker,
            forms,
            submissions,
            tracer,
        }
    }

    pub fn tracker(&self) -> &FieldStateTracker {
        &self.tracker
    }

    pub fn forms(&self) -> &dyn FormPersistence {
        self.forms.as_ref()
    }

    /// Reconcile field identifiers of a definition about to be saved.
    /// Returns the document the host should persist.
    pub fn before_form_save(
        &self,
        persistence_identifier: &str,
        mut definition: Value,
    ) -> Result<(Value, ReconcileReport), StorageError> {
        let report = self.tracker.update_form_definition(&mut definition)?;
        self.tracer.log_all(&report_events(
            "before_form_save",
            persistence_identifier,
            &report,
        ));
        Ok((definition, report))
    }

    /// Load, reconcile and store a definition in one go.
    pub fn save_form(&self, persistence_identifier: &str) -> Result<ReconcileReport, StorageError> {
        let definition = self.forms.load(persistence_identifier)?;
        let (definition, report) = self.before_form_save(persistence_identifier, definition)?;
        self.forms.save(persistence_identifier, &definition)?;
        Ok(report)
    }

    /// Add a state map to a stored definition without reconciling it.
    pub fn bootstrap_form(
        &self,
        persistence_identifier: &str,
        enable_all_in_list_view: bool,
        force: bool,
    ) -> Result<Vec<String>, StorageError> {
        let mut definition = self.forms.load(persistence_identifier)?;
        let added = self.tracker.add_field_state_if_does_not_exist(
            &mut definition,
            enable_all_in_list_view,
            force,
        )?;
        self.forms.save(persistence_identifier, &definition)?;

        for id in &added {
            self.tracer.log(
                &TraceEvent::now("bootstrap", persistence_identifier, TraceKind::Bootstrapped)
                    .with_identifier(id),
            );
        }
        Ok(added)
    }

    /// Archive a definition before the host deletes it.
    ///
    /// The stored definition is saved once under a tagged identifier and
    /// copied to `<tagged>.form.yaml.deleted`; submissions are moved over to
    /// the copy. The live definition gets its original identifier back so
    /// the host can still find and delete it.
    pub fn before_form_delete(
        &self,
        persistence_identifier: &str,
    ) -> Result<DeleteOutcome, StorageError> {
        if !self.forms.exists(persistence_identifier) {
            return Err(StorageError::NotFound(persistence_identifier.to_string()));
        }
        let mut definition = self.forms.load(persistence_identifier)?;

        let original = form_identifier(&definition)?;
        let archived = archive_identifier(&original, &archive_tag(&original));

        set_form_identifier(&mut definition, &archived)?;
        self.forms.save(persistence_identifier, &definition)?;

        // From here on the live definition carries the tagged identifier and
        // must get the original back whatever happens.
        let moved = self.archive_and_repoint(persistence_identifier, &archived);

        set_form_identifier(&mut definition, &original)?;
        self.forms.save(persistence_identifier, &definition)?;
        let (copy, repointed) = moved?;

        Ok(DeleteOutcome {
            original_identifier: original,
            archive_identifier: archived,
            archived_persistence_identifier: copy,
            repointed,
        })
    }

    /// Copy the tagged definition and move its submissions to the copy.
    fn archive_and_repoint(
        &self,
        persistence_identifier: &str,
        archived: &str,
    ) -> Result<(Option<String>, usize), StorageError> {
        let copy = self
            .forms
            .archive_copy(persistence_identifier, &archive_file_name(archived))?;

        let copy_identifier = match &copy {
            Some(id) => id,
            None => return Ok((None, 0)),
        };

        self.tracer.log(
            &TraceEvent::now("before_form_delete", persistence_identifier, TraceKind::Archived)
                .with_identifier(archived)
                .with_detail(copy_identifier),
        );

        let mut repointed = 0;
        for mut submission in self
            .submissions
            .find_by_form_persistence_identifier(persistence_identifier)?
        {
            submission.form_persistence_identifier = copy_identifier.clone();
            submission.form_identifier = archived.to_string();
            self.submissions.update(&submission)?;
            repointed += 1;

            self.tracer.log(
                &TraceEvent::now(
                    "before_form_delete",
                    persistence_identifier,
                    TraceKind::SubmissionRepointed,
                )
                .with_identifier(submission.uid),
            );
        }

        Ok((copy, repointed))
    }
}
