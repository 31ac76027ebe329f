use std::collections::HashSet;

use serde_yaml::Value;

use crate::definition::form_model::{FieldNode, collect_nodes, leaf_fields, set_identifier};
use crate::definition::registry::{ElementTypeRegistry, StandardTypeRegistry};
use crate::error::FieldStateError;
use crate::state::allocator::IdentifierAllocator;
use crate::state::report::{AllocatedField, ReconcileReport};
use crate::state::state_model::{FieldStateMap, FieldStateRecord};

/// Fields shown in the results list when nothing else is configured.
pub const DEFAULT_LIST_VIEW_LIMIT: usize = 4;

#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// The first N leaf fields default to `listView = true`
    pub list_view_limit: usize,

    /// Every new field defaults to `listView = true`
    pub enable_all_in_list_view: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            list_view_limit: DEFAULT_LIST_VIEW_LIMIT,
            enable_all_in_list_view: false,
        }
    }
}

/// Keeps field identifiers of a form definition stable across saves.
///
/// The tracker does no I/O: it reads and rewrites the definition document in
/// place. Either operation validates the whole definition before touching
/// it, so an `Err` leaves the document unchanged.
pub struct FieldStateTracker {
    registry: Box<dyn ElementTypeRegistry>,
    options: TrackerOptions,
}

impl FieldStateTracker {
    pub fn new(registry: Box<dyn ElementTypeRegistry>, options: TrackerOptions) -> Self {
        Self { registry, options }
    }

    pub fn with_standard_registry() -> Self {
        Self::new(Box::new(StandardTypeRegistry::new()), TrackerOptions::default())
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Current state map of a definition (empty if it has none).
    pub fn field_state(&self, definition: &Value) -> Result<FieldStateMap, FieldStateError> {
        FieldStateMap::from_definition(definition)
    }

    // ========================================================================
    // Bootstrap
    // ========================================================================

    /// Create the state map from the current fields if the definition has
    /// none, or when `force` is set. Records that already exist are kept as
    /// they are. Returns the identifiers that were added.
    pub fn add_field_state_if_does_not_exist(
        &self,
        definition: &mut Value,
        enable_all_in_list_view: bool,
        force: bool,
    ) -> Result<Vec<String>, FieldStateError> {
        let nodes = collect_nodes(definition, self.registry.as_ref())?;
        let mut state = FieldStateMap::from_definition(definition)?;

        if !state.is_empty() && !force {
            return Ok(Vec::new());
        }

        let added = self.seed_state(&mut state, &nodes, enable_all_in_list_view);
        state.write_to(definition)?;
        Ok(added)
    }

    fn seed_state(
        &self,
        state: &mut FieldStateMap,
        nodes: &[FieldNode],
        enable_all_in_list_view: bool,
    ) -> Vec<String> {
        let mut added = Vec::new();
        for (position, field) in leaf_fields(nodes).enumerate() {
            if state.contains(&field.identifier) {
                continue;
            }
            state.insert(FieldStateRecord::new(
                &field.identifier,
                &field.label,
                &field.element_type,
                self.list_view_default(position, enable_all_in_list_view),
            ));
            added.push(field.identifier.clone());
        }
        added
    }

    fn list_view_default(&self, position: usize, enable_all: bool) -> bool {
        enable_all || position < self.options.list_view_limit
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    /// Bring the state map in line with the definition about to be saved.
    ///
    /// Fields whose identifier is unknown or belongs to a deleted record get
    /// a fresh identifier, both in the state and in the definition itself.
    /// Known live fields get their label/type refreshed. Records with no
    /// field left in the definition are marked deleted, never removed.
    ///
    /// A state map is only bootstrapped here when the definition has none:
    /// the first save adopts the current identifiers as they are. A forced
    /// bootstrap would adopt every unknown identifier too, and unknown
    /// identifiers must be re-allocated on later saves.
    pub fn update_form_definition(
        &self,
        definition: &mut Value,
    ) -> Result<ReconcileReport, FieldStateError> {
        let nodes = collect_nodes(definition, self.registry.as_ref())?;
        let mut state = FieldStateMap::from_definition(definition)?;
        let mut report = ReconcileReport::default();

        if state.is_empty() {
            report.bootstrapped =
                self.seed_state(&mut state, &nodes, self.options.enable_all_in_list_view);
        }

        // Containers keep their identifiers, so allocations must avoid them too
        let mut allocator = IdentifierAllocator::from_identifiers(
            state.identifiers().chain(
                nodes
                    .iter()
                    .filter(|n| n.composite)
                    .map(|n| n.identifier.as_str()),
            ),
        );

        let mut active: HashSet<String> = HashSet::new();
        let mut renames: Vec<(&FieldNode, String)> = Vec::new();

        for (position, field) in leaf_fields(&nodes).enumerate() {
            let live = state
                .get(&field.identifier)
                .is_some_and(|record| !record.is_deleted());

            if live {
                if let Some(record) = state.get_mut(&field.identifier) {
                    if record.label != field.label || record.element_type != field.element_type {
                        record.label = field.label.clone();
                        record.element_type = field.element_type.clone();
                        report.updated.push(field.identifier.clone());
                    }
                    active.insert(field.identifier.clone());
                }
            } else {
                let assigned = allocator.next_for_type(&field.element_type)?;
                state.insert(FieldStateRecord::new(
                    &assigned,
                    &field.label,
                    &field.element_type,
                    self.list_view_default(position, self.options.enable_all_in_list_view),
                ));
                report.allocated.push(AllocatedField {
                    previous: field.identifier.clone(),
                    assigned: assigned.clone(),
                    element_type: field.element_type.clone(),
                });
                active.insert(assigned.clone());
                renames.push((field, assigned));
            }
        }

        for record in state.iter_mut() {
            let was_deleted = record.is_deleted();
            record.options.deleted = !active.contains(&record.identifier);
            if record.options.deleted && !was_deleted {
                report.deleted.push(record.identifier.clone());
            }
        }

        for (field, assigned) in &renames {
            let renamed = set_identifier(definition, &field.index_path, assigned);
            debug_assert!(renamed, "walked node vanished at {}", field.path());
        }
        state.write_to(definition)?;

        Ok(report)
    }
}

impl Default for FieldStateTracker {
    fn default() -> Self {
        Self::with_standard_registry()
    }
}
