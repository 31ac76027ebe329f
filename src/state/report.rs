/// A field that entered the state under a freshly allocated identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedField {
    /// Identifier the field carried in the submitted definition
    pub previous: String,
    /// Identifier it carries now
    pub assigned: String,
    pub element_type: String,
}

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// Records created because the definition had no state yet
    pub bootstrapped: Vec<String>,
    pub allocated: Vec<AllocatedField>,
    /// Known fields whose label or type changed
    pub updated: Vec<String>,
    /// Records that went from live to deleted in this pass
    pub deleted: Vec<String>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.bootstrapped.is_empty()
            && self.allocated.is_empty()
            && self.updated.is_empty()
            && self.deleted.is_empty()
    }

    /// Whether the definition's field identifiers were rewritten.
    pub fn renamed_fields(&self) -> bool {
        self.allocated.iter().any(|a| a.previous != a.assigned)
    }
}
