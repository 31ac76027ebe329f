use std::collections::HashSet;

/// Container types shipped with the standard form prototype.
pub const STANDARD_COMPOSITE_TYPES: &[&str] = &[
    "Form",
    "Page",
    "SummaryPage",
    "Fieldset",
    "GridRow",
    "GridContainer",
];

/// Answers whether an element type holds child elements instead of a value.
pub trait ElementTypeRegistry {
    fn is_composite(&self, element_type: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct StandardTypeRegistry {
    composite: HashSet<String>,
}

impl StandardTypeRegistry {
    pub fn new() -> Self {
        Self {
            composite: STANDARD_COMPOSITE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Standard containers plus the extra types (e.g. from config).
    pub fn with_composite_types<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        registry.composite.extend(extra.into_iter().map(Into::into));
        registry
    }
}

impl Default for StandardTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementTypeRegistry for StandardTypeRegistry {
    fn is_composite(&self, element_type: &str) -> bool {
        self.composite.contains(element_type)
    }
}
