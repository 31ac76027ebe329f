use std::collections::HashMap;

use crate::error::FieldStateError;

/// Hands out `<type-text>-<number>` identifiers that were never used before.
///
/// Built once per reconciliation pass from every identifier the definition
/// has ever known. For each text prefix it remembers the highest numeric
/// suffix seen, so allocation only moves forward.
#[derive(Debug, Clone, Default)]
pub struct IdentifierAllocator {
    highest: HashMap<String, u64>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_identifiers<'a, I>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut allocator = Self::new();
        for id in identifiers {
            allocator.observe(id);
        }
        allocator
    }

    /// Record an existing identifier. Identifiers without a numeric suffix
    /// cannot collide with allocated ones and are ignored.
    pub fn observe(&mut self, identifier: &str) {
        if let Some((text, number)) = split_identifier(identifier) {
            let highest = self.highest.entry(text.to_lowercase()).or_insert(0);
            *highest = (*highest).max(number);
        }
    }

    /// Number the next allocation for `element_type` would get.
    pub fn peek(&self, element_type: &str) -> u64 {
        self.highest
            .get(&type_prefix(element_type))
            .map_or(1, |n| n.saturating_add(1))
    }

    /// Allocate and reserve the next identifier for `element_type`.
    /// Fails once the prefix has used up every `u64` suffix.
    pub fn next_for_type(&mut self, element_type: &str) -> Result<String, FieldStateError> {
        let prefix = type_prefix(element_type);
        let highest = self.highest.entry(prefix.clone()).or_insert(0);
        *highest = highest
            .checked_add(1)
            .ok_or_else(|| FieldStateError::IdentifierSpaceExhausted(prefix.clone()))?;
        Ok(format!("{}-{}", prefix, highest))
    }
}

/// Split `text-42` into `("text", 42)`. The text part must be non-empty and
/// the suffix all ASCII digits.
pub fn split_identifier(identifier: &str) -> Option<(&str, u64)> {
    let (text, number) = identifier.rsplit_once('-')?;
    if text.is_empty() || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok().map(|n| (text, n))
}

/// `MultiCheckbox` -> `multicheckbox`, the form editor's naming scheme.
pub fn type_prefix(element_type: &str) -> String {
    element_type.trim().to_lowercase()
}
