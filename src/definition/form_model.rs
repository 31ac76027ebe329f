use std::collections::HashSet;

use serde_yaml::{Mapping, Value};

use crate::definition::registry::ElementTypeRegistry;
use crate::error::FieldStateError;

pub const IDENTIFIER_KEY: &str = "identifier";
pub const TYPE_KEY: &str = "type";
pub const LABEL_KEY: &str = "label";
pub const RENDERABLES_KEY: &str = "renderables";
pub const RENDERING_OPTIONS_KEY: &str = "renderingOptions";

// ============================================================================
// Node view
// ============================================================================

/// A renderable of the definition (page, container or field), read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    /// Indices into the nested `renderables` sequences, from the root
    pub index_path: Vec<usize>,

    pub identifier: String,
    pub element_type: String,

    /// Empty when the node carries no label
    pub label: String,

    /// Containers are walked but never tracked
    pub composite: bool,
}

impl FieldNode {
    /// Human-readable location, e.g. `renderables[0].renderables[2]`.
    pub fn path(&self) -> String {
        render_path(&self.index_path)
    }
}

fn render_path(index_path: &[usize]) -> String {
    if index_path.is_empty() {
        return "root".to_string();
    }
    index_path
        .iter()
        .map(|i| format!("{}[{}]", RENDERABLES_KEY, i))
        .collect::<Vec<_>>()
        .join(".")
}

// ============================================================================
// Walking
// ============================================================================

/// Walk every renderable below the root in document order.
///
/// Validates the whole tree up front: every node must be a mapping with
/// string `identifier` and `type`, and identifiers must be unique across the
/// definition (the root's own identifier included).
pub fn collect_nodes(
    definition: &Value,
    registry: &dyn ElementTypeRegistry,
) -> Result<Vec<FieldNode>, FieldStateError> {
    let root = definition
        .as_mapping()
        .ok_or_else(|| FieldStateError::NotAMapping("root".to_string()))?;

    let mut seen = HashSet::new();
    if let Some(Value::String(root_id)) = root.get(IDENTIFIER_KEY) {
        seen.insert(root_id.clone());
    }

    let mut nodes = Vec::new();
    walk_children(root, &mut Vec::new(), registry, &mut seen, &mut nodes)?;
    Ok(nodes)
}

/// Leaf fields only, in document order.
pub fn leaf_fields(nodes: &[FieldNode]) -> impl Iterator<Item = &FieldNode> {
    nodes.iter().filter(|n| !n.composite)
}

fn walk_children(
    parent: &Mapping,
    index_path: &mut Vec<usize>,
    registry: &dyn ElementTypeRegistry,
    seen: &mut HashSet<String>,
    out: &mut Vec<FieldNode>,
) -> Result<(), FieldStateError> {
    let children = match parent.get(RENDERABLES_KEY) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Sequence(seq)) => seq,
        Some(_) => {
            return Err(FieldStateError::InvalidAttribute {
                path: render_path(index_path),
                attribute: RENDERABLES_KEY,
                expected: "sequence",
            });
        }
    };

    for (i, child) in children.iter().enumerate() {
        index_path.push(i);
        let path = render_path(index_path);

        let node = child
            .as_mapping()
            .ok_or_else(|| FieldStateError::NotAMapping(path.clone()))?;

        let identifier = required_string(node, IDENTIFIER_KEY, &path)?;
        let element_type = required_string(node, TYPE_KEY, &path)?;
        let label = match node.get(LABEL_KEY) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };

        if !seen.insert(identifier.clone()) {
            return Err(FieldStateError::DuplicateIdentifier(identifier));
        }

        let composite = registry.is_composite(&element_type);
        out.push(FieldNode {
            index_path: index_path.clone(),
            identifier,
            element_type,
            label,
            composite,
        });

        walk_children(node, index_path, registry, seen, out)?;
        index_path.pop();
    }

    Ok(())
}

fn required_string(
    node: &Mapping,
    attribute: &'static str,
    path: &str,
) -> Result<String, FieldStateError> {
    match node.get(attribute) {
        None | Some(Value::Null) => Err(FieldStateError::MissingAttribute {
            path: path.to_string(),
            attribute,
        }),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(FieldStateError::MissingAttribute {
            path: path.to_string(),
            attribute,
        }),
        Some(_) => Err(FieldStateError::InvalidAttribute {
            path: path.to_string(),
            attribute,
            expected: "string",
        }),
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Rename the node at `index_path`. Returns false if the path does not exist.
pub fn set_identifier(definition: &mut Value, index_path: &[usize], identifier: &str) -> bool {
    let mut node = definition;
    for &i in index_path {
        node = match node
            .get_mut(RENDERABLES_KEY)
            .and_then(|children| children.get_mut(i))
        {
            Some(child) => child,
            None => return false,
        };
    }

    match node.as_mapping_mut() {
        Some(map) => {
            map.insert(
                Value::String(IDENTIFIER_KEY.to_string()),
                Value::String(identifier.to_string()),
            );
            true
        }
        None => false,
    }
}

/// The form's own identifier (root `identifier` key).
pub fn form_identifier(definition: &Value) -> Result<String, FieldStateError> {
    let root = definition
        .as_mapping()
        .ok_or_else(|| FieldStateError::NotAMapping("root".to_string()))?;
    required_string(root, IDENTIFIER_KEY, "root")
}

pub fn set_form_identifier(definition: &mut Value, identifier: &str) -> Result<(), FieldStateError> {
    let root = definition
        .as_mapping_mut()
        .ok_or_else(|| FieldStateError::NotAMapping("root".to_string()))?;
    root.insert(
        Value::String(IDENTIFIER_KEY.to_string()),
        Value::String(identifier.to_string()),
    );
    Ok(())
}
