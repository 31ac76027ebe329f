use serde_yaml::Value;

/// Contact form: one page, five leaf fields, one fieldset holding a sixth.
pub const CONTACT_FORM: &str = r#"
identifier: contact
type: Form
label: Contact
prototypeName: standard
renderables:
  - identifier: page-1
    type: Page
    label: Step
    renderables:
      - identifier: text-1
        type: Text
        label: Name
      - identifier: email-1
        type: Email
        label: E-Mail
        properties:
          fluidAdditionalAttributes:
            required: required
      - identifier: text-2
        type: Text
        label: Company
      - identifier: textarea-1
        type: Textarea
        label: Message
      - identifier: fieldset-1
        type: Fieldset
        label: Address
        renderables:
          - identifier: text-3
            type: Text
            label: Street
      - identifier: checkbox-1
        type: Checkbox
        label: Privacy
"#;

pub fn contact_form() -> Value {
    parse(CONTACT_FORM)
}

pub fn parse(yaml: &str) -> Value {
    serde_yaml::from_str(yaml).expect("fixture must be valid YAML")
}

/// Leaf field identifiers on the first page, in document order, one level of
/// containers flattened.
pub fn page_field_ids(definition: &Value) -> Vec<String> {
    let mut ids = Vec::new();
    for field in definition["renderables"][0]["renderables"].as_sequence().unwrap() {
        if let Some(children) = field.get("renderables").and_then(Value::as_sequence) {
            for child in children {
                ids.push(child["identifier"].as_str().unwrap().to_string());
            }
        } else {
            ids.push(field["identifier"].as_str().unwrap().to_string());
        }
    }
    ids
}

/// Remove the field with `identifier` from the first page.
pub fn remove_field(definition: &mut Value, identifier: &str) {
    let fields = definition["renderables"][0]["renderables"]
        .as_sequence_mut()
        .unwrap();
    fields.retain(|f| f["identifier"].as_str() != Some(identifier));
}

/// Append a field to the first page.
pub fn append_field(definition: &mut Value, identifier: &str, element_type: &str, label: &str) {
    let field = parse(&format!(
        "identifier: {}\ntype: {}\nlabel: {}\n",
        identifier, element_type, label
    ));
    definition["renderables"][0]["renderables"]
        .as_sequence_mut()
        .unwrap()
        .push(field);
}
