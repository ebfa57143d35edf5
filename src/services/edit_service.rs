//! Content edit form state.
//!
//! Pulls the editable text out of the page document, tracks edited values,
//! and builds the [`ChangeRequest`] sent to the site maintainer.

use crate::content;
use crate::services::notification_service::{Change, ChangeRequest};
use log::warn;
use serde_json::Value;
use std::collections::HashMap;

/// Display name of each section, keyed by component type.
fn section_name(component_type: &str) -> &str {
    match component_type {
        "carouselHero" => "Hero Banner",
        "experienceCard" => "About Section",
        "textAndList" => "Features Section",
        "featureBoxes" => "Services Section",
        "accordion" => "FAQ Section",
        "gridCarousel" => "Gallery Section",
        "testimonials3" => "Testimonials Section",
        "contactCloser" => "Contact Section",
        other => other,
    }
}

/// A single text input of the edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableField {
    /// Unique form key, e.g. `hero-item-0-description`.
    pub key: String,
    pub section_number: usize,
    pub section: String,
    pub label: String,
    /// Dotted path below the component props, e.g. `items.0.description`.
    pub field_path: String,
    pub original: String,
    component_index: usize,
}

impl EditableField {
    /// JSON pointer of this field inside the page document.
    fn pointer(&self) -> String {
        format!(
            "/pages/0/components/{}/props/{}",
            self.component_index,
            self.field_path.replace('.', "/")
        )
    }
}

/// Collects fields of one component.
struct FieldCollector<'a> {
    component_id: &'a str,
    component_index: usize,
    section: &'a str,
    section_number: usize,
    fields: Vec<EditableField>,
}

impl FieldCollector<'_> {
    fn push(&mut self, value: Option<&Value>, key_suffix: String, label: String, path: String) {
        let Some(text) = value.and_then(Value::as_str).filter(|t| !t.is_empty()) else {
            return;
        };
        self.fields.push(EditableField {
            key: format!("{}-{}", self.component_id, key_suffix),
            section_number: self.section_number,
            section: self.section.to_string(),
            label,
            field_path: path,
            original: text.to_string(),
            component_index: self.component_index,
        });
    }

    fn push_prop(&mut self, props: &Value, prop: &str, label: &str) {
        self.push(
            props.get(prop),
            prop.to_string(),
            label.to_string(),
            prop.to_string(),
        );
    }

    /// Pushes `props[list][n][prop]` for every entry of the list.
    fn push_list<F>(
        &mut self,
        props: &Value,
        list: &str,
        key_name: &str,
        entry_props: &[&str],
        label: F,
    ) where
        F: Fn(usize, &str) -> String,
    {
        let Some(entries) = props.get(list).and_then(Value::as_array) else {
            return;
        };
        for (i, entry) in entries.iter().enumerate() {
            for &prop in entry_props {
                self.push(
                    entry.get(prop),
                    format!("{}-{}-{}", key_name, i, prop),
                    label(i + 1, prop),
                    format!("{}.{}.{}", list, i, prop),
                );
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extracts every editable field of the page document, in page order.
pub fn extract_fields(document: &Value) -> Vec<EditableField> {
    let Some(components) = content::components(document) else {
        warn!("Page document has no components to edit");
        return Vec::new();
    };

    let mut fields = Vec::new();
    let mut section_number = 1;

    for (component_index, component) in components.iter().enumerate() {
        let component_type = component
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let component_id = component
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(component_type);
        let Some(props) = component.get("props") else {
            continue;
        };
        let section = section_name(component_type);

        let mut collector = FieldCollector {
            component_id,
            component_index,
            section,
            section_number,
            fields: Vec::new(),
        };

        collector.push_prop(props, "title", "Title");
        collector.push_prop(props, "subTitle", "Subtitle");
        collector.push_prop(props, "description", "Description");
        collector.push_prop(props, "buttonText", "Button Text");
        collector.push_list(props, "items", "item", &["description"], |n, _| {
            format!("Image {} Description", n)
        });
        collector.push_list(props, "array", "array", &["title", "description"], |n, prop| {
            format!("{} Item {} - {}", section, n, capitalize(prop))
        });
        collector.push_list(
            props,
            "textArray",
            "textArray",
            &["title", "description"],
            |n, prop| format!("Feature {} - {}", n, capitalize(prop)),
        );
        collector.push_list(
            props,
            "testimonials",
            "testimonial",
            &["quote", "name", "role"],
            |n, prop| format!("Testimonial {} - {}", n, capitalize(prop)),
        );
        collector.push_prop(props, "email", "Email");
        collector.push_prop(props, "phone", "Phone");

        if !collector.fields.is_empty() {
            fields.append(&mut collector.fields);
            section_number += 1;
        }
    }

    fields
}

/// Edited values layered over the page document.
pub struct EditForm {
    document: Value,
    fields: Vec<EditableField>,
    values: HashMap<String, String>,
}

impl EditForm {
    pub fn new(document: Value) -> Self {
        let fields = extract_fields(&document);
        let values = fields
            .iter()
            .map(|f| (f.key.clone(), f.original.clone()))
            .collect();
        Self {
            document,
            fields,
            values,
        }
    }

    pub fn fields(&self) -> &[EditableField] {
        &self.fields
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Records a new value for `key`. Unknown keys are ignored.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => {
                warn!("Ignoring edit of unknown field {}", key);
                false
            }
        }
    }

    /// Puts every field back to its original text.
    pub fn reset(&mut self) {
        for field in &self.fields {
            self.values.insert(field.key.clone(), field.original.clone());
        }
    }

    /// Fields whose value differs from the original, in form order.
    pub fn changes(&self) -> Vec<Change> {
        self.fields
            .iter()
            .filter_map(|field| {
                let value = self.values.get(&field.key)?;
                (*value != field.original).then(|| Change {
                    section: field.section.clone(),
                    field: field.label.clone(),
                    old_value: field.original.clone(),
                    new_value: value.clone(),
                })
            })
            .collect()
    }

    /// Builds the submission: a copy of the document with every edit applied.
    pub fn build_request(&self) -> ChangeRequest {
        let mut updated = self.document.clone();

        for field in &self.fields {
            let Some(value) = self.values.get(&field.key) else {
                continue;
            };
            if *value == field.original {
                continue;
            }
            match updated.pointer_mut(&field.pointer()) {
                Some(slot) => *slot = Value::String(value.clone()),
                None => warn!("Skipping edit of missing path {}", field.field_path),
            }
        }

        ChangeRequest {
            updated_data: updated,
            original_data: self.document.clone(),
            changes: self.changes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "pages": [{ "components": [
                {
                    "id": "hero",
                    "type": "carouselHero",
                    "props": {
                        "title": "Attention to Detail",
                        "subTitle": "",
                        "items": [
                            { "image": { "src": "a.jpg" }, "description": "Pet friendly" },
                            { "image": { "src": "b.jpg" } }
                        ]
                    }
                },
                { "id": "spacer", "type": "divider", "props": {} },
                {
                    "id": "faq",
                    "type": "accordion",
                    "props": {
                        "array": [{ "title": "What areas?", "description": "Halifax" }]
                    }
                },
                {
                    "id": "testimonials",
                    "type": "testimonials3",
                    "props": {
                        "testimonials": [{ "quote": "Great", "name": "Sarah L.", "role": "Homeowner" }]
                    }
                },
                {
                    "id": "contact",
                    "type": "contactCloser",
                    "props": { "email": "btq@example.com", "phone": "902-220-1089" }
                }
            ] }]
        })
    }

    fn keys(fields: &[EditableField]) -> Vec<&str> {
        fields.iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn extracts_non_empty_text_in_page_order() {
        let fields = extract_fields(&document());
        assert_eq!(
            keys(&fields),
            vec![
                "hero-title",
                "hero-item-0-description",
                "faq-array-0-title",
                "faq-array-0-description",
                "testimonials-testimonial-0-quote",
                "testimonials-testimonial-0-name",
                "testimonials-testimonial-0-role",
                "contact-email",
                "contact-phone",
            ]
        );
    }

    #[test]
    fn labels_and_sections_follow_component_type() {
        let fields = extract_fields(&document());
        assert_eq!(fields[1].label, "Image 1 Description");
        assert_eq!(fields[1].field_path, "items.0.description");
        assert_eq!(fields[2].label, "FAQ Section Item 1 - Title");
        assert_eq!(fields[4].label, "Testimonial 1 - Quote");
        assert_eq!(fields[0].section, "Hero Banner");
        assert_eq!(fields[7].section, "Contact Section");
    }

    #[test]
    fn sections_without_fields_are_not_numbered() {
        let fields = extract_fields(&document());
        assert_eq!(fields[0].section_number, 1);
        assert_eq!(fields[2].section_number, 2);
        assert_eq!(fields[8].section_number, 4);
    }

    #[test]
    fn untouched_form_has_no_changes() {
        let form = EditForm::new(document());
        assert!(form.changes().is_empty());
        let request = form.build_request();
        assert_eq!(request.updated_data, request.original_data);
    }

    #[test]
    fn edits_are_reported_and_written_into_the_copy() {
        let mut form = EditForm::new(document());
        assert!(form.set_value("hero-item-0-description", "Pets welcome"));
        assert!(form.set_value("contact-phone", "902-555-0100"));

        let request = form.build_request();
        assert_eq!(request.changes.len(), 2);
        assert_eq!(request.changes[0].section, "Hero Banner");
        assert_eq!(request.changes[0].field, "Image 1 Description");
        assert_eq!(request.changes[0].old_value, "Pet friendly");
        assert_eq!(request.changes[0].new_value, "Pets welcome");

        let components = &request.updated_data["pages"][0]["components"];
        assert_eq!(components[0]["props"]["items"][0]["description"], "Pets welcome");
        assert_eq!(components[4]["props"]["phone"], "902-555-0100");
        assert_eq!(
            request.original_data["pages"][0]["components"][4]["props"]["phone"],
            "902-220-1089"
        );
    }

    #[test]
    fn reverting_an_edit_removes_the_change() {
        let mut form = EditForm::new(document());
        form.set_value("hero-title", "New title");
        form.set_value("hero-title", "Attention to Detail");
        assert!(form.changes().is_empty());

        form.set_value("hero-title", "New title");
        form.reset();
        assert_eq!(form.value("hero-title"), Some("Attention to Detail"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut form = EditForm::new(document());
        assert!(!form.set_value("nope", "x"));
        assert_eq!(form.value("nope"), None);
    }

    #[test]
    fn shipped_content_is_editable() {
        let form = EditForm::new(content::default_site_content());
        assert!(form.fields().iter().any(|f| f.key == "gallery-title"));
        assert!(form.fields().iter().any(|f| f.key == "features-textArray-0-title"));
    }
}
