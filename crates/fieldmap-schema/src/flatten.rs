//! Flattening of schema documents into leaf target paths.

use std::collections::HashSet;

use fieldmap_model::{DEFAULT_OCCURS, PATH_SEPARATOR, TargetPathRecord};
use tracing::{debug, info, warn};

use crate::node::{ComplexTypeDef, ElementDecl, ModelGroup, SchemaDocument};

/// Name used for an element with neither `name` nor `ref`.
pub const ANONYMOUS_ELEMENT: &str = "(anon)";

/// Leaf type recorded when a complex type was resolved but no type name declared.
pub const COMPLEX_TYPE_LABEL: &str = "complex";

/// Leaf type recorded when nothing was declared or resolved.
pub const SIMPLE_TYPE_LABEL: &str = "simple";

/// Flattens every top-level element of one document, depth-first and
/// left-to-right, deduplicated by `(schema, path)`.
pub fn flatten_schema(doc: &SchemaDocument) -> Vec<TargetPathRecord> {
    let mut walker = Walker {
        doc,
        records: Vec::new(),
        active: Vec::new(),
    };
    for element in &doc.elements {
        walker.walk(element, "");
    }
    let records = dedup_targets(walker.records);
    info!(schema = %doc.name, leaves = records.len(), "flattened schema");
    records
}

/// Flattens several documents in order into one deduplicated list.
pub fn flatten_all(docs: &[SchemaDocument]) -> Vec<TargetPathRecord> {
    dedup_targets(docs.iter().flat_map(flatten_schema).collect())
}

/// Keeps the first record for every `(schema, path)` pair.
pub fn dedup_targets(records: Vec<TargetPathRecord>) -> Vec<TargetPathRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert((record.schema_name.clone(), record.path.clone())))
        .collect()
}

struct Walker<'a> {
    doc: &'a SchemaDocument,
    records: Vec<TargetPathRecord>,
    /// Complex types currently being expanded on the path from the root.
    active: Vec<&'a ComplexTypeDef>,
}

impl<'a> Walker<'a> {
    fn walk(&mut self, element: &'a ElementDecl, prefix: &str) {
        let doc = self.doc;
        let referenced = element
            .reference_local_name()
            .and_then(|local| doc.element(local));

        let name = element
            .name
            .clone()
            .or_else(|| element.reference_local_name().map(str::to_string))
            .unwrap_or_else(|| ANONYMOUS_ELEMENT.to_string());
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}{PATH_SEPARATOR}{name}")
        };

        let type_name = element
            .type_local_name()
            .or_else(|| referenced.and_then(ElementDecl::type_local_name));
        let complex = element
            .inline_type()
            .or_else(|| referenced.and_then(ElementDecl::inline_type))
            .or_else(|| type_name.and_then(|t| doc.complex_type(t)));

        let Some(complex) = complex else {
            self.emit(element, path, name, type_name.unwrap_or(SIMPLE_TYPE_LABEL));
            return;
        };
        let leaf_type = type_name.unwrap_or(COMPLEX_TYPE_LABEL);

        if self.active.iter().any(|open| std::ptr::eq(*open, complex)) {
            debug!(schema = %doc.name, path = %path, "recursive type reference cut");
            self.emit(element, path, name, leaf_type);
            return;
        }

        let children = complex
            .model_group()
            .map(ModelGroup::element_decls)
            .unwrap_or_default();
        if children.is_empty() {
            self.emit(element, path, name, leaf_type);
            return;
        }

        self.active.push(complex);
        for child in children {
            self.walk(child, &path);
        }
        self.active.pop();
    }

    fn emit(&mut self, element: &ElementDecl, path: String, name: String, type_label: &str) {
        let min_occurs = self.occurs(&path, "minOccurs", element.min_occurs.as_deref(), false);
        let max_occurs = self.occurs(&path, "maxOccurs", element.max_occurs.as_deref(), true);
        self.records.push(TargetPathRecord {
            schema_name: self.doc.name.clone(),
            path,
            leaf_name: name,
            declared_type: type_label.to_string(),
            min_occurs,
            max_occurs,
        });
    }

    fn occurs(&self, path: &str, attribute: &str, raw: Option<&str>, unbounded: bool) -> String {
        let Some(raw) = raw else {
            return DEFAULT_OCCURS.to_string();
        };
        let value = raw.trim();
        if value.parse::<u64>().is_ok() || (unbounded && value == "unbounded") {
            value.to_string()
        } else {
            warn!(
                schema = %self.doc.name,
                path,
                attribute,
                value = raw,
                "invalid occurrence attribute, using default"
            );
            DEFAULT_OCCURS.to_string()
        }
    }
}
