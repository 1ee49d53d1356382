use serde::{Deserialize, Serialize};

/// Default value for a missing `minOccurs` / `maxOccurs` attribute.
pub const DEFAULT_OCCURS: &str = "1";

/// Separator between element names in a leaf path.
pub const PATH_SEPARATOR: char = '/';

/// A leaf element of a flattened XML Schema.
///
/// `path` is unique per `(schema_name, path)` once flattening has deduplicated
/// repeated references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPathRecord {
    /// Name of the schema document the leaf was found in.
    #[serde(rename = "schema")]
    pub schema_name: String,
    /// `/`-joined element names from the root element to the leaf.
    pub path: String,
    /// Local name of the leaf element.
    #[serde(rename = "name")]
    pub leaf_name: String,
    /// Declared type name, or `simple` / `complex` when none was declared.
    #[serde(rename = "type")]
    pub declared_type: String,
    #[serde(rename = "minOccurs")]
    pub min_occurs: String,
    #[serde(rename = "maxOccurs")]
    pub max_occurs: String,
}

impl TargetPathRecord {
    /// Key used to collapse duplicate leaves across repeated references.
    pub fn dedup_key(&self) -> (&str, &str) {
        (self.schema_name.as_str(), self.path.as_str())
    }

    /// Whether the leaf may be omitted from an instance document.
    pub fn is_optional(&self) -> bool {
        self.min_occurs.trim() == "0"
    }

    /// Whether the leaf may repeat in an instance document.
    pub fn is_repeating(&self) -> bool {
        match self.max_occurs.trim() {
            "unbounded" => true,
            other => other.parse::<u64>().is_ok_and(|max| max > 1),
        }
    }
}

/// Returns the last path segment (the leaf element name) of a target path.
pub fn leaf_of(path: &str) -> &str {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path)
}

/// Returns the target paths in list order.
pub fn target_paths(targets: &[TargetPathRecord]) -> Vec<String> {
    targets.iter().map(|t| t.path.clone()).collect()
}
