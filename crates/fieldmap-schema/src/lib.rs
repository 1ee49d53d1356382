//! XSD reading and flattening into addressable leaf target paths.

pub mod error;
pub mod flatten;
pub mod node;
pub mod parse;

use fieldmap_model::TargetPathRecord;

pub use crate::error::{Result, SchemaError};
pub use crate::flatten::{dedup_targets, flatten_all, flatten_schema};
pub use crate::node::{
    ComplexTypeDef, ElementDecl, GroupKind, ModelGroup, SchemaDocument, SchemaNode,
};
pub use crate::parse::parse_schema;

/// Parses and flattens several named schema texts into one target list.
pub fn load_targets<'a, I>(schemas: I) -> Result<Vec<TargetPathRecord>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let docs = schemas
        .into_iter()
        .map(|(name, xml)| parse_schema(name, xml))
        .collect::<Result<Vec<_>>>()?;
    Ok(flatten_all(&docs))
}
