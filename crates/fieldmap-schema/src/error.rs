#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("malformed XML in schema {schema}: {source}")]
    Xml {
        schema: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute in schema {schema}: {source}")]
    Attribute {
        schema: String,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    #[error("invalid escape in schema {schema}: {source}")]
    Escape {
        schema: String,
        #[source]
        source: quick_xml::escape::EscapeError,
    },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
