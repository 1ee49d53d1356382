//! XSD text to [`SchemaDocument`] using a streaming quick-xml reader.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::node::{ComplexTypeDef, ElementDecl, GroupKind, ModelGroup, SchemaDocument, SchemaNode};

/// Open element on the reader stack.
enum Frame {
    Schema,
    Element(ElementDecl),
    ComplexType(ComplexTypeDef),
    Group(ModelGroup),
    /// Anything the flattener ignores, together with its whole subtree.
    Skip,
}

/// Reads one XSD document.
///
/// Prefixes are ignored, so `xs:`, `xsd:` and unprefixed schemas read the
/// same. A document whose root is not `schema` yields an empty document.
pub fn parse_schema(name: &str, xml: &str) -> Result<SchemaDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = SchemaDocument::empty(name);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_seen = false;

    loop {
        let event = reader.read_event().map_err(|source| SchemaError::Xml {
            schema: name.to_string(),
            source,
        })?;
        match event {
            Event::Start(start) => {
                if !root_seen {
                    root_seen = true;
                    if !is_schema_root(&start) {
                        debug!(schema = name, "root element is not a schema");
                        return Ok(doc);
                    }
                    stack.push(Frame::Schema);
                    continue;
                }
                let frame = open_frame(name, stack.last(), &start)?;
                stack.push(frame);
            }
            Event::Empty(start) => {
                if !root_seen {
                    debug!(schema = name, "empty root element");
                    return Ok(doc);
                }
                let frame = open_frame(name, stack.last(), &start)?;
                close_frame(&mut doc, &mut stack, frame);
            }
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    close_frame(&mut doc, &mut stack, frame);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(
        schema = name,
        elements = doc.elements.len(),
        complex_types = doc.complex_types.len(),
        "parsed schema document"
    );
    Ok(doc)
}

fn is_schema_root(start: &BytesStart<'_>) -> bool {
    start.local_name().as_ref() == b"schema"
}

fn open_frame(schema: &str, parent: Option<&Frame>, start: &BytesStart<'_>) -> Result<Frame> {
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let group_kind = GroupKind::from_local_name(&local);

    let frame = match (parent, local.as_str()) {
        (Some(Frame::Schema | Frame::Group(_)), "element") => {
            let mut attrs = read_attributes(schema, start)?;
            Frame::Element(ElementDecl {
                name: attrs.remove("name"),
                reference: attrs.remove("ref"),
                type_name: attrs.remove("type"),
                min_occurs: attrs.remove("minOccurs"),
                max_occurs: attrs.remove("maxOccurs"),
                content: Vec::new(),
            })
        }
        (Some(Frame::Schema | Frame::Element(_)), "complexType") => {
            let mut attrs = read_attributes(schema, start)?;
            Frame::ComplexType(ComplexTypeDef {
                name: attrs.remove("name"),
                content: Vec::new(),
            })
        }
        (Some(Frame::ComplexType(_) | Frame::Group(_)), _) => match group_kind {
            Some(kind) => Frame::Group(ModelGroup::new(kind)),
            None => Frame::Skip,
        },
        _ => Frame::Skip,
    };
    Ok(frame)
}

fn close_frame(doc: &mut SchemaDocument, stack: &mut [Frame], frame: Frame) {
    let node = match frame {
        Frame::Element(element) => SchemaNode::Element(element),
        Frame::ComplexType(complex) => SchemaNode::ComplexType(complex),
        Frame::Group(group) => SchemaNode::Group(group),
        Frame::Schema | Frame::Skip => return,
    };
    match stack.last_mut() {
        Some(Frame::Schema) => match node {
            SchemaNode::Element(element) => doc.elements.push(element),
            SchemaNode::ComplexType(complex) if complex.name.is_some() => {
                doc.complex_types.push(complex);
            }
            _ => {}
        },
        Some(Frame::Element(element)) => element.content.push(node),
        Some(Frame::ComplexType(complex)) => complex.content.push(node),
        Some(Frame::Group(group)) => group.content.push(node),
        Some(Frame::Skip) | None => {}
    }
}

fn read_attributes(schema: &str, start: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|source| SchemaError::Attribute {
            schema: schema.to_string(),
            source,
        })?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).map_err(|source| SchemaError::Escape {
            schema: schema.to_string(),
            source,
        })?;
        attrs.insert(key, value.into_owned());
    }
    Ok(attrs)
}
