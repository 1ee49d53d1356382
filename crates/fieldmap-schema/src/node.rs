//! Structural model of the XSD constructs the flattener understands.
//!
//! Only element declarations, complex types and model groups are kept.
//! Attributes, facets, annotations and simple types are dropped while
//! reading.

/// Kind of a model group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Sequence,
    Choice,
    All,
}

impl GroupKind {
    pub fn from_local_name(name: &str) -> Option<Self> {
        match name {
            "sequence" => Some(Self::Sequence),
            "choice" => Some(Self::Choice),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Element(ElementDecl),
    ComplexType(ComplexTypeDef),
    Group(ModelGroup),
}

impl SchemaNode {
    /// Structural children in document order.
    pub fn children(&self) -> &[SchemaNode] {
        match self {
            Self::Element(element) => &element.content,
            Self::ComplexType(complex) => &complex.content,
            Self::Group(group) => &group.content,
        }
    }

    pub fn as_element(&self) -> Option<&ElementDecl> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_complex_type(&self) -> Option<&ComplexTypeDef> {
        match self {
            Self::ComplexType(complex) => Some(complex),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&ModelGroup> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }
}

/// An `element` declaration. Attribute values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementDecl {
    pub name: Option<String>,
    pub reference: Option<String>,
    pub type_name: Option<String>,
    pub min_occurs: Option<String>,
    pub max_occurs: Option<String>,
    /// Inline `complexType` definitions, at most one in a valid schema.
    pub content: Vec<SchemaNode>,
}

impl ElementDecl {
    pub fn inline_type(&self) -> Option<&ComplexTypeDef> {
        self.content.iter().find_map(SchemaNode::as_complex_type)
    }

    /// Local part of the `type` attribute.
    pub fn type_local_name(&self) -> Option<&str> {
        self.type_name.as_deref().map(local_part)
    }

    /// Local part of the `ref` attribute.
    pub fn reference_local_name(&self) -> Option<&str> {
        self.reference.as_deref().map(local_part)
    }
}

/// A `complexType`, named at the top level or anonymous inside an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexTypeDef {
    pub name: Option<String>,
    /// Model groups directly under the type.
    pub content: Vec<SchemaNode>,
}

impl ComplexTypeDef {
    pub fn groups(&self) -> impl Iterator<Item = &ModelGroup> {
        self.content.iter().filter_map(SchemaNode::as_group)
    }

    /// The single model group of the type, or `None` when it has zero or
    /// several sibling groups.
    pub fn model_group(&self) -> Option<&ModelGroup> {
        let mut groups = self.groups();
        let first = groups.next()?;
        match groups.next() {
            Some(_) => None,
            None => Some(first),
        }
    }
}

/// A `sequence`, `choice` or `all` group.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroup {
    pub kind: GroupKind,
    /// Element declarations and nested groups in document order.
    pub content: Vec<SchemaNode>,
}

impl ModelGroup {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            content: Vec::new(),
        }
    }

    /// Element declarations of the group, descending into nested groups.
    pub fn element_decls(&self) -> Vec<&ElementDecl> {
        let mut out = Vec::new();
        collect_elements(&self.content, &mut out);
        out
    }
}

fn collect_elements<'a>(nodes: &'a [SchemaNode], out: &mut Vec<&'a ElementDecl>) {
    for node in nodes {
        match node {
            SchemaNode::Element(element) => out.push(element),
            SchemaNode::Group(group) => collect_elements(&group.content, out),
            SchemaNode::ComplexType(_) => {}
        }
    }
}

/// A parsed schema document: its top-level elements and named complex types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    pub name: String,
    pub elements: Vec<ElementDecl>,
    pub complex_types: Vec<ComplexTypeDef>,
}

impl SchemaDocument {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Named complex type by local name.
    pub fn complex_type(&self, local_name: &str) -> Option<&ComplexTypeDef> {
        self.complex_types
            .iter()
            .find(|ct| ct.name.as_deref().map(local_part) == Some(local_name))
    }

    /// Top-level element by local name.
    pub fn element(&self, local_name: &str) -> Option<&ElementDecl> {
        self.elements
            .iter()
            .find(|el| el.name.as_deref() == Some(local_name))
    }
}

/// Strips a namespace prefix: `xs:string` becomes `string`.
pub fn local_part(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str) -> SchemaNode {
        SchemaNode::Element(ElementDecl {
            name: Some(name.to_string()),
            ..ElementDecl::default()
        })
    }

    #[test]
    fn nested_groups_are_flattened_in_document_order() {
        let mut inner = ModelGroup::new(GroupKind::Choice);
        inner.content = vec![element("b"), element("c")];
        let mut outer = ModelGroup::new(GroupKind::Sequence);
        outer.content = vec![element("a"), SchemaNode::Group(inner), element("d")];
        let names: Vec<_> = outer
            .element_decls()
            .into_iter()
            .filter_map(|e| e.name.as_deref())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn model_group_requires_exactly_one_group() {
        let mut ct = ComplexTypeDef::default();
        assert!(ct.model_group().is_none());
        ct.content.push(SchemaNode::Group(ModelGroup::new(GroupKind::All)));
        assert_eq!(ct.model_group().map(|g| g.kind), Some(GroupKind::All));
        ct.content
            .push(SchemaNode::Group(ModelGroup::new(GroupKind::Sequence)));
        assert!(ct.model_group().is_none());
    }

    #[test]
    fn local_part_strips_prefix() {
        assert_eq!(local_part("xs:string"), "string");
        assert_eq!(local_part("tns:Address"), "Address");
        assert_eq!(local_part("Plain"), "Plain");
    }

    #[test]
    fn children_follow_variant() {
        let node = SchemaNode::Group(ModelGroup {
            kind: GroupKind::Sequence,
            content: vec![element("x")],
        });
        assert_eq!(node.children().len(), 1);
        assert!(node.children()[0].as_element().is_some());
    }
}
