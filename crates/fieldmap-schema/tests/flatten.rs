use fieldmap_model::TargetPathRecord;
use fieldmap_schema::{flatten_all, flatten_schema, load_targets, parse_schema};
use proptest::prelude::*;

const PERSON_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="person" type="PersonType"/>
  <xs:complexType name="PersonType">
    <xs:sequence>
      <xs:element name="FirstName" type="xs:string"/>
      <xs:element name="LastName" type="xs:string"/>
      <xs:element name="Address" type="AddressType" minOccurs="0" maxOccurs="unbounded"/>
      <xs:element ref="Note"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="AddressType">
    <xs:sequence>
      <xs:element name="Street"/>
      <xs:choice>
        <xs:element name="Zip" type="xs:string"/>
        <xs:element name="PostCode" type="xs:string"/>
      </xs:choice>
    </xs:sequence>
  </xs:complexType>
  <xs:element name="Note" type="xs:string"/>
</xs:schema>"#;

fn paths(records: &[TargetPathRecord]) -> Vec<&str> {
    records.iter().map(|r| r.path.as_str()).collect()
}

fn flatten(name: &str, xml: &str) -> Vec<TargetPathRecord> {
    flatten_schema(&parse_schema(name, xml).expect("parse schema"))
}

#[test]
fn person_schema_flattens_to_leaves() {
    let records = flatten("person.xsd", PERSON_XSD);
    insta::assert_snapshot!(paths(&records).join("\n"), @r"
    person/FirstName
    person/LastName
    person/Address/Street
    person/Address/Zip
    person/Address/PostCode
    person/Note
    Note
    ");
}

#[test]
fn leaf_records_carry_types_and_occurrences() {
    let records = flatten("person.xsd", PERSON_XSD);
    let first = &records[0];
    assert_eq!(first.schema_name, "person.xsd");
    assert_eq!(first.leaf_name, "FirstName");
    assert_eq!(first.declared_type, "string");
    assert_eq!(first.min_occurs, "1");
    assert_eq!(first.max_occurs, "1");

    let street = records
        .iter()
        .find(|r| r.path == "person/Address/Street")
        .expect("street leaf");
    assert_eq!(street.declared_type, "simple");

    let note = records.iter().find(|r| r.path == "person/Note").expect("ref leaf");
    assert_eq!(note.leaf_name, "Note");
    assert_eq!(note.declared_type, "string");
}

#[test]
fn complex_type_without_children_is_a_complex_leaf() {
    let xml = r#"<xs:schema xmlns:xs="x">
      <xs:element name="Root">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="Empty"><xs:complexType/></xs:element>
            <xs:element name="Two">
              <xs:complexType>
                <xs:sequence><xs:element name="a"/></xs:sequence>
                <xs:sequence><xs:element name="b"/></xs:sequence>
              </xs:complexType>
            </xs:element>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
    </xs:schema>"#;
    let records = flatten("c.xsd", xml);
    assert_eq!(paths(&records), vec!["Root/Empty", "Root/Two"]);
    assert!(records.iter().all(|r| r.declared_type == "complex"));
}

#[test]
fn nested_groups_are_descended() {
    let xml = r#"<xsd:schema xmlns:xsd="x">
      <xsd:element name="Order">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:element name="Id"/>
            <xsd:choice>
              <xsd:element name="Card"/>
              <xsd:sequence><xsd:element name="Iban"/><xsd:element name="Bic"/></xsd:sequence>
            </xsd:choice>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
    </xsd:schema>"#;
    let records = flatten("o.xsd", xml);
    assert_eq!(
        paths(&records),
        vec!["Order/Id", "Order/Card", "Order/Iban", "Order/Bic"]
    );
}

#[test]
fn recursive_types_are_cut() {
    let xml = r#"<xs:schema xmlns:xs="x">
      <xs:element name="Tree" type="NodeType"/>
      <xs:complexType name="NodeType">
        <xs:sequence>
          <xs:element name="Label" type="xs:string"/>
          <xs:element name="Child" type="NodeType" minOccurs="0"/>
        </xs:sequence>
      </xs:complexType>
    </xs:schema>"#;
    let records = flatten("tree.xsd", xml);
    assert_eq!(paths(&records), vec!["Tree/Label", "Tree/Child"]);
    assert_eq!(records[1].declared_type, "NodeType");
    assert_eq!(records[1].min_occurs, "0");
}

#[test]
fn invalid_occurrences_default_to_one() {
    let xml = r#"<xs:schema xmlns:xs="x">
      <xs:element name="A" minOccurs="many" maxOccurs="-2"/>
      <xs:element name="B" minOccurs=" 0 " maxOccurs="unbounded"/>
    </xs:schema>"#;
    let records = flatten("occ.xsd", xml);
    assert_eq!(records[0].min_occurs, "1");
    assert_eq!(records[0].max_occurs, "1");
    assert_eq!(records[1].min_occurs, "0");
    assert_eq!(records[1].max_occurs, "unbounded");
}

#[test]
fn anonymous_elements_get_placeholder_name() {
    let records = flatten("anon.xsd", r#"<schema><element type="xs:int"/></schema>"#);
    assert_eq!(paths(&records), vec!["(anon)"]);
    assert_eq!(records[0].declared_type, "int");
}

#[test]
fn schema_without_elements_is_empty() {
    let records = flatten(
        "types.xsd",
        r#"<xs:schema xmlns:xs="x"><xs:complexType name="T"/></xs:schema>"#,
    );
    assert!(records.is_empty());
}

#[test]
fn duplicates_collapse_per_schema_only() {
    let xml = r#"<xs:schema xmlns:xs="x">
      <xs:element name="A"/><xs:element name="A"/>
    </xs:schema>"#;
    let targets = load_targets([("one.xsd", xml), ("two.xsd", xml)]).expect("load");
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].schema_name, "one.xsd");
    assert_eq!(targets[1].schema_name, "two.xsd");
}

fn schema_with_children(names: &[String]) -> String {
    let children: String = names
        .iter()
        .map(|n| format!(r#"<xs:element name="{n}" type="xs:string"/>"#))
        .collect();
    format!(
        r#"<xs:schema xmlns:xs="x"><xs:element name="Root"><xs:complexType><xs:sequence>{children}</xs:sequence></xs:complexType></xs:element></xs:schema>"#
    )
}

proptest! {
    #[test]
    fn prop_flattened_paths_are_unique(
        names in prop::collection::vec("[A-C][a-c]{0,2}", 1..12),
    ) {
        let xml = schema_with_children(&names);
        let doc = parse_schema("gen.xsd", &xml).expect("parse generated schema");
        let records = flatten_all(std::slice::from_ref(&doc));

        let mut keys: Vec<_> = records.iter().map(|r| (r.schema_name.clone(), r.path.clone())).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), total);

        let mut distinct = names.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(records.len(), distinct.len());
        prop_assert_eq!(&records[0].leaf_name, &names[0]);
    }
}
