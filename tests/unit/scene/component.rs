use super::*;
use serde_json::json;

fn doc(value: Value) -> AigenDocument {
    AigenDocument::from_value(value).unwrap()
}

#[test]
fn builds_table_by_id() {
    let d = doc(json!({
        "components": [
            {"id": "glow", "properties": {"Opacity": 80}},
            {"id": "bare"}
        ]
    }));
    let mut diags = Diagnostics::new();
    let table = ComponentTable::from_document(&d, &mut diags);

    assert!(diags.is_empty());
    assert_eq!(table.len(), 2);
    assert_eq!(table.properties("glow").unwrap(), &json!({"Opacity": 80}));
    assert_eq!(table.properties("bare").unwrap(), &json!({}));
    assert!(table.properties("ghost").is_none());
}

#[test]
fn skips_entries_without_id() {
    let d = doc(json!({
        "components": [
            {"properties": {"a": 1}},
            {"id": 7, "properties": {"a": 2}},
            {"id": "ok", "properties": {"a": 3}}
        ]
    }));
    let mut diags = Diagnostics::new();
    let table = ComponentTable::from_document(&d, &mut diags);

    assert_eq!(table.len(), 1);
    assert_eq!(diags.count(DiagnosticKind::MissingComponentId), 2);
    let paths: Vec<String> = diags.iter().map(|x| x.path.to_string()).collect();
    assert_eq!(paths, vec!["$.components[0]", "$.components[1]"]);
}

#[test]
fn duplicate_id_last_definition_wins() {
    let d = doc(json!({
        "components": [
            {"id": "c", "properties": {"v": 1}},
            {"id": "c", "properties": {"v": 2}}
        ]
    }));
    let mut diags = Diagnostics::new();
    let table = ComponentTable::from_document(&d, &mut diags);

    assert_eq!(table.properties("c").unwrap(), &json!({"v": 2}));
    assert_eq!(diags.count(DiagnosticKind::DuplicateComponent), 1);
}

#[test]
fn absent_or_malformed_components_give_empty_table() {
    let mut diags = Diagnostics::new();
    assert!(ComponentTable::from_document(&doc(json!({})), &mut diags).is_empty());
    assert!(diags.is_empty());

    let table = ComponentTable::from_document(&doc(json!({"components": {"id": "x"}})), &mut diags);
    assert!(table.is_empty());
    assert_eq!(diags.count(DiagnosticKind::MalformedContainer), 1);
}
