//! JSON shape of expansion results, as printed by `member-synth --format json`.

#![cfg(feature = "serde")]

use member_synth::{expand_source, Diagnostic, ExpandedSource, Macro, NamingStrategy, RenderOptions};
use serde_json::json;

#[test]
fn test_diagnostic_json() {
    let expanded = expand_source(
        "@PublicInit\nstruct State {\n    var id = makeId()\n}",
        &RenderOptions::default(),
    )
    .unwrap();
    let value = serde_json::to_value(&expanded.diagnostics[0]).unwrap();

    assert_eq!(value["kind"], json!("NotInferableType"));
    assert_eq!(value["message"], json!("Failed to infer the Type"));
    assert_eq!(value["severity"], json!("Error"));
    assert_eq!(value["anchor"]["line"], json!(3));
    assert_eq!(value["anchor"]["column"], json!(9));
    assert_eq!(value["fix_it"]["message"], json!("Specify Type instead"));
    assert_eq!(value["fix_it"]["edit"]["replacement"], json!("id: <#Type#>"));
}

#[test]
fn test_expanded_source_survives_json() {
    let expanded = expand_source("@PublicInit\nenum E {}", &RenderOptions::default()).unwrap();
    let text = serde_json::to_string(&expanded).unwrap();
    let back: ExpandedSource = serde_json::from_str(&text).unwrap();
    assert_eq!(back, expanded);

    let diag: Diagnostic = serde_json::from_value(serde_json::to_value(&back.diagnostics[0]).unwrap()).unwrap();
    assert_eq!(diag.to_string(), "1:1: error: '@PublicInit' can only be applied to a Struct or Class (fix-it: Remove '@PublicInit')");
}

#[test]
fn test_macro_json() {
    assert_eq!(
        serde_json::to_value(Macro::CodingKeys(NamingStrategy::SnakeCase)).unwrap(),
        json!({ "CodingKeys": "SnakeCase" })
    );
    assert_eq!(serde_json::to_value(Macro::PublicInit).unwrap(), json!("PublicInit"));
}
