use super::{LinkDocument, SettingsDocument};

#[test]
fn test_columns_clamped_at_consumption() {
    let mut settings = SettingsDocument::default();

    settings.link_columns = 0;
    assert_eq!(settings.effective_columns(), 1, "0 should clamp up to 1");

    settings.link_columns = 9;
    assert_eq!(settings.effective_columns(), 6, "9 should clamp down to 6");

    settings.link_columns = -3;
    assert_eq!(settings.effective_columns(), 1);

    settings.link_columns = 4;
    assert_eq!(settings.effective_columns(), 4, "in-range passes through");
}

#[test]
fn test_clamp_never_rewrites_stored_value() {
    let mut settings = SettingsDocument::default();
    settings.link_columns = 9;
    settings.effective_columns();
    assert_eq!(settings.link_columns, 9, "stored value must round-trip verbatim");
}

#[test]
fn test_settings_serialize_camel_case() {
    let json = serde_json::to_string(&SettingsDocument::default()).unwrap();
    assert!(json.contains("\"pageTitle\""));
    assert!(json.contains("\"openLinksInNewTab\""));
    assert!(json.contains("\"linkColumns\""));
    assert!(json.contains("\"forceOverwriteStaticFiles\""));
}

#[test]
fn test_partial_settings_fill_defaults() {
    let settings: SettingsDocument = serde_json::from_str(r#"{"pageTitle": "Lab"}"#).unwrap();
    assert_eq!(settings.page_title, "Lab");
    assert!(settings.open_links_in_new_tab);
    assert_eq!(settings.link_columns, 3);
    assert!(!settings.force_overwrite_static_files);
}

#[test]
fn test_link_document_round_trips_unchanged() {
    let doc: LinkDocument = serde_json::from_str(
        r#"{"sections":[{"title":"A","links":[{"name":"X","url":"http://x"}]},{"title":"","links":[]}]}"#,
    )
    .unwrap();

    let json = serde_json::to_string_pretty(&doc).unwrap();
    let reloaded: LinkDocument = serde_json::from_str(&json).unwrap();

    assert_eq!(doc, reloaded, "order and content must survive a round-trip");
}

#[test]
fn test_link_document_requires_sections_key() {
    let result = serde_json::from_str::<LinkDocument>(r#"{"chapters": []}"#);
    assert!(result.is_err(), "a document without sections is invalid");
}

#[test]
fn test_starter_content_is_nonempty() {
    let starter = LinkDocument::starter();
    assert!(!starter.sections.is_empty());
    assert!(starter.sections.iter().all(|s| !s.links.is_empty()));
}
