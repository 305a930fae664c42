use super::*;

#[test]
fn metadata_comes_from_script_lines() {
    let script = crate::script::parse_script(
        "Title: \"Ten Facts About Owls\"\n\
         Description: Night hunters explained.\n\
         Tags: [\"owls\", \"birds\"]\n\
         [An owl on a branch]\n\
         Narrator: \"Owls can rotate their heads.\"\n",
    )
    .unwrap();
    let meta = UploadMetadata::from_script(&script, &UploadSettings::default());
    assert_eq!(meta.title, "Ten Facts About Owls");
    assert_eq!(meta.description, "Night hunters explained.");
    assert_eq!(meta.tags, vec!["owls".to_string(), "birds".to_string()]);
    assert_eq!(meta.category_id, "22");
    assert_eq!(meta.privacy_status, "private");

    let json = serde_json::to_value(&meta).unwrap();
    assert_eq!(json["categoryId"], "22");
    assert_eq!(json["privacyStatus"], "private");
    assert!(json.get("channel").is_none());
}

#[test]
fn absent_lines_give_empty_fields() {
    let script = crate::script::parse_script("Narrator: hi\n").unwrap();
    let meta = UploadMetadata::from_script(&script, &UploadSettings::default());
    assert!(meta.title.is_empty());
    assert!(meta.tags.is_empty());
}
