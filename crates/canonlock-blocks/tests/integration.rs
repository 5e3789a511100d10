use canonlock_blocks::{
    BlockTag, PayloadOptions, PayloadSchema, TagSet, UnitError, UnitValidator,
};
use canonlock_canonical::digest_json;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const UNIT: &str = "\
# Invocations

Narrative preamble.

```yaml LORE
archetype: X
```

Some prose between the blocks.

```json LAW
{\"axioms\": [\"A\"]}
```
";

fn validator() -> UnitValidator {
    UnitValidator::new(PayloadSchema::builtin().unwrap())
}

#[test]
fn test_unit_file_validates_with_builtin_schema() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("02_invocations.md");
    fs::write(&path, UNIT).unwrap();

    let validated = validator().validate_file(&path).unwrap();

    assert_eq!(validated.payload.id.as_ref(), "02_invocations");
    assert_eq!(validated.payload.name, "02 Invocations");
    assert_eq!(
        validated.digest,
        digest_json(&json!({
            "id": "02_invocations",
            "name": "02 Invocations",
            "version": "0.1",
            "law": {"axioms": ["A"]},
            "lore": {"archetype": "X"}
        }))
        .unwrap()
    );
}

#[test]
fn test_crlf_unit_matches_lf_unit() {
    let validator = validator();
    let lf = validator.validate_text("u", UNIT).unwrap();
    let crlf = validator
        .validate_text("u", &UNIT.replace('\n', "\r\n"))
        .unwrap();
    assert_eq!(lf.digest, crlf.digest);
}

#[test]
fn test_missing_unit_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.md");
    let err = validator().validate_file(&missing).unwrap_err();
    assert!(matches!(err, UnitError::NotFound(path) if path == missing));
}

#[test]
fn test_unit_without_lore_is_missing_block() {
    let err = validator()
        .validate_text("u", "```json LAW\n{}\n```\n")
        .unwrap_err();
    assert!(matches!(
        err,
        UnitError::MissingBlock { ref missing } if missing == &vec![BlockTag::Lore]
    ));
}

#[test]
fn test_schema_file_is_used() {
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("school_schema.json");
    fs::write(
        &schema_path,
        r#"{
            "type": "object",
            "properties": {
                "version": {"const": "1.0"},
                "law": {"required": ["edicts"]}
            }
        }"#,
    )
    .unwrap();

    let validator = UnitValidator::new(PayloadSchema::load(&schema_path).unwrap());
    let err = validator.validate_text("u", UNIT).unwrap_err();
    let UnitError::SchemaViolation { violations } = err else {
        panic!("expected schema violations");
    };
    let paths: Vec<_> = violations.iter().map(|v| v.field_path.as_str()).collect();
    assert_eq!(paths, vec!["law", "version"]);

    let accepted = validator
        .with_options(PayloadOptions {
            version: "1.0".to_string(),
        })
        .validate_text("u", &UNIT.replace("\"A\"]", "\"A\"], \"edicts\": []"))
        .unwrap();
    assert_eq!(accepted.payload.version, "1.0");
}

#[test]
fn test_custom_tags() {
    let unit = "```json RULES\n{\"a\": 1}\n```\n```yaml STORY\nb: 2\n```\n";
    let validated = validator()
        .with_tags(TagSet::new(["rules"], ["story"]))
        .validate_text("custom", unit)
        .unwrap();
    assert_eq!(validated.payload.law["a"], json!(1));
    assert_eq!(validated.payload.lore["b"], json!(2));
}

#[test]
fn test_units_are_independent_across_threads() {
    let validator = validator();
    let results: Vec<_> = std::thread::scope(|scope| {
        let good = scope.spawn(|| validator.validate_text("good", UNIT));
        let bad = scope.spawn(|| validator.validate_text("bad", "```json LAW\n{oops\n```\n```LORE\n{}\n```\n"));
        vec![good.join().unwrap(), bad.join().unwrap()]
    });
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(UnitError::MalformedBlock { tag: BlockTag::Law, .. })
    ));
}
