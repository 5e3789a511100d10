use canonlock_canonical::{
    canonicalize, digest_json, seal, verify_integrity, Canonicalizer, Digest, DigestAlg,
};
use proptest::prelude::*;
use serde_json::json;

fn document(integrity_body: &[String], author: &str) -> String {
    let mut doc = String::from("# Canon\n\nmetadata:\n  title: Rosetta\n  integrity:\n");
    for line in integrity_body {
        doc.push_str("    ");
        doc.push_str(line);
        doc.push('\n');
    }
    doc.push_str(&format!("  author: {}\n\n## Body\nText.\n", author));
    doc
}

#[test]
fn digest_serializes_to_golden_json() {
    let digest = Digest::sha256(b"");
    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        r#"{"alg":"sha-256","hex":"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"}"#
    );
    assert_eq!(digest.alg, DigestAlg::Sha256);
}

#[test]
fn scenario_excludes_sha_line_and_keeps_author() {
    let lines: Vec<String> = canonicalize("metadata:\n  integrity:\n    sha256: abc\n  author: X")
        .into_iter()
        .map(|line| line.text)
        .collect();
    assert!(!lines.iter().any(|line| line.contains("sha256: abc")));
    assert!(lines.iter().any(|line| line == "  author: X"));
}

#[test]
fn canonical_digest_is_stable_across_calls() {
    let doc = document(&["sha256: abc".to_string()], "X");
    let first = Canonicalizer::new().canonicalize(&doc).digest();
    let second = Canonicalizer::new().canonicalize(&doc).digest();
    assert_eq!(first, second);
}

#[test]
fn golden_canonical_text() {
    let doc = document(&["sha256: abc".to_string()], "X");
    let form = Canonicalizer::new().canonicalize(&doc);
    assert_eq!(
        form.to_text(),
        "# Canon\n\nmetadata:\n  title: Rosetta\n  author: X\n\n## Body\nText.\n"
    );
    assert_eq!(form.excluded_lines(), 2);
}

#[test]
fn payload_digest_ignores_key_order() {
    let a = json!({"id": "u", "law": {"axioms": ["A"], "rank": 1}, "lore": {"archetype": "X"}});
    let b = json!({"lore": {"archetype": "X"}, "law": {"rank": 1, "axioms": ["A"]}, "id": "u"});
    assert_eq!(digest_json(&a).unwrap(), digest_json(&b).unwrap());
}

#[test]
fn sealed_document_survives_resealing_after_integrity_edit() {
    let doc = document(&["sha256: \"0\"".to_string(), "signed_by: council".to_string()], "X");
    let sealed = seal(&doc).unwrap();
    let edited = sealed.text.replace("signed_by: council", "signed_by: someone-else");
    assert!(verify_integrity(&edited).matches());
}

proptest! {
    #[test]
    fn integrity_content_never_affects_digest(
        a in prop::collection::vec("[a-z0-9_]{1,8}: [a-z0-9 ]{0,16}", 0..6),
        b in prop::collection::vec("[a-z0-9_]{1,8}: [a-z0-9 ]{0,16}", 0..6),
    ) {
        let canonicalizer = Canonicalizer::new();
        prop_assert_eq!(
            canonicalizer.canonicalize(&document(&a, "X")).digest(),
            canonicalizer.canonicalize(&document(&b, "X")).digest()
        );
    }

    #[test]
    fn content_outside_integrity_affects_digest(
        body in prop::collection::vec("[a-z0-9_]{1,8}: [a-z0-9 ]{0,16}", 0..4),
        left in "[A-Za-z]{1,12}",
        right in "[A-Za-z]{1,12}",
    ) {
        prop_assume!(left != right);
        let canonicalizer = Canonicalizer::new();
        prop_assert_ne!(
            canonicalizer.canonicalize(&document(&body, &left)).digest(),
            canonicalizer.canonicalize(&document(&body, &right)).digest()
        );
    }

    #[test]
    fn fenced_lines_are_retained_verbatim(
        fenced in prop::collection::vec(
            prop::sample::select(vec![
                "metadata:",
                "  integrity:",
                "    sha256: abc",
                "author: X",
                "  - item",
                "",
            ]),
            0..10,
        ),
    ) {
        let mut doc = String::from("intro\n```yaml\n");
        for line in &fenced {
            doc.push_str(line);
            doc.push('\n');
        }
        doc.push_str("```\nafter: 1\n");

        let retained: Vec<String> = canonicalize(&doc).into_iter().map(|line| line.text).collect();
        let mut expected = vec!["intro".to_string(), "```yaml".to_string()];
        expected.extend(fenced.iter().map(|line| line.to_string()));
        expected.extend(["```".to_string(), "after: 1".to_string(), String::new()]);
        prop_assert_eq!(retained, expected);
    }
}
