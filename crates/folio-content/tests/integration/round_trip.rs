//! Re-serializing loaded documents.

use folio_content::{parse_document, Loader};

use crate::common::{ContentDir, STREAM_ANALYTICS};

#[tokio::test]
async fn test_rendered_documents_reload_identically() {
    let content = ContentDir::with_samples();
    let report = Loader::default().load_dir(content.path()).await.unwrap();

    let copy = ContentDir::new();
    for doc in &report.documents {
        copy.write(&doc.id, &doc.document.render().unwrap());
    }
    let reloaded = Loader::default().load_dir(copy.path()).await.unwrap();

    assert_eq!(reloaded.documents.len(), report.documents.len());
    for (a, b) in report.documents.iter().zip(&reloaded.documents) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.document, b.document);
    }
}

#[test]
fn test_frontmatter_keeps_body_verbatim() {
    let doc = parse_document(STREAM_ANALYTICS).unwrap();
    let rendered = doc.render().unwrap();
    assert!(rendered.ends_with(&doc.body));
    assert!(rendered.contains("date_modified"));
}
