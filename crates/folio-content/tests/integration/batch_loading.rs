//! Directory loading end to end.

use folio_content::{DiagnosticKind, Loader, LoaderOptions, Severity};
use folio_core::Error;

use crate::common::{ContentDir, CPP_TEMPLATES};

#[tokio::test]
async fn test_samples_load_cleanly() {
    let content = ContentDir::with_samples();

    let report = Loader::default().load_dir(content.path()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.documents.len(), 2);
    for doc in &report.documents {
        assert!(doc.report.is_clean(), "{}: {:?}", doc.id, doc.report.diagnostics);
    }

    let first = &report.documents[0];
    assert_eq!(first.id, "_posts/2021-07-01-cpp20-template-parameters.md");
    assert_eq!(first.document.title, "C++20: Class Types as Template Parameters");
    assert_eq!(first.slug(), "cpp20-template-parameters");
    assert_eq!(
        first.report.code_blocks[0].language.as_deref(),
        Some("cpp")
    );
}

#[tokio::test]
async fn test_one_bad_file_does_not_stop_the_batch() {
    let content = ContentDir::with_samples();
    content.write(
        "_posts/2022-01-01-broken.md",
        "---\ntitle: Broken\ndate: next week\n---\nBody\n",
    );
    content.write("_posts/2022-01-02-headless.md", "Just text, no metadata.\n");

    let report = Loader::default().load_dir(content.path()).await.unwrap();

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(
        report.failures[0].error,
        Error::InvalidTimestamp { .. }
    ));
    assert!(matches!(
        report.failures[1].error,
        Error::MalformedMetadata(_)
    ));
    assert!(report.failures.iter().all(|f| f.error.is_content_error()));
}

#[tokio::test]
async fn test_hidden_and_foreign_files_are_skipped() {
    let content = ContentDir::with_samples();
    content.write(".git/HEAD.md", "not content");
    content.write("_posts/notes.txt", "not content");

    let report = Loader::default().load_dir(content.path()).await.unwrap();

    assert_eq!(report.total(), 2);
}

#[tokio::test]
async fn test_body_problems_are_reported_with_file_lines() {
    let content = ContentDir::new();
    let broken = CPP_TEMPLATES.replace("struct Fixed {};\n```\n", "struct Fixed {};\n");
    content.write("post.md", &format!("{broken}\nSee the paper.[^p0732]\n"));

    let report = Loader::default().load_dir(content.path()).await.unwrap();
    let doc = &report.documents[0];

    // The footnote reference sits inside the unterminated fence, so only the
    // fence is reported.
    let kinds: Vec<DiagnosticKind> = doc.report.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::UnterminatedCodeFence]);
    assert_eq!(doc.report.diagnostics[0].severity, Severity::Error);
    assert_eq!(doc.report.diagnostics[0].line, 10);
}

#[tokio::test]
async fn test_strict_batch() {
    let content = ContentDir::with_samples();
    content.write(
        "_posts/2023-03-03-dangling.md",
        "---\ntitle: Dangling\ndate: 2023-03-03 12:00:00 +0000\n---\nClaim.[^1]\n",
    );

    let lenient = Loader::default().load_dir(content.path()).await.unwrap();
    assert_eq!(lenient.documents.len(), 3);
    assert_eq!(lenient.error_count(), 1);

    let strict = Loader::new(LoaderOptions::default().with_strict(true))
        .load_dir(content.path())
        .await
        .unwrap();
    assert_eq!(strict.documents.len(), 2);
    assert_eq!(strict.failures[0].id, "_posts/2023-03-03-dangling.md");
}
