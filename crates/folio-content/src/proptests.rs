//! Property-based tests for document parsing and ordering.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value};

    use crate::document::{parse_document, Document, Image, Seo};
    use crate::order::sort_by_date;
    use crate::validate::validate_body;

    fn timestamp() -> impl Strategy<Value = DateTime<FixedOffset>> {
        (
            1990i32..2100,
            1u32..=12,
            1u32..=28,
            0u32..24,
            0u32..60,
            0u32..60,
            prop_oneof![Just(0u32), 1u32..1_000_000_000],
            -48i32..=56,
        )
            .prop_map(|(y, mo, d, h, mi, s, nano, quarter_hours)| {
                let offset = FixedOffset::east_opt(quarter_hours * 15 * 60).unwrap();
                let naive = NaiveDate::from_ymd_opt(y, mo, d)
                    .unwrap()
                    .and_hms_nano_opt(h, mi, s, nano)
                    .unwrap();
                offset.from_local_datetime(&naive).single().unwrap()
            })
    }

    fn labels(pattern: &'static str, max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(pattern, 0..max)
    }

    prop_compose! {
        fn document()(
            title in "[A-Za-z][A-Za-z0-9 :#+'-]{0,40}",
            date in timestamp(),
            categories in labels("[A-Z][a-z]{0,8}( [A-Z][a-z]{0,8})?", 3),
            tags in labels("[a-z][a-z0-9+-]{0,10}", 5),
            image in prop::option::of("[a-z]{1,8}/[a-z0-9-]{1,12}\\.(png|jpg)"),
            modified in prop::option::of(timestamp()),
            description in prop::option::of("[A-Za-z][A-Za-z ,.]{0,60}"),
            layout in prop::option::of("[a-z]{1,8}"),
            body in "[ -~\n]{0,200}",
        ) -> Document {
            let mut doc = Document::new(title, date, body);
            doc.categories = categories;
            let mut unique = Vec::new();
            for tag in tags {
                if !unique.contains(&tag) {
                    unique.push(tag);
                }
            }
            doc.tags = unique;
            doc.image = image.map(|path| Image { path: Some(path), extra: Mapping::new() });
            if modified.is_some() || description.is_some() {
                doc.seo = Some(Seo { date_modified: modified, description, extra: Mapping::new() });
            }
            if let Some(layout) = layout {
                doc.extra.insert(Value::from("layout"), Value::from(layout));
            }
            doc
        }
    }

    proptest! {
        #[test]
        fn test_metadata_round_trip(doc in document()) {
            let rendered = doc.render().unwrap();
            let parsed = parse_document(&rendered).unwrap();
            prop_assert_eq!(&parsed, &doc);
            prop_assert_eq!(parsed.metadata(), doc.metadata());
        }

        #[test]
        fn test_sort_is_idempotent(docs in prop::collection::vec((("[a-z]{1,6}\\.md"), timestamp()), 0..12)) {
            let mut items: Vec<(String, Document)> = docs
                .into_iter()
                .map(|(id, date)| (id.clone(), Document::new(id, date, "")))
                .collect();
            sort_by_date(&mut items);
            let once: Vec<String> = items.iter().map(|(id, _)| id.clone()).collect();
            sort_by_date(&mut items);
            let twice: Vec<String> = items.iter().map(|(id, _)| id.clone()).collect();
            prop_assert_eq!(&once, &twice);

            for pair in items.windows(2) {
                prop_assert!(pair[0].1.date >= pair[1].1.date);
            }
        }

        #[test]
        fn test_validate_never_panics(body in "\\PC{0,300}") {
            let report = validate_body(&body);
            let lines = body.lines().count().max(1);
            for d in &report.diagnostics {
                prop_assert!(d.line >= 1 && d.line <= lines);
            }
        }
    }
}
