//! Display ordering.
//!
//! Documents are presented newest first. Documents published at the same
//! instant are ordered by their identifier (normally the filename) so that
//! the order never depends on discovery or completion order.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};

use crate::document::Document;

/// Something that can be placed in date order.
pub trait Dated {
    /// Publication instant.
    fn date(&self) -> DateTime<FixedOffset>;

    /// Tie-break key for equal dates.
    fn sort_key(&self) -> &str;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> DateTime<FixedOffset> {
        (**self).date()
    }

    fn sort_key(&self) -> &str {
        (**self).sort_key()
    }
}

/// An identifier paired with the document it names.
impl Dated for (String, Document) {
    fn date(&self) -> DateTime<FixedOffset> {
        self.1.date
    }

    fn sort_key(&self) -> &str {
        &self.0
    }
}

/// Date descending, then key ascending.
///
/// Dates compare as instants, so `10:00 -0500` and `15:00 +0000` are equal.
pub fn compare_by_date<T: Dated>(a: &T, b: &T) -> Ordering {
    b.date()
        .cmp(&a.date())
        .then_with(|| a.sort_key().cmp(b.sort_key()))
}

/// Sort in display order.
///
/// The sort is stable and idempotent: sorting an already sorted slice leaves
/// it unchanged.
pub fn sort_by_date<T: Dated>(items: &mut [T]) {
    items.sort_by(compare_by_date);
}
