use crate::model::schema::{FieldMapping, Source};

///
/// Project one incoming row into the canonical shape.
///
/// The output row has exactly one value per canonical field, in schema order, regardless of
/// the incoming row's own shape. Unmapped fields and out-of-range sources render as empty
/// strings - a present-but-empty source value stays empty, it is never substituted.
///
pub fn project(row: &[String], mapping: &FieldMapping) -> Vec<String> {
    mapping.sources()
        .iter()
        .map(|source| match source {
            Source::Column(idx) => row.get(*idx).cloned().unwrap_or_default(),
            Source::Blank => String::new(),
        })
        .collect()
}
