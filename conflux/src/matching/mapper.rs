use itertools::Itertools;
use crate::matching::header;
use core::charter::DatasetType;
use crate::model::schema::{CanonicalSchema, FieldMapping, Source};

///
/// What the incoming header set tells us about the extract, detected once before any per-field
/// resolution (never per row, never per field).
///
#[derive(Clone, Copy, Debug)]
pub struct Capabilities {
    coordinates: bool,      // The extract carries longitude/latitude style columns.
    geocoded_address: bool, // The extract carries geocoded (standardised) address columns.
}

impl Capabilities {
    pub fn detect(headers: &[String]) -> Self {
        // Deliberately loose - matches the known geocoder output headers and anything that
        // even smells of a coordinate column.
        const COORDINATE_NEEDLES: &[&str] = &[
            "geocodio longitude",
            "geocodio latitude",
            "longitude",
            "latitude",
            "x",
            "y"];

        let coordinates = headers.iter().any(|header| {
            let header = header.to_lowercase();
            COORDINATE_NEEDLES.iter().any(|needle| header.contains(needle))
        });

        let geocoded_address = headers.iter().any(|header| {
            let header = header.to_lowercase();
            header.contains("geocodio") || header.contains("geocoded")
        });

        Self { coordinates, geocoded_address }
    }

    pub fn coordinates(&self) -> bool {
        self.coordinates
    }

    pub fn geocoded_address(&self) -> bool {
        self.geocoded_address
    }
}

///
/// Resolve, for every canonical field, which incoming column (if any) supplies its value.
///
/// Resolution order per field, first success wins: synonym exact match, positional/legacy
/// match, fuzzy scoring. Fields left unresolved render as empty strings for every row.
///
/// This is a pure function of the schema, the incoming headers and the charter's static
/// tables - never of row content.
///
pub fn resolve(schema: &CanonicalSchema, headers: &[String], dataset_type: &DatasetType) -> FieldMapping {
    let caps = Capabilities::detect(headers);

    match caps.coordinates() {
        true  => log::info!("Geocoded coordinates detected - using longitude/latitude columns"),
        false => log::warn!("No geocoded coordinates found - coordinate fields will be left blank"),
    }

    match caps.geocoded_address() {
        true  => log::info!("Geocoded address data detected - using standardised address columns"),
        false => log::warn!("No geocoded address data found - using original address columns"),
    }

    let mut sources = Vec::with_capacity(schema.len());
    let mut gaps = vec!();

    for field in schema.fields() {
        let source = resolve_field(field, headers, dataset_type, &caps);

        if matches!(source, Source::Blank) && dataset_type.important().iter().any(|important| important == field) {
            gaps.push(field.clone());
        }

        sources.push(source);
    }

    if !gaps.is_empty() {
        log::warn!("No match found for important fields: {}", gaps.iter().join(", "));
    }

    log::info!("Mapped {} of {} {} fields", sources.iter().filter(|s| matches!(s, Source::Column(_))).count(), schema.len(), dataset_type.id());

    FieldMapping::new(sources, gaps)
}

fn resolve_field(field: &str, headers: &[String], dataset_type: &DatasetType, caps: &Capabilities) -> Source {

    // Synonym exact match - dictionary order, first hit wins.
    for synonym in dataset_type.synonyms_for(field) {
        if let Some(idx) = headers.iter().position(|header| header.trim().eq_ignore_ascii_case(synonym.trim())) {
            return Source::Column(idx)
        }
    }

    // Positional/legacy match against the expected extract layout.
    if let Some(positional) = dataset_type.positional().iter().find(|pc| pc.column() == field) {
        // Coordinate fields stay blank when the extract has no coordinate columns at all.
        if positional.coordinate() && !caps.coordinates() {
            return Source::Blank
        }

        let nominal = match positional.raw_source() {
            Some(raw) if !caps.geocoded_address() => raw,
            _ => positional.source(),
        };

        if let Some(idx) = position_of(headers, nominal) {
            return Source::Column(idx)
        }

        for fallback in positional.fallbacks() {
            if let Some(idx) = position_of(headers, fallback) {
                return Source::Column(idx)
            }
        }

        // Coordinate fields only ever resolve positionally - never fuzzily.
        if positional.coordinate() {
            return Source::Blank
        }
    }

    // Fuzzy fallback.
    if let Some(matched) = header::best_match(field, headers, dataset_type.synonyms_for(field)) {
        let idx = headers.iter().position(|header| header == matched).expect("matched header missing");
        return Source::Column(idx)
    }

    Source::Blank
}

fn position_of(headers: &[String], name: &str) -> Option<usize> {
    match name.is_empty() {
        true  => None,
        false => headers.iter().position(|header| header == name),
    }
}
