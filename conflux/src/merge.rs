use uuid::Uuid;
use serde::Serialize;
use std::time::Instant;
use itertools::Itertools;
use std::collections::HashSet;
use core::{blue, formatted_duration_rate};
use crate::{Context, transform, error::MergeError, matching::mapper,
    enrich::{self, EnrichmentStats}, model::{dataset::Dataset, schema::CanonicalSchema}};

// Incoming rows are projected in fixed-size chunks purely so long-running merges can report
// progress - chunking never changes output content or order.
const BATCH_SIZE: usize = 100;

///
/// Everything a caller needs to audit one merge invocation. Immutable once produced.
///
#[derive(Clone, Debug, Serialize)]
pub struct MergeReport {
    job_id: Uuid,
    timestamp: String,
    charter: String,
    dataset_type: String,
    master_rows: usize,
    incoming_rows: usize,
    merged_rows: usize,
    net_change: i64,
    duplicates_removed: usize,
    mapping_gaps: Vec<String>,
    enrichment: EnrichmentStats,
    validation_passed: bool,
    issues: Vec<String>,
}

impl MergeReport {
    pub fn job_id(&self) -> &Uuid {
        &self.job_id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn charter(&self) -> &str {
        &self.charter
    }

    pub fn dataset_type(&self) -> &str {
        &self.dataset_type
    }

    pub fn master_rows(&self) -> usize {
        self.master_rows
    }

    pub fn incoming_rows(&self) -> usize {
        self.incoming_rows
    }

    pub fn merged_rows(&self) -> usize {
        self.merged_rows
    }

    pub fn net_change(&self) -> i64 {
        self.net_change
    }

    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed
    }

    pub fn mapping_gaps(&self) -> &[String] {
        &self.mapping_gaps
    }

    pub fn enrichment(&self) -> EnrichmentStats {
        self.enrichment
    }

    pub fn validation_passed(&self) -> bool {
        self.validation_passed
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }
}

///
/// Reconcile an incoming extract onto the master dataset's canonical schema and concatenate
/// the two - master rows first, then incoming rows in their original order.
///
/// Data-quality conditions (mapping gaps, enrichment misses, validation failures) never abort
/// the merge - they are reported through the MergeReport. Only an empty master dataset or an
/// unknown dataset type are hard errors.
///
pub fn merge(ctx: &Context, master: &Dataset, incoming: &Dataset, dataset_type: &str)
    -> Result<(Dataset, MergeReport), MergeError> {

    let dt = ctx.charter().dataset_type(dataset_type)
        .ok_or_else(|| MergeError::UnknownDatasetType { id: dataset_type.into() })?;

    if master.is_empty() || master.headers().is_empty() {
        return Err(MergeError::EmptyMaster { dataset_type: dataset_type.into() })
    }

    let started = Instant::now();
    let schema = CanonicalSchema::new(master.headers().to_vec());

    log::info!("Merging {} data: {} master columns, {} incoming columns",
        dataset_type,
        schema.len(),
        incoming.headers().len());

    let mapping = mapper::resolve(&schema, incoming.headers(), dt);

    // Project every incoming row into the canonical shape.
    let mut transformed = Dataset::new(schema.fields().to_vec(), vec!());
    for chunk in incoming.rows().chunks(BATCH_SIZE) {
        for row in chunk {
            transformed.push_row(transform::project(row, &mapping));
        }
        log::debug!("Projected {} of {} {} records", transformed.len(), incoming.len(), dataset_type);
    }

    // Fill empty chapter fields from each record's location.
    let stats = enrich::enrich(&mut transformed, dt.enrichment(), ctx.charter().chapters());
    log::info!("Chapter assignment complete: {} assigned, {} skipped (no confident mapping)",
        stats.assigned,
        stats.skipped);

    // Concatenate - master rows first, then incoming rows in original order.
    let mut merged = master.clone();
    for row in transformed.rows() {
        merged.push_row(row.clone());
    }

    // Duplicate elimination only runs when the charter configures keys for this dataset type.
    // The shipped charter configures none - every row is kept.
    let duplicates_removed = match dt.dedup_keys().is_empty() {
        true  => 0,
        false => remove_duplicates(&mut merged, &schema, dt.dedup_keys()),
    };

    let issues = validate(master.len() + incoming.len() - duplicates_removed, &merged);
    for issue in &issues {
        log::warn!("Validation issue: {}", issue);
    }

    let (duration, rate) = formatted_duration_rate(merged.len().max(1), started.elapsed());
    log::info!("Merged {}: {} + {} = {} rows in {} ({}/row)",
        dataset_type,
        master.len(),
        incoming.len(),
        merged.len(),
        blue(&duration),
        rate);

    let report = MergeReport {
        job_id: *ctx.job_id(),
        timestamp: ctx.ts().to_string(),
        charter: ctx.charter_path().to_string_lossy().into_owned(),
        dataset_type: dataset_type.to_string(),
        master_rows: master.len(),
        incoming_rows: incoming.len(),
        merged_rows: merged.len(),
        net_change: merged.len() as i64 - master.len() as i64,
        duplicates_removed,
        mapping_gaps: mapping.gaps().to_vec(),
        enrichment: stats,
        validation_passed: issues.is_empty(),
        issues,
    };

    Ok((merged, report))
}

///
/// Post-merge invariants. A failure here flags the report - the merged data is still returned
/// and the caller must review it before trusting the result.
///
fn validate(expected_rows: usize, merged: &Dataset) -> Vec<String> {
    let mut issues = vec!();

    if merged.len() != expected_rows {
        issues.push(format!("Row count mismatch: expected {}, got {}", expected_rows, merged.len()));
    }

    if merged.headers().is_empty() {
        issues.push("Merged data has no columns".to_string());
    }

    issues
}

///
/// Collapse rows sharing the same key values, keeping the first occurrence. Rows with no key
/// material at all are always kept. Returns the number of rows removed.
///
fn remove_duplicates(merged: &mut Dataset, schema: &CanonicalSchema, keys: &[String]) -> usize {
    let key_idxs: Vec<usize> = keys.iter().filter_map(|key| schema.position(key)).collect();
    let before = merged.len();

    let mut seen = HashSet::new();
    merged.retain_rows(|row| {
        let key = key_idxs.iter()
            .map(|&idx| row.get(idx).map(|value| value.trim().to_lowercase()).unwrap_or_default())
            .filter(|value| !value.is_empty())
            .join("|");

        match key.is_empty() {
            true  => true, // Keep rows without identifying information.
            false => seen.insert(key),
        }
    });

    let removed = before - merged.len();
    if removed > 0 {
        log::info!("Removed {} duplicate rows using keys: {}", removed, keys.iter().join(", "));
    }

    removed
}
