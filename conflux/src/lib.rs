pub mod chapters;
pub mod enrich;
pub mod error;
pub mod matching;
pub mod merge;
pub mod model;
pub mod transform;

use uuid::Uuid;
use chrono::Utc;
use error::MergeError;
use ubyte::ToByteUnit;
use model::dataset::Dataset;
use core::{charter::Charter, blue, formatted_duration_rate};
use std::{fs, path::{Path, PathBuf}, str::FromStr, time::Instant};

///
/// Created for each merge job. Used to pass the main top-level job 'things' around.
///
pub struct Context {
    started: Instant,      // When the job started.
    job_id: Uuid,          // Each job is given a unique id.
    charter: Charter,      // The static resources (dictionaries, layouts, chapter table) to merge with.
    charter_path: PathBuf, // The path to the charter being run.
    timestamp: String,     // A unique timestamp to stamp this job's report with.
}

impl Context {
    pub fn new(charter: Charter, charter_path: PathBuf) -> Self {
        let job_id = match std::env::var("CONFLUX_FIXED_JOB_ID") {
            Ok(job_id) => uuid::Uuid::from_str(&job_id).expect("Test JOB_ID has invalid format"),
            Err(_) => uuid::Uuid::new_v4(),
        };

        Self {
            started: Instant::now(),
            job_id,
            charter,
            charter_path,
            timestamp: new_timestamp(),
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn job_id(&self) -> &Uuid {
        &self.job_id
    }

    pub fn charter(&self) -> &Charter {
        &self.charter
    }

    pub fn charter_path(&self) -> &PathBuf {
        &self.charter_path
    }

    pub fn ts(&self) -> &str {
        &self.timestamp
    }
}

///
/// Generate a timestamp used to stamp the job's report.
///
pub fn new_timestamp() -> String {

    // This behaviour can be overriden by the tests.
    if let Ok(ts) = std::env::var("CONFLUX_FIXED_TS") {
        return ts
    }

    Utc::now().format("%Y%m%d_%H%M%S%3f").to_string()
}

///
/// Load the master and incoming extracts, reconcile and merge them, then write the merged
/// dataset and the merge report.
///
/// Each invocation is self-contained - nothing is shared between jobs except the charter file
/// on disk.
///
pub fn run_merge_job(
    charter: &str,
    dataset_type: &str,
    master: &str,
    incoming: &str,
    output: &str,
    report: Option<&str>) -> Result<(), MergeError> {

    let charter_path = Path::new(charter);
    let ctx = Context::new(Charter::load(charter_path)?, charter_path.to_path_buf());

    log::info!("Starting merge job:");
    log::info!("    Job ID: {}", ctx.job_id());
    log::info!("   Charter: {} (v{})", ctx.charter().name(), ctx.charter().version());

    let dt = ctx.charter().dataset_type(dataset_type)
        .ok_or_else(|| MergeError::UnknownDatasetType { id: dataset_type.into() })?;

    let master_data = Dataset::read(Path::new(master), &[])?;
    log::info!("Loaded {} master records from {}", master_data.len(), master);

    let incoming_data = Dataset::read(Path::new(incoming), dt.header_needles())?;
    log::info!("Loaded {} incoming records from {}", incoming_data.len(), incoming);

    let (merged, merge_report) = merge::merge(&ctx, &master_data, &incoming_data, dataset_type)?;

    let output_path = Path::new(output);
    merged.write(output_path)?;

    let f = fs::File::open(output_path)?;
    log::info!("Created file {} ({})", output, f.metadata()?.len().bytes());

    if let Some(report) = report {
        let json = serde_json::to_string_pretty(&merge_report).expect("report is always serialisable");
        fs::write(report, &json)
            .map_err(|source| MergeError::CannotWriteReport { path: report.into(), source })?;
        log::info!("Created report {}", report);
    }

    match merge_report.validation_passed() {
        true  => log::info!("All validations passed"),
        false => log::warn!("Validation issues found - review the merge report before trusting the output"),
    }

    let (duration, _rate) = formatted_duration_rate(merged.len().max(1), ctx.started().elapsed());
    log::info!("Merge job {} complete in {}", ctx.job_id(), blue(&duration));

    Ok(())
}
