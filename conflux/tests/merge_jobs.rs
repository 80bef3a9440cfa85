use serde_json::json;
use conflux::error::MergeError;
use conflux::model::dataset::Dataset;
use crate::common::{self, write_file, read_report};

const APPLICANT_MASTER: &str =
r#"account_id,Entry Point,Current Status,Email Address,City,State,County,Zip,Current Chapter,Home Chapter,x,y
1001,Online,Active,alice@example.org,Savannah,GA,Chatham County,31401,American Red Cross of Southeast Georgia,American Red Cross of Southeast Georgia,-81.09,32.08
1002,Online,Active,bob@example.org,Austin,TX,Travis County,78701,American Red Cross serving Central Texas,American Red Cross serving Central Texas,-97.74,30.27
"#;

// A geocoded extract with banner rows above the real header row.
const APPLICANT_INCOMING: &str =
r#"NEIA Applicant Export - 2025-01-01
,,
Account ID,Entry Point,Current Status,Email,Geocodio City,Geocodio State,Geocodio County,Geocodio Postal Code,Geocodio Longitude,Geocodio Latitude
2001,Walk-in,In Progress,carla@example.org,Atlanta,GA,Fulton County,30303,-84.39,33.75
2002,Online,In Progress,dave@example.org,Lincoln,NE,Lancaster County,68508,-96.70,40.81
"#;

#[test]
fn test_applicant_merge_end_to_end() {
    let base_dir = common::init_test("tests/applicant_merge_end_to_end");

    let master = write_file(&base_dir, "master.csv", APPLICANT_MASTER);
    let incoming = write_file(&base_dir, "incoming.csv", APPLICANT_INCOMING);
    let output = base_dir.join("merged.csv");
    let report = base_dir.join("report.json");

    conflux::run_merge_job(
        common::CHARTER,
        "applicants",
        &master.to_string_lossy(),
        &incoming.to_string_lossy(),
        &output.to_string_lossy(),
        Some(&report.to_string_lossy()))
        .expect("merge job failed");

    let merged = Dataset::read(&output, &[]).expect("cannot read merged output");

    // Master rows first and untouched, then the reconciled incoming rows.
    assert_eq!(merged.len(), 4);
    assert_eq!(merged.headers(), APPLICANT_MASTER.lines().next().unwrap().split(',').collect::<Vec<_>>());
    assert_eq!(merged.rows()[0][0], "1001");
    assert_eq!(merged.rows()[1][0], "1002");

    // The Atlanta record maps onto the canonical columns and both empty chapter fields are
    // filled from its county.
    assert_eq!(merged.rows()[2], vec!(
        "2001".to_string(),
        "Walk-in".to_string(),
        "In Progress".to_string(),
        "carla@example.org".to_string(),
        "Atlanta".to_string(),
        "GA".to_string(),
        "Fulton County".to_string(),
        "30303".to_string(),
        "American Red Cross of Greater Atlanta".to_string(),
        "American Red Cross of Greater Atlanta".to_string(),
        "-84.39".to_string(),
        "33.75".to_string()));

    // Nebraska has no chapter mapping - the record still merges with its chapters left blank.
    assert_eq!(merged.rows()[3][0], "2002");
    assert_eq!(merged.rows()[3][6], "Lancaster County");
    assert_eq!(merged.rows()[3][8], "");
    assert_eq!(merged.rows()[3][9], "");

    let report = read_report(&report);
    assert_eq!(report["job_id"], json!(common::FIXED_JOB_ID));
    assert_eq!(report["timestamp"], json!(common::FIXED_TS));
    assert_eq!(report["charter"], json!(common::CHARTER));
    assert_eq!(report["dataset_type"], json!("applicants"));
    assert_eq!(report["master_rows"], json!(2));
    assert_eq!(report["incoming_rows"], json!(2));
    assert_eq!(report["merged_rows"], json!(4));
    assert_eq!(report["net_change"], json!(2));
    assert_eq!(report["duplicates_removed"], json!(0));
    assert_eq!(report["mapping_gaps"], json!([]));
    assert_eq!(report["enrichment"], json!({ "assigned": 2, "skipped": 2 }));
    assert_eq!(report["validation_passed"], json!(true));
    assert_eq!(report["issues"], json!([]));
}

const VOLUNTEER_MASTER: &str =
r#"account_id,Member #,Current Status,Status Type,Email,City,State,County of Residence,Zip,Chapter Name,x,y
5001,M-100,Active,Employee,eve@example.org,Tulsa,OK,Tulsa County,74103,American Red Cross serving Tulsa Area OK,-95.99,36.15
"#;

// A raw (un-geocoded) portal export - no coordinate columns at all.
const VOLUNTEER_INCOMING: &str =
r#"Volunteer Detail Report
Account ID,Member #,Current Status,Status Type,Email,City,State,County,ZIP,Chapter Name
5002,M-200,Active,General Volunteer,frank@example.org,Wichita,KS,Sedgwick County,67202,
5003,M-300,Inactive,General Volunteer,gina@example.org,Boise,ID,Ada County,83702,
"#;

#[test]
fn test_volunteer_merge_without_geocoding() {
    let base_dir = common::init_test("tests/volunteer_merge_without_geocoding");

    let master = write_file(&base_dir, "master.csv", VOLUNTEER_MASTER);
    let incoming = write_file(&base_dir, "incoming.csv", VOLUNTEER_INCOMING);
    let output = base_dir.join("merged.csv");
    let report = base_dir.join("report.json");

    conflux::run_merge_job(
        common::CHARTER,
        "volunteers",
        &master.to_string_lossy(),
        &incoming.to_string_lossy(),
        &output.to_string_lossy(),
        Some(&report.to_string_lossy()))
        .expect("merge job failed");

    let merged = Dataset::read(&output, &[]).expect("cannot read merged output");
    assert_eq!(merged.len(), 3);

    // The Kansas record gets its chapter from its county, the Idaho record has no mapping.
    assert_eq!(merged.rows()[1][0], "5002");
    assert_eq!(merged.rows()[1][7], "Sedgwick County");
    assert_eq!(merged.rows()[1][9], "American Red Cross of South Central and Southeast Kansas");
    assert_eq!(merged.rows()[2][0], "5003");
    assert_eq!(merged.rows()[2][9], "");

    // No coordinate columns in the extract - x and y stay blank.
    assert_eq!(merged.rows()[1][10], "");
    assert_eq!(merged.rows()[1][11], "");

    let report = read_report(&report);
    assert_eq!(report["mapping_gaps"], json!([]));
    assert_eq!(report["enrichment"], json!({ "assigned": 1, "skipped": 1 }));
    assert_eq!(report["validation_passed"], json!(true));
}

#[test]
fn test_unrecognisable_extract_is_rejected() {
    let base_dir = common::init_test("tests/unrecognisable_extract_is_rejected");

    let master = write_file(&base_dir, "master.csv", APPLICANT_MASTER);
    let incoming = write_file(&base_dir, "incoming.csv", "Alpha,Beta\n1,2\n");
    let output = base_dir.join("merged.csv");

    let result = conflux::run_merge_job(
        common::CHARTER,
        "applicants",
        &master.to_string_lossy(),
        &incoming.to_string_lossy(),
        &output.to_string_lossy(),
        None);

    match result {
        Ok(_) => panic!("Expected an error for an extract with no recognisable header row"),
        Err(err) => match err {
            MergeError::HeaderRowNotFound { .. } => {},
            e @ _ => panic!("Expected HeaderRowNotFound error got: {}", e),
        },
    }

    assert!(!output.exists());
}
