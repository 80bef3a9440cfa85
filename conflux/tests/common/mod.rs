use serde_json::Value;
use fs_extra::dir::remove;
use std::{fs, path::{Path, PathBuf}};

pub const FIXED_TS: &str = "20250101_000000000";
pub const FIXED_JOB_ID: &str = "74251904-63d9-11ec-a665-00155dd15f9e";

// The charter shipped with the repo, relative to this crate.
pub const CHARTER: &str = "../charters/commmob.yaml";

///
/// Set-up logging and ensure a fixed job id and timestamp are used in merge reports.
///
/// Creates an empty working folder under the cargo tmp dir, deleting any previous contents.
///
pub fn init_test(folder: &str) -> PathBuf {
    dotenv::dotenv().ok();
    let _ = env_logger::builder().is_test(true).try_init();

    std::env::set_var("CONFLUX_FIXED_JOB_ID", FIXED_JOB_ID);
    std::env::set_var("CONFLUX_FIXED_TS", FIXED_TS);

    let base_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(folder);

    let _ = remove(&base_dir);
    fs::create_dir_all(&base_dir)
        .expect(&format!("Cannot create base_dir {}", base_dir.to_string_lossy()));

    base_dir
}

pub fn write_file(folder: &Path, filename: &str, contents: &str) -> PathBuf {
    let path = folder.join(filename);
    fs::write(&path, contents)
        .expect(&format!("Cannot write test file {}", path.to_string_lossy()));
    path
}

pub fn read_report(path: &Path) -> Value {
    let contents = fs::read_to_string(path)
        .expect(&format!("Cannot read report {}", path.to_string_lossy()));
    serde_json::from_str(&contents).expect("Report is not valid json")
}
