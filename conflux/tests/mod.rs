mod common;
mod merge_jobs;
