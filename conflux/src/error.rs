use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {

    #[error("The master {dataset_type} dataset is empty - there is no canonical schema to merge onto")]
    EmptyMaster { dataset_type: String },

    #[error("The charter does not define a dataset type with id {id}")]
    UnknownDatasetType { id: String },

    #[error("Could not locate a header row in {path}")]
    HeaderRowNotFound { path: String },

    #[error("Unable to open file {path}")]
    CannotOpenCsv { path: String, source: csv::Error },

    #[error("Unable to read row from {path}")]
    CannotParseCsvRow { path: String, source: csv::Error },

    #[error("Unable to write row to {path}")]
    CannotWriteCsvRow { path: String, source: csv::Error },

    #[error("Unable to write the merge report to {path}")]
    CannotWriteReport { path: String, source: std::io::Error },

    #[error("Charter failed to load")]
    CharterLoadError ( #[from] core::error::Error ),

    #[error(transparent)]
    CSVError(#[from] csv::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}
