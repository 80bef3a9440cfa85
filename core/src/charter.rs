use serde::Deserialize;
use crate::error::Error;
use std::{collections::BTreeMap, io::BufReader, path::Path};

///
/// State code -> county/parish display name -> chapter name.
///
/// Curated from master-file analysis - only county mappings backed by 100 or more existing
/// records are listed. A county absent from this table must resolve to 'no assignment'.
///
pub type ChapterTable = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Charter {
    name: String,
    description: Option<String>,
    version: u64, // Incremented on every charter edit.
    dataset_types: Vec<DatasetType>,

    #[serde(default)]
    chapters: ChapterTable,
}

///
/// The static resources for one kind of extract (applicants, volunteers, ...).
///
/// Adding a new dataset type is a charter edit, not a code change.
///
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename = "DatasetType")]
pub struct DatasetType {
    id: String,

    // Lowercase needles used to locate the real header row in exports which carry
    // banner/title rows above it. If empty, the first row is the header.
    #[serde(default)]
    header_needles: Vec<String>,

    // Canonical field name -> ordered list of acceptable lowercase header spellings.
    #[serde(default)]
    synonyms: BTreeMap<String, Vec<String>>,

    // The expected legacy/geocoded extract layout, tried after synonyms.
    #[serde(default)]
    positional: Vec<PositionalColumn>,

    // Fields whose mapping gaps are surfaced as advisory warnings.
    #[serde(default)]
    important: Vec<String>,

    enrichment: Enrichment,

    // When non-empty, merged rows sharing the same key values are collapsed.
    // Left empty in the shipped charter - the merge keeps every row by default.
    #[serde(default)]
    dedup_keys: Vec<String>,
}

///
/// One entry of the positional/legacy layout table.
///
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionalColumn {
    column: String, // The canonical field this entry feeds.
    source: String, // The expected source header in the incoming extract.

    // Used instead of 'source' when the extract carries no geocoded address data.
    raw_source: Option<String>,

    // Coordinate fields are left blank when the extract has no coordinate columns.
    #[serde(default)]
    coordinate: bool,

    // Alternate literal header names tried, in order, when 'source' is absent.
    #[serde(default)]
    fallbacks: Vec<String>,
}

///
/// Which canonical fields carry a chapter designation and where a record's
/// location is read from.
///
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Enrichment {
    chapter_columns: Vec<String>,
    state_column: String,
    county_columns: Vec<String>, // Ordered - the first non-empty value per record wins.
}

impl Charter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &Option<String> {
        &self.description
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dataset_types(&self) -> &[DatasetType] {
        &self.dataset_types
    }

    pub fn dataset_type(&self, id: &str) -> Option<&DatasetType> {
        self.dataset_types.iter().find(|dt| dt.id() == id)
    }

    pub fn chapters(&self) -> &ChapterTable {
        &self.chapters
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let rdr = BufReader::new(std::fs::File::open(&path)
            .map_err(|source| Error::CharterFileNotFound { path: path.to_string_lossy().into(), source })?);

        let charter: Self = serde_yaml::from_reader(rdr)
            .map_err(|source| Error::InvalidCharter { path: path.to_string_lossy().into(), source })?;

        charter.validate()?;
        Ok(charter)
    }

    pub fn parse(yaml: &str) -> Result<Self, Error> {
        let charter: Self = serde_yaml::from_str(yaml)
            .map_err(|source| Error::CharterParseError { source })?;

        charter.validate()?;
        Ok(charter)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.dataset_types.is_empty() {
            return Err(Error::CharterValidationError { reason: "At least one dataset type must be defined".into() })
        }

        for (idx, dt) in self.dataset_types.iter().enumerate() {
            if self.dataset_types.iter().skip(idx + 1).any(|other| other.id() == dt.id()) {
                return Err(Error::CharterValidationError { reason: format!("Duplicate dataset type id {}", dt.id()) })
            }

            if dt.enrichment().chapter_columns().is_empty() {
                return Err(Error::CharterValidationError { reason: format!("Dataset type {} has no chapter columns to enrich", dt.id()) })
            }

            for pc in dt.positional() {
                if dt.positional().iter().filter(|other| other.column() == pc.column()).count() > 1 {
                    return Err(Error::CharterValidationError { reason: format!("Dataset type {} maps column {} more than once", dt.id(), pc.column()) })
                }
            }
        }

        Ok(())
    }
}

impl DatasetType {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header_needles(&self) -> &[String] {
        &self.header_needles
    }

    pub fn synonyms(&self) -> &BTreeMap<String, Vec<String>> {
        &self.synonyms
    }

    pub fn synonyms_for(&self, field: &str) -> &[String] {
        match self.synonyms.get(field) {
            Some(synonyms) => synonyms,
            None => &[],
        }
    }

    pub fn positional(&self) -> &[PositionalColumn] {
        &self.positional
    }

    pub fn important(&self) -> &[String] {
        &self.important
    }

    pub fn enrichment(&self) -> &Enrichment {
        &self.enrichment
    }

    pub fn dedup_keys(&self) -> &[String] {
        &self.dedup_keys
    }
}

impl PositionalColumn {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn raw_source(&self) -> Option<&str> {
        self.raw_source.as_deref()
    }

    pub fn coordinate(&self) -> bool {
        self.coordinate
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }
}

impl Enrichment {
    pub fn chapter_columns(&self) -> &[String] {
        &self.chapter_columns
    }

    pub fn state_column(&self) -> &str {
        &self.state_column
    }

    pub fn county_columns(&self) -> &[String] {
        &self.county_columns
    }
}
