///
/// The fixed, ordered field list that all merged output conforms to.
///
/// Derived from the master extract's header row at load time - never from the incoming extract.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalSchema {
    fields: Vec<String>,
}

impl CanonicalSchema {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

///
/// Where one canonical field's values are sourced from in the incoming extract.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Column(usize), // Index into the incoming extract's header row.
    Blank,         // Renders as an empty string for every incoming row.
}

///
/// The resolved output of schema mapping - one source per canonical field, in schema order,
/// plus the advisory list of important fields which could not be mapped.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    sources: Vec<Source>,
    gaps: Vec<String>,
}

impl FieldMapping {
    pub fn new(sources: Vec<Source>, gaps: Vec<String>) -> Self {
        Self { sources, gaps }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn gaps(&self) -> &[String] {
        &self.gaps
    }

    ///
    /// How many canonical fields found a real source column.
    ///
    pub fn mapped_count(&self) -> usize {
        self.sources.iter().filter(|s| matches!(s, Source::Column(_))).count()
    }
}
