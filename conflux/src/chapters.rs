use core::charter::ChapterTable;

///
/// Map a record's location to an organisational chapter name.
///
/// The state is matched uppercase-trimmed. The county is tried exactly as supplied first,
/// then by a case-insensitive scan of the state's counties. Counties are never partially or
/// fuzzily matched.
///
pub fn resolve<'a>(table: &'a ChapterTable, state: &str, county: &str) -> Option<&'a str> {
    let state = state.trim().to_uppercase();
    let county = county.trim();

    if state.is_empty() || county.is_empty() {
        return None
    }

    let counties = table.get(&state)?;

    if let Some(chapter) = counties.get(county) {
        return Some(chapter)
    }

    counties.iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(county))
        .map(|(_, chapter)| chapter.as_str())
}
