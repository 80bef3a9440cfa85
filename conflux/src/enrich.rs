use serde::Serialize;
use crate::chapters;
use crate::model::dataset::Dataset;
use core::charter::{ChapterTable, Enrichment};

///
/// Cumulative result of one chapter-enrichment pass over a batch of records.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    pub assigned: usize,
    pub skipped: usize,
}

///
/// Fill empty chapter fields from each record's location.
///
/// Only truly-empty values are replaced - an existing assignment is never overwritten.
/// Records whose location has no confident chapter mapping are counted as skipped, which is
/// an expected, common outcome rather than an error.
///
pub fn enrich(dataset: &mut Dataset, enrichment: &Enrichment, table: &ChapterTable) -> EnrichmentStats {
    let state_idx = dataset.position(enrichment.state_column());
    let county_idxs: Vec<usize> = enrichment.county_columns().iter().filter_map(|c| dataset.position(c)).collect();
    let chapter_idxs: Vec<usize> = enrichment.chapter_columns().iter().filter_map(|c| dataset.position(c)).collect();

    let mut stats = EnrichmentStats::default();

    for row in dataset.rows_mut() {
        let state = state_idx.map(|idx| row[idx].clone()).unwrap_or_default();

        // The county field name is schema-dependent - take the first configured column with a value.
        let county = county_idxs.iter()
            .map(|&idx| row[idx].clone())
            .find(|value| !value.trim().is_empty())
            .unwrap_or_default();

        for &chapter_idx in &chapter_idxs {
            if !row[chapter_idx].trim().is_empty() {
                continue
            }

            match chapters::resolve(table, &state, &county) {
                Some(chapter) => {
                    row[chapter_idx] = chapter.to_string();
                    stats.assigned += 1;
                },
                None => stats.skipped += 1,
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::charter::Charter;

    fn charter() -> Charter {
        Charter::parse(r#"
name: test
version: 1
dataset_types:
  - id: applicants
    enrichment:
      chapter_columns: [Current Chapter, Home Chapter]
      state_column: State
      county_columns: [County, County of Residence]
chapters:
  GA:
    Fulton County: American Red Cross of Greater Atlanta
"#).unwrap()
    }

    fn dataset(rows: Vec<Vec<&str>>) -> Dataset {
        Dataset::new(
            vec!("State".into(), "County".into(), "County of Residence".into(), "Current Chapter".into(), "Home Chapter".into()),
            rows.into_iter().map(|row| row.into_iter().map(|v| v.to_string()).collect()).collect())
    }

    fn run(dataset: &mut Dataset) -> EnrichmentStats {
        let charter = charter();
        let stats = enrich(dataset, charter.dataset_type("applicants").unwrap().enrichment(), charter.chapters());
        stats
    }

    #[test]
    fn test_empty_chapter_fields_are_filled() {
        let mut data = dataset(vec!(vec!("GA", "Fulton County", "", "", "")));
        let stats = run(&mut data);

        assert_eq!(data.rows()[0][3], "American Red Cross of Greater Atlanta");
        assert_eq!(data.rows()[0][4], "American Red Cross of Greater Atlanta");
        assert_eq!(stats, EnrichmentStats { assigned: 2, skipped: 0 });
    }

    #[test]
    fn test_existing_assignments_are_never_overwritten() {
        let mut data = dataset(vec!(vec!("GA", "Fulton County", "", "Hand-assigned Chapter", "")));
        let stats = run(&mut data);

        assert_eq!(data.rows()[0][3], "Hand-assigned Chapter");
        assert_eq!(data.rows()[0][4], "American Red Cross of Greater Atlanta");
        assert_eq!(stats, EnrichmentStats { assigned: 1, skipped: 0 });
    }

    #[test]
    fn test_county_falls_back_to_residence_column() {
        let mut data = dataset(vec!(vec!("GA", "  ", "Fulton County", "", "")));
        let stats = run(&mut data);

        assert_eq!(data.rows()[0][3], "American Red Cross of Greater Atlanta");
        assert_eq!(stats.assigned, 2);
    }

    #[test]
    fn test_unknown_locations_are_counted_as_skipped() {
        let mut data = dataset(vec!(
            vec!("GA", "Nonexistent County", "", "", ""),
            vec!("", "", "", "", "")));
        let stats = run(&mut data);

        assert_eq!(data.rows()[0][3], "");
        assert_eq!(stats, EnrichmentStats { assigned: 0, skipped: 4 });
    }
}
