use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    static ref TOKENS: Regex = Regex::new(r"[\s\-_\.]+").unwrap();
}

// Candidates scoring at or below this are rejected outright.
pub const MIN_SCORE: u32 = 30;

///
/// Score the similarity between a canonical field name and a candidate incoming header.
///
/// Exact match (case-insensitive, trimmed) scores 100, substring containment either way 80,
/// otherwise the token-overlap ratio scaled to 60. A candidate which textually matches one of
/// the field's synonyms earns a flat +20 on top.
///
pub fn score(field: &str, candidate: &str, synonyms: &[String]) -> u32 {
    let field_lower = field.trim().to_lowercase();
    let candidate_lower = candidate.trim().to_lowercase();

    let mut score = if field_lower == candidate_lower {
        100

    } else if candidate_lower.contains(&field_lower) || field_lower.contains(&candidate_lower) {
        80

    } else {
        let field_tokens = tokens(&field_lower);
        let candidate_tokens = tokens(&candidate_lower);

        let overlap = field_tokens.iter()
            .filter(|&&ft| candidate_tokens.iter().any(|&ct| ft == ct || ft.contains(ct) || ct.contains(ft)))
            .count();

        match field_tokens.len().max(candidate_tokens.len()) {
            0 => 0,
            max => ((overlap as f64 / max as f64) * 60.) as u32,
        }
    };

    if synonyms.iter().any(|synonym| {
        let synonym = synonym.trim().to_lowercase();
        candidate_lower.contains(&synonym) || synonym.contains(&candidate_lower)
    }) {
        score += 20;
    }

    score
}

///
/// The candidate header most similar to the canonical field, or None if nothing clears the
/// minimum score. Ties go to the first candidate in input order achieving the maximum.
///
pub fn best_match<'a>(field: &str, candidates: &'a [String], synonyms: &[String]) -> Option<&'a str> {
    let mut best = None;
    let mut best_score = MIN_SCORE;

    for candidate in candidates {
        let candidate_score = score(field, candidate, synonyms);
        if candidate_score > best_score {
            best_score = candidate_score;
            best = Some(candidate.as_str());
        }
    }

    best
}

fn tokens(text: &str) -> Vec<&str> {
    TOKENS.split(text).filter(|token| !token.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_scores_100() {
        assert_eq!(score("Email Address", "email address", &[]), 100);
        assert_eq!(score("Email Address", "  Email Address  ", &[]), 100);
    }

    #[test]
    fn test_containment_scores_80() {
        assert!(score("Email Address", "Email", &[]) >= 80);
        assert!(score("Email", "Email Address", &[]) >= 80);
    }

    #[test]
    fn test_unrelated_header_is_rejected() {
        assert!(score("Email Address", "Phone", &[]) <= MIN_SCORE);
    }

    #[test]
    fn test_token_overlap_is_scaled_to_60() {
        // 'bgc' and 'status' both overlap, 'check' does not: 2/3 of 60.
        assert_eq!(score("BGC Status", "bgc_check-status", &[]), 40);
    }

    #[test]
    fn test_synonym_bonus_is_cumulative() {
        let synonyms = vec!("email addr".to_string());
        assert_eq!(score("Email Address", "Email Addr", &synonyms), 100); // 80 containment + 20 bonus.
    }

    #[test]
    fn test_best_match_picks_highest_scorer() {
        let candidates = vec!("Phone".to_string(), "Email Addr".to_string());
        assert_eq!(best_match("Email Address", &candidates, &[]), Some("Email Addr"));
    }

    #[test]
    fn test_best_match_rejects_below_threshold() {
        let candidates = vec!("Phone".to_string(), "Fax".to_string());
        assert_eq!(best_match("Email Address", &candidates, &[]), None);
        assert_eq!(best_match("Email Address", &[], &[]), None);
    }

    #[test]
    fn test_ties_go_to_the_first_candidate() {
        let candidates = vec!("Email Addr".to_string(), "Addr Email".to_string());
        assert_eq!(best_match("Email", &candidates, &[]), Some("Email Addr"));
    }
}
