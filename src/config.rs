//! Fixed configuration for the preparation pipeline.
//!
//! The appeal tokens, award ceiling, inflation multipliers, and the
//! keyword-to-category map are compile-time constants rather than inline
//! literals, each covered by its own tests.

/// Court-abbreviation tokens identifying appellate decisions.
///
/// A case whose name contains any of these substrings (case-insensitive)
/// was decided on appeal and is excluded from analysis.
pub const APPEAL_TOKENS: [&str; 3] = ["BCCA", "ABCA", "ONCA"];

/// Awards at or above this amount are treated as outliers and removed.
pub const AWARD_CEILING: f64 = 400_000.0;

/// First year covered by the inflation sequence.
pub const BASE_YEAR: i32 = 2004;

/// Year awards are projected to. Awards from this year pass through unchanged.
pub const TARGET_YEAR: i32 = 2018;

/// Yearly CPI multipliers for 2004..=2017, chained to project an award
/// forward to 2018 dollars. Entry `i` is the growth from year `2004 + i`
/// into the following year. The 2008 entry is below 1.0.
pub const CPI_04_TO_18: [f64; 14] = [
    1.02, 1.0233, 1.0219, 1.0339, 0.9905, 1.0183, 1.0274, 1.0125, 1.0132, 1.0211, 1.0127, 1.0126,
    1.0116, 1.0299,
];

/// Case numbers whose `Trial year` field cannot be extracted because the
/// source export labels their paragraphs inconsistently.
///
/// The raw export is known to be malformed for exactly these two cases.
/// They are listed by case number rather than by row position so that a
/// reordered export cannot silently shift the exclusion onto other cases.
pub const TRIAL_YEAR_EXCLUDED_CASES: [u64; 2] = [416, 417];

/// Cumulative multiplier projecting an award from `year` to [`TARGET_YEAR`].
///
/// Returns `None` when `year` falls outside the inflation table. The
/// multiplier for [`TARGET_YEAR`] itself is exactly 1.0.
pub fn cumulative_multiplier(year: i32) -> Option<f64> {
    if !(BASE_YEAR..=TARGET_YEAR).contains(&year) {
        return None;
    }
    if year == TARGET_YEAR {
        return Some(1.0);
    }
    let start = (year - BASE_YEAR) as usize;
    Some(CPI_04_TO_18[start..].iter().product())
}

/// Category name to the keyword columns it aggregates.
///
/// Spellings match the keyword-count export exactly, including `trunck`.
pub const CATEGORY_GROUPS: &[(&str, &[&str])] = &[
    ("brain", &["brain", "concussion", "pituitary gland"]),
    ("neck", &["neck"]),
    ("shoulder", &["shoulder"]),
    ("face", &["ears", "eyes", "teeth", "face", "mouth/jaw", "nose"]),
    ("head", &["head"]),
    ("arms", &["elbow", "hand", "wrist", "finger", "arm"]),
    ("hair", &["hair"]),
    (
        "legs",
        &[
            "ankle",
            "buttock",
            "toe",
            "foot",
            "knee",
            "leg",
            "hip",
            "limp",
            "sacrum",
            "tailbone/coccyx",
            "pelvis",
            "groin",
            "standing",
            "sitting",
            "walking",
        ],
    ),
    (
        "spine",
        &[
            "spine",
            "nervous system",
            "whiplash",
            "paraplegia",
            "paralysis",
            "polio",
            "quadriplegia",
            "seizures",
            "ankylosing spondylitis",
        ],
    ),
    ("back", &["mid back", "upper back", "lower back", "back pain"]),
    (
        "esophagus",
        &["esophagus", "feeding difficulties", "larynx", "throat", "speech"],
    ),
    ("trunck", &["ribs", "collar bone/clavicle", "breast", "chest", "bone"]),
    ("skin", &["scar", "skin", "bedsores"]),
    ("soft_tissue", &["soft tissue injuries"]),
    (
        "psychological",
        &[
            "loss of balance",
            "vertigo/dizziness",
            "stress/post traumatic stress disorder",
            "shock",
            "sleep",
            "addiction",
            "deconditioning",
            "depression",
            "embarrassment",
            "epilepsy",
            "fatigue",
            "insomnia",
            "humiliation",
            "sexual abuse/assault",
            "behavioral difficulties",
            "psychological symptoms",
        ],
    ),
    (
        "organ",
        &[
            "appendix",
            "spleen",
            "bladder",
            "bowel",
            "colon",
            "gallbladder",
            "heart",
            "kidney",
            "liver",
            "lung",
            "pancreas",
            "abdomen",
            "stomach",
        ],
    ),
    ("blood", &["blood", "diabetes", "blood pressure"]),
    (
        "genitals",
        &[
            "menstruation",
            "genitals",
            "vagina",
            "hernia",
            "ovaries/tubes",
            "perineum",
            "sexual dysfunction",
            "infertility",
            "uterus",
            "urinary tract",
        ],
    ),
    ("muscle", &["dystonia", "fibromyalgia"]),
    ("disease", &["hepatitis c", "herpes"]),
    ("drug", &["drug dependency"]),
    ("surgery", &["surgery", "rehabilitation"]),
    ("pregnancy", &["premature birth", "pregnancy", "labour and delivery"]),
    (
        "others",
        &[
            "cystic fibrosis",
            "developmental delay",
            "sinus",
            "disability",
            "life expectancy reduced",
            "lymph nodes",
            "malnutrition",
            "independence",
            "weight",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_multiplier_identity_at_target_year() {
        assert_eq!(cumulative_multiplier(TARGET_YEAR), Some(1.0));
    }

    #[test]
    fn test_multiplier_last_entry() {
        // 2017 awards chain through a single multiplier.
        assert_eq!(cumulative_multiplier(2017), Some(1.0299));
    }

    #[test]
    fn test_multiplier_exact_product() {
        let expected: f64 = CPI_04_TO_18[6..].iter().product();
        assert_eq!(cumulative_multiplier(2010), Some(expected));
    }

    #[test]
    fn test_multiplier_out_of_range() {
        assert_eq!(cumulative_multiplier(2003), None);
        assert_eq!(cumulative_multiplier(2019), None);
    }

    #[test]
    fn test_multiplier_near_monotonic() {
        // Earlier years accumulate more growth. The 2008 entry is below 1.0,
        // so compare 2007 against 2009 rather than adjacent years.
        let m_2007 = cumulative_multiplier(2007).unwrap();
        let m_2009 = cumulative_multiplier(2009).unwrap();
        let m_2015 = cumulative_multiplier(2015).unwrap();
        assert!(m_2007 > m_2009);
        assert!(m_2009 > m_2015);
        assert!(m_2015 > 1.0);
    }

    #[test]
    fn test_cpi_sequence_covers_base_to_target() {
        assert_eq!(CPI_04_TO_18.len(), (TARGET_YEAR - BASE_YEAR) as usize);
        // Exactly one entry reflects a deflationary year.
        let below_one = CPI_04_TO_18.iter().filter(|m| **m < 1.0).count();
        assert_eq!(below_one, 1);
    }

    #[test]
    fn test_category_groups_are_well_formed() {
        let mut names = HashSet::new();
        let mut keywords = HashSet::new();
        for (name, group) in CATEGORY_GROUPS {
            assert!(!group.is_empty(), "category '{}' has no keywords", name);
            assert!(names.insert(*name), "duplicate category '{}'", name);
            for keyword in *group {
                // A keyword in two groups would double-count in aggregation.
                assert!(
                    keywords.insert(*keyword),
                    "keyword '{}' appears in more than one category",
                    keyword
                );
            }
        }
        assert_eq!(CATEGORY_GROUPS.len(), 24);
    }
}
