use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracker_core::Issue;

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("valid regex"));

/// Issue number -> numbers its body mentions, for issues with at least one mention
pub type ReferenceMap = BTreeMap<u64, Vec<u64>>;

/// Every `#<digits>` token in `body`, in order of appearance, duplicates kept
///
/// Purely syntactic: nothing checks that the numbers exist. Numbers too large
/// for `u64` are skipped.
pub fn extract_references(body: &str) -> Vec<u64> {
    REFERENCE_RE
        .captures_iter(body)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

pub fn build_reference_map(issues: &[Issue]) -> ReferenceMap {
    issues
        .iter()
        .filter_map(|issue| {
            let references = extract_references(&issue.body);
            (!references.is_empty()).then_some((issue.number, references))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::IssueState;

    #[test]
    fn test_extract_in_order_with_duplicates() {
        assert_eq!(
            extract_references("See #12 and #34, also #12"),
            vec![12, 34, 12]
        );
    }

    #[test]
    fn test_extract_none() {
        assert!(extract_references("no refs here").is_empty());
        assert!(extract_references("").is_empty());
        assert!(extract_references("# heading and #x").is_empty());
    }

    #[test]
    fn test_extract_adjacent_and_overflowing() {
        assert_eq!(extract_references("#1#2 (#3)"), vec![1, 2, 3]);
        assert_eq!(
            extract_references("#99999999999999999999999 then #5"),
            vec![5]
        );
    }

    #[test]
    fn test_reference_map_only_keeps_referencing_issues() {
        let issues = vec![
            Issue::new(1, "blocks #2", IssueState::Open),
            Issue::new(2, "", IssueState::Open),
            Issue::new(3, "dup of #1, see #40", IssueState::Closed),
        ];

        let map = build_reference_map(&issues);

        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], vec![2]);
        assert_eq!(map[&3], vec![1, 40]);
        assert!(!map.contains_key(&2));
    }
}
