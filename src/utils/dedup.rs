//! Duplicate detection for papers within a single model response.
//!
//! Duplicates are reported, not removed: the model's list is passed through
//! as-is and callers decide what to do with the groups.

use std::collections::HashSet;

use crate::models::Paper;

/// Find duplicate papers based on link and normalized title
///
/// Returns groups of paper indices that are duplicates of each other, each
/// group in retrieved order.
pub fn find_duplicates(papers: &[Paper]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut processed: HashSet<usize> = HashSet::new();

    for i in 0..papers.len() {
        if processed.contains(&i) {
            continue;
        }

        let mut group = vec![i];
        let paper_i = &papers[i];

        for (j, paper_j) in papers.iter().enumerate().skip(i + 1) {
            if processed.contains(&j) {
                continue;
            }

            if are_duplicates(paper_i, paper_j) {
                group.push(j);
                processed.insert(j);
            }
        }

        if group.len() > 1 {
            groups.push(group);
        }

        processed.insert(i);
    }

    groups
}

/// Check if two papers are likely duplicates
fn are_duplicates(a: &Paper, b: &Paper) -> bool {
    if a.has_link() && b.has_link() && a.link.eq_ignore_ascii_case(&b.link) {
        return true;
    }

    let title_a = normalize_title(&a.title);
    !title_a.is_empty() && title_a == normalize_title(&b.title)
}

/// Normalize a title for comparison
fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Hello, World!"), "hello world");
        assert_eq!(normalize_title("Test   Title"), "test title");
        assert_eq!(normalize_title("Test: A-B/C"), "test abc");
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn test_find_duplicates_by_title() {
        let papers = vec![
            Paper::new("Deep Residual Learning", "", 9),
            Paper::new("Batch Normalization", "", 7),
            Paper::new("deep residual learning.", "", 8),
        ];
        assert_eq!(find_duplicates(&papers), vec![vec![0, 2]]);
    }

    #[test]
    fn test_find_duplicates_by_link() {
        let papers = vec![
            Paper::new("ResNet", "https://arxiv.org/abs/1512.03385", 9),
            Paper::new("Deep Residual Learning", "HTTPS://ARXIV.ORG/abs/1512.03385", 9),
        ];
        assert_eq!(find_duplicates(&papers), vec![vec![0, 1]]);
    }

    #[test]
    fn test_untitled_papers_are_not_duplicates() {
        let papers = vec![Paper::new("", "", 0), Paper::new("", "", 0)];
        assert!(find_duplicates(&papers).is_empty());
    }

    #[test]
    fn test_find_duplicates_empty() {
        assert!(find_duplicates(&[]).is_empty());
    }
}
