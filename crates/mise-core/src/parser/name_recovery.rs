//! # Name Recovery
//!
//! Fallback for sentences where the tagger labeled no token `NAME`: the
//! longest run of consecutive tokens whose `NAME` marginal reaches
//! [`NAME_CANDIDATE_THRESHOLD`] is relabeled as the name.

use crate::tagger::Label;

/// Minimum `NAME` marginal for a token to be a name candidate.
pub const NAME_CANDIDATE_THRESHOLD: f64 = 0.2;

/// Groups sorted indices into maximal runs of consecutive values.
///
/// `[1, 2, 4, 5, 6, 9]` becomes `[[1, 2], [4, 5, 6], [9]]`.
pub fn group_consecutive(indices: &[usize]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &idx in indices {
        let extends = groups
            .last()
            .and_then(|g| g.last())
            .is_some_and(|&last| last + 1 == idx);
        if extends {
            if let Some(group) = groups.last_mut() {
                group.push(idx);
            }
        } else {
            groups.push(vec![idx]);
        }
    }
    groups
}

/// Assigns `NAME` to the most likely run of name tokens.
///
/// `name_scores[i]` is the tagger's `NAME` marginal at position `i`; missing
/// entries count as 0. The longest run of candidates wins, the earliest one
/// on ties. Positions in the run take the `NAME` label and their name score;
/// every other position is returned untouched. Without candidates the input
/// comes back unchanged.
pub fn recover_name(
    mut labels: Vec<Label>,
    mut scores: Vec<f64>,
    name_scores: &[f64],
) -> (Vec<Label>, Vec<f64>) {
    let candidates: Vec<usize> = (0..labels.len())
        .filter(|&i| name_scores.get(i).copied().unwrap_or(0.0) >= NAME_CANDIDATE_THRESHOLD)
        .collect();

    // max_by_key keeps the last maximum; reverse so the earliest run wins ties.
    let Some(run) = group_consecutive(&candidates)
        .into_iter()
        .rev()
        .max_by_key(Vec::len)
    else {
        return (labels, scores);
    };

    for i in run {
        labels[i] = Label::Name;
        if let Some(score) = scores.get_mut(i) {
            *score = name_scores[i];
        }
    }

    (labels, scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::Label::{Comment, Name, Other, Qty, Unit};

    #[test]
    fn test_group_consecutive() {
        assert_eq!(
            group_consecutive(&[1, 2, 4, 5, 6, 9]),
            vec![vec![1, 2], vec![4, 5, 6], vec![9]]
        );
        assert!(group_consecutive(&[]).is_empty());
    }

    #[test]
    fn test_recovers_contiguous_run_above_threshold() {
        let labels = vec![Qty, Comment, Comment, Other];
        let scores = vec![0.9, 0.6, 0.5, 0.7];

        let (labels, scores) = recover_name(labels, scores, &[0.05, 0.25, 0.3, 0.1]);

        assert_eq!(labels, vec![Qty, Name, Name, Other]);
        assert_eq!(scores, vec![0.9, 0.25, 0.3, 0.7]);
    }

    #[test]
    fn test_no_candidates_is_noop() {
        let labels = vec![Qty, Unit, Comment];
        let scores = vec![0.9, 0.8, 0.7];

        let (new_labels, new_scores) =
            recover_name(labels.clone(), scores.clone(), &[0.0, 0.19, 0.1]);

        assert_eq!(new_labels, labels);
        assert_eq!(new_scores, scores);
    }

    #[test]
    fn test_empty_input() {
        let (labels, scores) = recover_name(Vec::new(), Vec::new(), &[]);
        assert!(labels.is_empty());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_single_candidate() {
        let (labels, scores) = recover_name(vec![Comment, Comment], vec![0.7, 0.8], &[0.2, 0.1]);
        assert_eq!(labels, vec![Name, Comment]);
        assert_eq!(scores, vec![0.2, 0.8]);
    }

    #[test]
    fn test_longest_run_wins() {
        let labels = vec![Comment; 6];
        let scores = vec![0.5; 6];
        let name_scores = [0.4, 0.0, 0.3, 0.3, 0.3, 0.0];

        let (labels, _) = recover_name(labels, scores, &name_scores);
        assert_eq!(labels, vec![Comment, Comment, Name, Name, Name, Comment]);
    }

    #[test]
    fn test_tie_goes_to_earliest_run() {
        let labels = vec![Comment; 5];
        let scores = vec![0.5; 5];
        let name_scores = [0.3, 0.3, 0.0, 0.4, 0.4];

        let (labels, _) = recover_name(labels, scores, &name_scores);
        assert_eq!(labels, vec![Name, Name, Comment, Comment, Comment]);
    }

    #[test]
    fn test_short_name_scores_count_as_zero() {
        let (labels, _) = recover_name(vec![Comment, Comment, Comment], vec![0.5; 3], &[0.1, 0.5]);
        assert_eq!(labels, vec![Comment, Name, Comment]);
    }
}
