//! # Viterbi Decoding and Marginals for a Linear-Chain CRF
//!
//! Implements the Viterbi algorithm for finding the most likely label
//! sequence, and the forward-backward algorithm for per-position label
//! marginals, given emission scores and a transition matrix.

use crate::error::{MiseError, Result};

/// Viterbi decoder for CRF label sequences.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    num_labels: usize,
}

impl ViterbiDecoder {
    /// Create a new Viterbi decoder.
    ///
    /// # Arguments
    /// * `num_labels` - Number of distinct labels the model emits
    pub fn new(num_labels: usize) -> Self {
        Self { num_labels }
    }

    /// Number of labels this decoder expects per position.
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    fn validate(&self, emission_scores: &[Vec<f64>], transition_matrix: &[Vec<f64>]) -> Result<()> {
        if transition_matrix.len() != self.num_labels
            || transition_matrix.iter().any(|row| row.len() != self.num_labels)
        {
            return Err(MiseError::Inference(format!(
                "transition matrix must be {n}x{n}",
                n = self.num_labels
            )));
        }
        if let Some((pos, row)) = emission_scores
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.num_labels)
        {
            return Err(MiseError::Inference(format!(
                "emission score dimension mismatch at position {pos}: expected {}, got {}",
                self.num_labels,
                row.len()
            )));
        }
        Ok(())
    }

    /// Decode the optimal label sequence.
    ///
    /// # Arguments
    /// * `emission_scores` - Matrix of shape [seq_len, num_labels]
    /// * `transition_matrix` - Matrix of shape [num_labels, num_labels],
    ///   indexed `[from][to]`
    ///
    /// # Returns
    /// The optimal label sequence as indices.
    pub fn decode(
        &self,
        emission_scores: &[Vec<f64>],
        transition_matrix: &[Vec<f64>],
    ) -> Result<Vec<usize>> {
        let seq_len = emission_scores.len();
        if seq_len == 0 {
            return Ok(Vec::new());
        }
        self.validate(emission_scores, transition_matrix)?;

        let mut dp: Vec<Vec<f64>> = vec![vec![f64::NEG_INFINITY; self.num_labels]; seq_len];
        let mut backptr: Vec<Vec<usize>> = vec![vec![0; self.num_labels]; seq_len];

        dp[0].copy_from_slice(&emission_scores[0]);

        for pos in 1..seq_len {
            for curr in 0..self.num_labels {
                let mut best_score = f64::NEG_INFINITY;
                let mut best_prev = 0;

                for prev in 0..self.num_labels {
                    let score = dp[pos - 1][prev] + transition_matrix[prev][curr];
                    if score > best_score {
                        best_score = score;
                        best_prev = prev;
                    }
                }

                dp[pos][curr] = best_score + emission_scores[pos][curr];
                backptr[pos][curr] = best_prev;
            }
        }

        // Ties resolve to the lowest label index
        let mut best_final = 0;
        for label in 1..self.num_labels {
            if dp[seq_len - 1][label] > dp[seq_len - 1][best_final] {
                best_final = label;
            }
        }

        let mut path = vec![best_final];
        let mut curr = best_final;
        for pos in (1..seq_len).rev() {
            curr = backptr[pos][curr];
            path.push(curr);
        }

        path.reverse();
        Ok(path)
    }

    /// Compute per-position label marginals with the forward-backward
    /// algorithm in log space.
    ///
    /// Returns a [seq_len, num_labels] matrix whose rows each sum to 1.
    pub fn marginals(
        &self,
        emission_scores: &[Vec<f64>],
        transition_matrix: &[Vec<f64>],
    ) -> Result<Vec<Vec<f64>>> {
        let seq_len = emission_scores.len();
        if seq_len == 0 {
            return Ok(Vec::new());
        }
        self.validate(emission_scores, transition_matrix)?;

        let n = self.num_labels;
        let mut alpha = vec![vec![0.0; n]; seq_len];
        let mut beta = vec![vec![0.0; n]; seq_len];
        let mut buf = vec![0.0; n];

        alpha[0].copy_from_slice(&emission_scores[0]);
        for pos in 1..seq_len {
            for curr in 0..n {
                for prev in 0..n {
                    buf[prev] = alpha[pos - 1][prev] + transition_matrix[prev][curr];
                }
                alpha[pos][curr] = log_sum_exp(&buf) + emission_scores[pos][curr];
            }
        }

        for pos in (0..seq_len - 1).rev() {
            for curr in 0..n {
                for next in 0..n {
                    buf[next] = transition_matrix[curr][next]
                        + emission_scores[pos + 1][next]
                        + beta[pos + 1][next];
                }
                beta[pos][curr] = log_sum_exp(&buf);
            }
        }

        let log_z = log_sum_exp(&alpha[seq_len - 1]);
        if !log_z.is_finite() {
            return Err(MiseError::Inference(
                "partition function is not finite".into(),
            ));
        }

        Ok((0..seq_len)
            .map(|pos| {
                (0..n)
                    .map(|label| (alpha[pos][label] + beta[pos][label] - log_z).exp())
                    .collect()
            })
            .collect())
    }
}

/// Numerically stable `ln(sum(exp(x)))`.
fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
