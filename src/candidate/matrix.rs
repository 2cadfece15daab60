//! Class-major probability matrix.
//!
//! Column `c` holds the probability of class `c` for every candidate, stored
//! contiguously so a suppression pass can borrow its own column mutably while
//! other classes are processed elsewhere.

/// Per-candidate, per-class probabilities stored one class column at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbMatrix {
    data: Vec<f32>,
    num_candidates: usize,
    num_classes: usize,
}

impl ProbMatrix {
    /// Creates a zero-filled matrix.
    pub fn new(num_candidates: usize, num_classes: usize) -> Self {
        let mut matrix = Self::default();
        matrix.reset(num_candidates, num_classes);
        matrix
    }

    /// Resizes to `num_candidates x num_classes` and zero-fills, reusing the
    /// allocation.
    pub fn reset(&mut self, num_candidates: usize, num_classes: usize) {
        self.data.clear();
        self.data.resize(num_candidates * num_classes, 0.0);
        self.num_candidates = num_candidates;
        self.num_classes = num_classes;
    }

    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Probability of `class` for `candidate`.
    pub fn get(&self, candidate: usize, class: usize) -> Option<f32> {
        if candidate >= self.num_candidates || class >= self.num_classes {
            return None;
        }
        self.data.get(class * self.num_candidates + candidate).copied()
    }

    pub(crate) fn set(&mut self, candidate: usize, class: usize, prob: f32) {
        debug_assert!(candidate < self.num_candidates && class < self.num_classes);
        self.data[class * self.num_candidates + candidate] = prob;
    }

    /// Probabilities of all candidates for `class`.
    pub fn column(&self, class: usize) -> Option<&[f32]> {
        if class >= self.num_classes {
            return None;
        }
        let start = class * self.num_candidates;
        self.data.get(start..start + self.num_candidates)
    }

    /// Mutable probabilities of all candidates for `class`.
    pub fn column_mut(&mut self, class: usize) -> Option<&mut [f32]> {
        if class >= self.num_classes {
            return None;
        }
        let start = class * self.num_candidates;
        self.data.get_mut(start..start + self.num_candidates)
    }

    /// Class probability vector of one candidate.
    pub fn candidate_probs(&self, candidate: usize) -> Option<Vec<f32>> {
        if candidate >= self.num_candidates {
            return None;
        }
        Some(
            (0..self.num_classes)
                .map(|class| self.data[class * self.num_candidates + candidate])
                .collect(),
        )
    }

    /// Number of non-zero entries.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&p| p != 0.0).count()
    }

    /// Whole backing buffer, one column after another.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[cfg(feature = "rayon")]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::ProbMatrix;

    #[test]
    fn columns_are_contiguous_per_class() {
        let mut probs = ProbMatrix::new(3, 2);
        probs.set(0, 1, 0.5);
        probs.set(2, 0, 0.25);
        assert_eq!(probs.column(0).unwrap(), &[0.0, 0.0, 0.25]);
        assert_eq!(probs.column(1).unwrap(), &[0.5, 0.0, 0.0]);
        assert_eq!(probs.candidate_probs(0).unwrap(), vec![0.0, 0.5]);
        assert_eq!(probs.get(2, 0), Some(0.25));
        assert_eq!(probs.get(3, 0), None);
        assert_eq!(probs.count_nonzero(), 2);

        probs.column_mut(1).unwrap()[0] = 0.0;
        assert_eq!(probs.count_nonzero(), 1);
        assert!(probs.column(2).is_none());
    }

    #[test]
    fn reset_zero_fills_new_shape() {
        let mut probs = ProbMatrix::new(2, 2);
        probs.set(1, 1, 0.9);
        probs.reset(4, 1);
        assert_eq!(probs.num_candidates(), 4);
        assert_eq!(probs.as_slice(), &[0.0; 4]);
    }
}
