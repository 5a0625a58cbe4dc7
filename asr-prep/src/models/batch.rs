//! Training batch handed to the trainer

/// One assembled batch
///
/// `target_labels` is the flat concatenation of every row's encoded label;
/// `target_indices` gives the `(row, position)` of each entry, sparse-tensor style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Feature frames per row
    pub inputs: Vec<Vec<Vec<f32>>>,
    /// Usable frame count per row (capped at the input length limit)
    pub input_lengths: Vec<usize>,
    pub target_lengths: Vec<usize>,
    pub target_labels: Vec<usize>,
    pub target_indices: Vec<(usize, usize)>,
    /// Dataset position to resume from for the following batch
    pub next_pointer: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
