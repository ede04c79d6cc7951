//! Entry/exit signal columns, index-aligned with a bar table.

/// Boolean entry/exit columns. Both have the same length as the bar table
/// they were evaluated against; a side with no rule is all false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalTable {
    pub entry: Vec<bool>,
    pub exit: Vec<bool>,
}

impl SignalTable {
    /// Both columns false for `len` rows.
    pub fn empty(len: usize) -> Self {
        Self {
            entry: vec![false; len],
            exit: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}
