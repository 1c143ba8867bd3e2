//! Adjacency entry stored for every ordered (source, destination) pair.

/// Tagged view of an adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Reliable link (or self-loop) with a positive participation sign.
    LinkedActive,
    /// Reliable link (or self-loop) whose sign has been flipped by toggling.
    LinkedInactive,
    /// No reliable link between the pair.
    NotLinked,
}

/// A single adjacency entry.
///
/// `linked` is the magnitude: set for self-loops and for pairs whose reception
/// probability is exactly 1.0. `participating` is the sign overlay driven by
/// node toggling; it is tracked for unlinked entries as well, so flipping it
/// twice always restores the previous entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub linked: bool,
    pub participating: bool,
}

impl Entry {
    /// Signed integer view: `1`, `-1` or `0`.
    pub fn value(&self) -> i8 {
        match (self.linked, self.participating) {
            (false, _) => 0,
            (true, true) => 1,
            (true, false) => -1,
        }
    }

    pub fn state(&self) -> LinkState {
        match (self.linked, self.participating) {
            (false, _) => LinkState::NotLinked,
            (true, true) => LinkState::LinkedActive,
            (true, false) => LinkState::LinkedInactive,
        }
    }

    /// Strictly positive entry, i.e. usable for connectivity traversal.
    pub fn is_positive(&self) -> bool {
        self.value() > 0
    }

    /// Non-zero entry regardless of participation.
    pub fn is_nonzero(&self) -> bool {
        self.value() != 0
    }
}
