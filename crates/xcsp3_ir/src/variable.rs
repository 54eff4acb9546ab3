//! Variables and variable arrays.

use crate::domain::DomainId;
use crate::name::Name;

/// One declared decision variable, or one cell of a declared array.
#[derive(Debug, Clone, Copy)]
pub struct Variable {
    pub name: Name,
    pub domain: DomainId,
}

/// A multi-dimensional array of variables declared with `<array>`.
/// Cells share the array's declared size but may carry distinct
/// per-cell domains overriding the array-level default.
#[derive(Debug, Clone)]
pub struct VariableArray {
    pub name: Name,
    pub dims: Vec<usize>,
    pub cells: Vec<Option<Variable>>,
}

impl VariableArray {
    #[must_use]
    pub fn new(name: Name, dims: Vec<usize>) -> Self {
        let len = dims.iter().product();
        Self {
            name,
            dims,
            cells: vec![None; len],
        }
    }

    /// Converts a multi-index into the flat cell offset, row-major.
    #[must_use]
    pub fn flat_index(&self, indices: &[usize]) -> usize {
        debug_assert_eq!(indices.len(), self.dims.len());
        let mut offset = 0usize;
        for (i, &idx) in indices.iter().enumerate() {
            offset = offset * self.dims[i] + idx;
        }
        offset
    }
}
