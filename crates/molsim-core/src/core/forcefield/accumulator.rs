use nalgebra::Vector3;
use std::ops::Index;

/// Per-particle force sums for one evaluation.
///
/// Force terms only ever write here; particles are read-only while forces are
/// accumulated and receive the totals afterwards, in a separate phase.
#[derive(Debug, Clone, Default)]
pub struct ForceBuffer {
    forces: Vec<Vector3<f64>>,
}

impl ForceBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            forces: vec![Vector3::zeros(); len],
        }
    }

    /// Zeroes every entry, resizing to `len` particles if needed.
    pub fn reset(&mut self, len: usize) {
        self.forces.clear();
        self.forces.resize(len, Vector3::zeros());
    }

    #[inline]
    pub fn add(&mut self, index: usize, force: Vector3<f64>) {
        self.forces[index] += force;
    }

    /// Adds `force` to `i` and its reaction to `j`.
    #[inline]
    pub fn add_pair(&mut self, i: usize, j: usize, force_on_i: Vector3<f64>) {
        self.forces[i] += force_on_i;
        self.forces[j] -= force_on_i;
    }

    /// Adds another buffer of the same length entry by entry.
    pub fn merge(&mut self, other: &ForceBuffer) {
        for (total, partial) in self.forces.iter_mut().zip(&other.forces) {
            *total += partial;
        }
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.forces.iter()
    }

    /// Sum of all forces; zero for any set of internal forces.
    pub fn net(&self) -> Vector3<f64> {
        self.forces.iter().sum()
    }
}

impl Index<usize> for ForceBuffer {
    type Output = Vector3<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.forces[index]
    }
}
