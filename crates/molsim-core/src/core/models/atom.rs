use nalgebra::{Point3, Vector3};

/// Represents an atom of a molecular system as delivered by a structure source.
///
/// This is the topology-level view of an atom: what it is, where it sits and
/// whether it is allowed to move. The simulation engine flattens atoms into
/// [`Particle`](super::particle::Particle)s before integrating them.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "C", "O", "Cl").
    pub element: String,
    /// The 3D coordinates of the atom.
    pub position: Point3<f64>,
    /// The initial (or last synchronized) velocity of the atom.
    pub velocity: Vector3<f64>,
    /// Whether the atom is pinned in place during dynamics.
    pub fixed: bool,
}

impl Atom {
    /// Creates a new movable `Atom` at rest.
    ///
    /// # Arguments
    ///
    /// * `element` - The element symbol of the atom.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            position,
            velocity: Vector3::zeros(),
            fixed: false,
        }
    }

    /// Returns the same atom with the given initial velocity.
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Returns the same atom pinned in place.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }
}
