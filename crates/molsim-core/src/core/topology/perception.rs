use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry;
use itertools::Itertools;
use std::collections::HashSet;
use tracing::warn;

/// Sine of the angle below which a bonded triplet counts as collinear.
pub const COLLINEAR_TOLERANCE: f64 = 1e-3;

/// Bonded interactions implied by the bond graph of a [`MolecularSystem`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerceivedTopology {
    /// Bonds as `(a, b)` in the order they appear in the system.
    pub bonds: Vec<(AtomId, AtomId)>,
    /// Angle triplets `[i, vertex, k]`.
    pub angles: Vec<[AtomId; 3]>,
    /// Proper torsions `[i, j, k, l]` about the `j-k` bond.
    pub torsions: Vec<[AtomId; 4]>,
    /// Pairs separated by one or two bonds, each stored as `(min, max)`.
    pub exclusions: HashSet<(AtomId, AtomId)>,
}

#[inline]
fn ordered(a: AtomId, b: AtomId) -> (AtomId, AtomId) {
    if a < b { (a, b) } else { (b, a) }
}

/// Derives angles, torsions and non-bonded exclusions from the bond graph.
///
/// Torsions whose `i-j-k` or `j-k-l` triplet is collinear have an undefined
/// dihedral and are skipped with a warning.
pub fn perceive(system: &MolecularSystem) -> PerceivedTopology {
    let neighbors = |id: AtomId| system.get_bonded_neighbors(id).unwrap_or(&[]);
    let mut topology = PerceivedTopology::default();

    for bond in system.bonds() {
        topology.bonds.push((bond.atom1_id, bond.atom2_id));
        topology
            .exclusions
            .insert(ordered(bond.atom1_id, bond.atom2_id));
    }

    for (vertex, _) in system.atoms_iter() {
        for (&a, &b) in neighbors(vertex).iter().tuple_combinations() {
            topology.angles.push([a, vertex, b]);
            topology.exclusions.insert(ordered(a, b));
        }
    }

    for bond in system.bonds() {
        let (j, k) = (bond.atom1_id, bond.atom2_id);
        for (&i, &l) in neighbors(j).iter().cartesian_product(neighbors(k)) {
            if i == k || l == j || i == l {
                continue;
            }
            if is_degenerate_torsion(system, [i, j, k, l]) {
                warn!(
                    ?i, ?j, ?k, ?l,
                    "Skipping torsion with collinear atoms; its dihedral is undefined."
                );
                continue;
            }
            topology.torsions.push([i, j, k, l]);
        }
    }

    topology
}

fn is_degenerate_torsion(system: &MolecularSystem, ids: [AtomId; 4]) -> bool {
    let Some(positions) = ids
        .iter()
        .map(|&id| system.atom(id).map(|atom| atom.position))
        .collect::<Option<Vec<_>>>()
    else {
        return true;
    };
    geometry::is_collinear(&positions[0], &positions[1], &positions[2], COLLINEAR_TOLERANCE)
        || geometry::is_collinear(&positions[1], &positions[2], &positions[3], COLLINEAR_TOLERANCE)
}
