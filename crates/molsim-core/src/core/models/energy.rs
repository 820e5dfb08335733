use serde::Serialize;

/// Energies of the system after a completed step, normalized per atom.
///
/// `kinetic` and `potential` are both divided by the total atom count (fixed
/// atoms included), so `total` is their plain sum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EnergySnapshot {
    pub step: u64,
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergySnapshot {
    pub fn new(step: u64, kinetic: f64, potential: f64) -> Self {
        Self {
            step,
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }

    /// True when every energy is a finite number.
    pub fn is_finite(&self) -> bool {
        self.kinetic.is_finite() && self.potential.is_finite() && self.total.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_sum_of_kinetic_and_potential() {
        let snapshot = EnergySnapshot::new(7, 1.25, -0.5);
        assert_eq!(snapshot.step, 7);
        assert_eq!(snapshot.total, 0.75);
        assert!(snapshot.is_finite());
    }

    #[test]
    fn nan_energy_is_not_finite() {
        assert!(!EnergySnapshot::new(0, f64::NAN, 0.0).is_finite());
        assert!(!EnergySnapshot::new(0, 0.0, f64::INFINITY).is_finite());
    }
}
