use std::ops::{Add, AddAssign};

/// Raw (un-normalized) potential energy broken down by contributor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub non_bonded: f64,
    pub radial: f64,
    pub angular: f64,
    pub torsional: f64,
}

impl EnergyTerm {
    pub fn new(non_bonded: f64, radial: f64, angular: f64, torsional: f64) -> Self {
        Self {
            non_bonded,
            radial,
            angular,
            torsional,
        }
    }

    #[inline]
    pub fn bonded(&self) -> f64 {
        self.radial + self.angular + self.torsional
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.non_bonded + self.bonded()
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            non_bonded: self.non_bonded + rhs.non_bonded,
            radial: self.radial + rhs.radial,
            angular: self.angular + rhs.angular,
            torsional: self.torsional + rhs.torsional,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        self.non_bonded += rhs.non_bonded;
        self.radial += rhs.radial;
        self.angular += rhs.angular;
        self.torsional += rhs.torsional;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_energy_term_with_specified_values() {
        let term = EnergyTerm::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(term.non_bonded, 1.0);
        assert_eq!(term.radial, 2.0);
        assert_eq!(term.angular, 3.0);
        assert_eq!(term.torsional, 4.0);
    }

    #[test]
    fn total_returns_sum_of_all_terms() {
        let term = EnergyTerm::new(1.5, -2.0, 0.25, 0.25);
        assert_eq!(term.bonded(), -1.5);
        assert_eq!(term.total(), 0.0);
    }

    #[test]
    fn add_sums_each_field_correctly() {
        let a = EnergyTerm::new(1.0, 2.0, 3.0, 4.0);
        let b = EnergyTerm::new(4.0, 5.0, 6.0, 7.0);
        assert_eq!(a + b, EnergyTerm::new(5.0, 7.0, 9.0, 11.0));
    }

    #[test]
    fn add_assign_accumulates_each_field_correctly() {
        let mut a = EnergyTerm::new(1.0, 2.0, 3.0, 4.0);
        a += EnergyTerm::new(-1.0, 0.5, 0.0, 1.0);
        assert_eq!(a, EnergyTerm::new(0.0, 2.5, 3.0, 5.0));
    }

    #[test]
    fn default_initializes_all_fields_to_zero() {
        assert_eq!(EnergyTerm::default(), EnergyTerm::new(0.0, 0.0, 0.0, 0.0));
    }
}
