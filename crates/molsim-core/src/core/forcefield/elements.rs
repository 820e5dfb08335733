use phf::phf_map;
use serde::Deserialize;

/// Per-element non-bonded and inertial parameters.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ElementParams {
    /// Atomic mass in amu.
    pub mass: f64,
    /// Lennard-Jones size parameter in Angstroms.
    pub sigma: f64,
    /// Lennard-Jones well depth.
    pub epsilon: f64,
}

const fn element(mass: f64, sigma: f64, epsilon: f64) -> ElementParams {
    ElementParams {
        mass,
        sigma,
        epsilon,
    }
}

// Lennard-Jones sigma and epsilon derived from UFF (x_i / 2^(1/6), D_i).
static ELEMENTS: phf::Map<&'static str, ElementParams> = phf_map! {
    "H" => element(1.008, 2.571, 0.044),
    "He" => element(4.003, 2.104, 0.056),
    "Li" => element(6.941, 2.184, 0.025),
    "Be" => element(9.012, 2.446, 0.085),
    "B" => element(10.811, 3.638, 0.180),
    "C" => element(12.011, 3.431, 0.105),
    "N" => element(14.007, 3.261, 0.069),
    "O" => element(15.999, 3.118, 0.060),
    "F" => element(18.998, 2.997, 0.050),
    "Ne" => element(20.180, 2.889, 0.042),
    "Na" => element(22.990, 2.658, 0.030),
    "Mg" => element(24.305, 2.691, 0.111),
    "Al" => element(26.982, 4.008, 0.505),
    "Si" => element(28.086, 3.826, 0.402),
    "P" => element(30.974, 3.695, 0.305),
    "S" => element(32.065, 3.595, 0.274),
    "Cl" => element(35.453, 3.516, 0.227),
    "Ar" => element(39.948, 3.446, 0.185),
    "K" => element(39.098, 3.396, 0.035),
    "Ca" => element(40.078, 3.028, 0.238),
    "Fe" => element(55.845, 2.594, 0.013),
    "Zn" => element(65.380, 2.462, 0.124),
    "Br" => element(79.904, 3.732, 0.251),
    "I" => element(126.904, 4.009, 0.339),
};

/// Canonical capitalization of an element symbol ("cl" and "CL" become "Cl").
pub fn normalize_symbol(symbol: &str) -> String {
    let trimmed = symbol.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Looks up the built-in parameters of an element.
pub fn lookup(symbol: &str) -> Option<ElementParams> {
    ELEMENTS.get(normalize_symbol(symbol).as_str()).copied()
}
