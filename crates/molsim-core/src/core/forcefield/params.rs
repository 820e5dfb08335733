use super::elements::{self, ElementParams};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BondedParams {
    /// Stretch stiffness of a single bond; higher bond orders scale it.
    pub bond_stiffness: f64,
    /// Bending stiffness per radian squared.
    pub angle_stiffness: f64,
    /// Full barrier height of a torsion (`V = barrier/2 * (1 + cos(n*phi - phase))`).
    pub torsion_barrier: f64,
    pub torsion_periodicity: u32,
    /// Torsion phase in degrees.
    pub torsion_phase: f64,
}

impl Default for BondedParams {
    fn default() -> Self {
        Self {
            bond_stiffness: 20.0,
            angle_stiffness: 5.0,
            torsion_barrier: 0.2,
            torsion_periodicity: 3,
            torsion_phase: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Forcefield {
    pub globals: BondedParams,
    /// Per-element overrides of the built-in element table, keyed by symbol.
    pub elements: HashMap<String, ElementParams>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameter '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("No parameters for element '{0}'")]
pub struct UnknownElementError(pub String);

impl Forcefield {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let mut forcefield: Self = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        forcefield.elements = forcefield
            .elements
            .into_iter()
            .map(|(symbol, params)| (elements::normalize_symbol(&symbol), params))
            .collect();
        forcefield.validate()?;
        Ok(forcefield)
    }

    fn validate(&self) -> Result<(), ParamLoadError> {
        let g = &self.globals;
        for (name, value) in [
            ("bond_stiffness", g.bond_stiffness),
            ("angle_stiffness", g.angle_stiffness),
            ("torsion_barrier", g.torsion_barrier),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamLoadError::Invalid {
                    name: name.to_string(),
                    reason: format!("must be a finite non-negative number, got {value}"),
                });
            }
        }
        for (symbol, params) in &self.elements {
            if !(params.mass > 0.0 && params.sigma > 0.0 && params.epsilon >= 0.0) {
                return Err(ParamLoadError::Invalid {
                    name: format!("elements.{symbol}"),
                    reason: "mass and sigma must be positive, epsilon non-negative".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolves the parameters of an element, preferring overrides from the
    /// parameter file over the built-in table.
    pub fn element_params(&self, symbol: &str) -> Result<ElementParams, UnknownElementError> {
        let normalized = elements::normalize_symbol(symbol);
        self.elements
            .get(&normalized)
            .copied()
            .or_else(|| elements::lookup(&normalized))
            .ok_or(UnknownElementError(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_succeeds_with_valid_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("ff.toml");
        fs::write(
            &file_path,
            r#"
            [globals]
            bond_stiffness = 50.0
            angle_stiffness = 8.0
            torsion_barrier = 1.0
            torsion_periodicity = 2
            torsion_phase = 180.0

            [elements.c]
            mass = 12.0
            sigma = 3.4
            epsilon = 0.1
            "#,
        )
        .unwrap();

        let ff = Forcefield::load(&file_path).unwrap();
        assert_eq!(ff.globals.bond_stiffness, 50.0);
        assert_eq!(ff.globals.torsion_periodicity, 2);
        assert_eq!(
            ff.element_params("C").unwrap(),
            ElementParams {
                mass: 12.0,
                sigma: 3.4,
                epsilon: 0.1
            }
        );
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        fs::write(&file_path, "[globals]\nbond_stiffness = 10.0\n").unwrap();

        let ff = Forcefield::load(&file_path).unwrap();
        assert_eq!(ff.globals.bond_stiffness, 10.0);
        assert_eq!(ff.globals.angle_stiffness, BondedParams::default().angle_stiffness);
        assert!(ff.elements.is_empty());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = Forcefield::load(&dir.path().join("non_existent.toml"));
        assert!(matches!(result, Err(ParamLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("malformed.toml");
        fs::write(&file_path, "this is not toml").unwrap();
        let result = Forcefield::load(&file_path);
        assert!(matches!(result, Err(ParamLoadError::Toml { .. })));
    }

    #[test]
    fn load_rejects_negative_stiffness() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("negative.toml");
        fs::write(&file_path, "[globals]\nangle_stiffness = -1.0\n").unwrap();
        let result = Forcefield::load(&file_path);
        assert!(matches!(result, Err(ParamLoadError::Invalid { .. })));
    }

    #[test]
    fn element_params_falls_back_to_builtin_table() {
        let ff = Forcefield::default();
        assert_eq!(ff.element_params("o").unwrap().mass, 15.999);
        assert_eq!(
            ff.element_params("Qq"),
            Err(UnknownElementError("Qq".to_string()))
        );
    }
}
