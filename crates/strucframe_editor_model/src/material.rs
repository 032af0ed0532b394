// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material definitions.
//!
//! Materials are stored and displayed only; frames do not reference them yet.

use std::fmt;

/// Highest Poisson ratio accepted for an isotropic material
pub const MAX_POISSON_RATIO: f64 = 0.5;

/// Unique identifier for a material, assigned sequentially from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An isotropic linear-elastic material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material ID
    pub id: MaterialId,
    /// Display name
    pub name: String,
    /// Elastic modulus E (MPa)
    pub elastic_modulus: f64,
    /// Poisson ratio (nu)
    pub poisson_ratio: f64,
    /// Density (rho), kN/m3
    pub density: f64,
}

impl Material {
    /// Validate raw material properties before they enter the store
    pub fn validate(
        name: &str,
        elastic_modulus: f64,
        poisson_ratio: f64,
        density: f64,
    ) -> Result<(), MaterialError> {
        if name.trim().is_empty() {
            return Err(MaterialError::EmptyName);
        }
        if !elastic_modulus.is_finite() || elastic_modulus < 0.0 {
            return Err(MaterialError::InvalidElasticModulus(elastic_modulus));
        }
        if !poisson_ratio.is_finite() || !(0.0..=MAX_POISSON_RATIO).contains(&poisson_ratio) {
            return Err(MaterialError::InvalidPoissonRatio(poisson_ratio));
        }
        if !density.is_finite() || density < 0.0 {
            return Err(MaterialError::InvalidDensity(density));
        }
        Ok(())
    }
}

/// Error when defining a material
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaterialError {
    /// Name is blank
    #[error("Material name must not be empty")]
    EmptyName,

    /// Elastic modulus out of range
    #[error("Invalid elastic modulus: {0}")]
    InvalidElasticModulus(f64),

    /// Poisson ratio out of range
    #[error("Invalid Poisson ratio: {0} (expected 0.0 to 0.5)")]
    InvalidPoissonRatio(f64),

    /// Density out of range
    #[error("Invalid density: {0}")]
    InvalidDensity(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_concrete() {
        assert!(Material::validate("Concrete", 30000.0, 0.2, 25.0).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            Material::validate("  ", 30000.0, 0.2, 25.0),
            Err(MaterialError::EmptyName)
        );
        assert_eq!(
            Material::validate("Steel", -1.0, 0.3, 78.5),
            Err(MaterialError::InvalidElasticModulus(-1.0))
        );
        assert_eq!(
            Material::validate("Rubber", 10.0, 0.6, 12.0),
            Err(MaterialError::InvalidPoissonRatio(0.6))
        );
        assert!(Material::validate("Steel", 200000.0, 0.3, f64::NAN).is_err());
    }
}
