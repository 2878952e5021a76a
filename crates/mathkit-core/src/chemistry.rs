//! Chemical balancer engine for `H2 + O2 -> H2O`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MathKitError;

/// Smallest coefficient the balancer accepts.
pub const MIN_COEFFICIENT: u32 = 1;

/// Largest coefficient the balancer accepts.
pub const MAX_COEFFICIENT: u32 = 10;

/// Parses a coefficient field.
///
/// Anything that is not an integer in `1..=10` becomes `1`. The whole field
/// must be the number, so `"3x"` is rejected rather than read as `3`.
#[must_use]
pub fn safe_coefficient(text: &str) -> u32 {
    text.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (MIN_COEFFICIENT..=MAX_COEFFICIENT).contains(n))
        .unwrap_or(MIN_COEFFICIENT)
}

/// A species in the reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Molecule {
    /// Hydrogen gas, a reactant.
    H2,
    /// Oxygen gas, a reactant.
    O2,
    /// Water, the product.
    H2O,
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H2 => write!(f, "H2"),
            Self::O2 => write!(f, "O2"),
            Self::H2O => write!(f, "H2O"),
        }
    }
}

impl FromStr for Molecule {
    type Err = MathKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "H2" => Ok(Self::H2),
            "O2" => Ok(Self::O2),
            "H2O" => Ok(Self::H2O),
            _ => Err(MathKitError::invalid_molecule(s)),
        }
    }
}

/// Hydrogen and oxygen atoms on one side of the equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomCounts {
    /// Hydrogen atoms.
    pub hydrogen: u32,
    /// Oxygen atoms.
    pub oxygen: u32,
}

impl fmt::Display for AtomCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} H, {} O", self.hydrogen, self.oxygen)
    }
}

/// Coefficients the learner has entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    h2: u32,
    o2: u32,
    h2o: u32,
}

impl Default for Equation {
    fn default() -> Self {
        Self {
            h2: 1,
            o2: 1,
            h2o: 2,
        }
    }
}

impl Equation {
    /// Creates an equation from raw field text.
    #[must_use]
    pub fn from_fields(h2: &str, o2: &str, h2o: &str) -> Self {
        Self {
            h2: safe_coefficient(h2),
            o2: safe_coefficient(o2),
            h2o: safe_coefficient(h2o),
        }
    }

    /// Returns the equation with one coefficient replaced by parsed `text`.
    #[must_use]
    pub fn with_coefficient(mut self, molecule: Molecule, text: &str) -> Self {
        let value = safe_coefficient(text);
        match molecule {
            Molecule::H2 => self.h2 = value,
            Molecule::O2 => self.o2 = value,
            Molecule::H2O => self.h2o = value,
        }
        self
    }

    /// Coefficient of `molecule`.
    #[must_use]
    pub const fn coefficient(&self, molecule: Molecule) -> u32 {
        match molecule {
            Molecule::H2 => self.h2,
            Molecule::O2 => self.o2,
            Molecule::H2O => self.h2o,
        }
    }

    /// Atoms on the reactant side.
    #[must_use]
    pub const fn left(&self) -> AtomCounts {
        AtomCounts {
            hydrogen: self.h2 * 2,
            oxygen: self.o2 * 2,
        }
    }

    /// Atoms on the product side.
    #[must_use]
    pub const fn right(&self) -> AtomCounts {
        AtomCounts {
            hydrogen: self.h2o * 2,
            oxygen: self.h2o,
        }
    }

    /// Returns `true` if both elements balance.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathkit_core::Equation;
    ///
    /// assert!(!Equation::default().is_balanced());
    /// assert!(Equation::from_fields("2", "1", "2").is_balanced());
    /// ```
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.left() == self.right()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}H2 + {}O2 -> {}H2O", self.h2, self.o2, self.h2o)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_coefficient() {
        assert_eq!(safe_coefficient("3"), 3);
        assert_eq!(safe_coefficient(" 10 "), 10);
        assert_eq!(safe_coefficient("0"), 1);
        assert_eq!(safe_coefficient("11"), 1);
        assert_eq!(safe_coefficient("-2"), 1);
        assert_eq!(safe_coefficient("x"), 1);
        assert_eq!(safe_coefficient(""), 1);
        // whole-field parse: trailing text is not ignored
        assert_eq!(safe_coefficient("3x"), 1);
        assert_eq!(safe_coefficient("2.5"), 1);
    }

    #[test]
    fn test_default_equation_is_unbalanced() {
        let equation = Equation::default();
        assert_eq!(equation.left(), AtomCounts { hydrogen: 2, oxygen: 2 });
        assert_eq!(equation.right(), AtomCounts { hydrogen: 4, oxygen: 2 });
        assert!(!equation.is_balanced());
    }

    #[test]
    fn test_balanced_multiples() {
        for k in 1..=5 {
            let equation = Equation::default()
                .with_coefficient(Molecule::H2, &(2 * k).to_string())
                .with_coefficient(Molecule::O2, &k.to_string())
                .with_coefficient(Molecule::H2O, &(2 * k).to_string());
            assert!(equation.is_balanced(), "{equation}");
        }
    }

    #[test]
    fn test_with_coefficient_clamps() {
        let equation = Equation::default().with_coefficient(Molecule::O2, "42");
        assert_eq!(equation.coefficient(Molecule::O2), 1);
    }

    #[test]
    fn test_display() {
        let equation = Equation::from_fields("2", "1", "2");
        assert_eq!(equation.to_string(), "2H2 + 1O2 -> 2H2O");
        assert_eq!(equation.left().to_string(), "4 H, 2 O");
    }

    #[test]
    fn test_molecule_parse() {
        assert_eq!("h2o".parse::<Molecule>().unwrap(), Molecule::H2O);
        let err = "CO2".parse::<Molecule>().unwrap_err();
        assert!(matches!(err, MathKitError::InvalidMolecule { ref name } if name == "CO2"));
        assert!(err.to_string().contains("'H2O'"));
    }
}
