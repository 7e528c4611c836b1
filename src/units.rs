//! This module defines various unit types and their conversions.
//!
//! Energy is measured in kWh and power in kW throughout.
use serde::{Deserialize, Serialize};

macro_rules! unit_struct {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// The value of the unit type as an `f64`
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::ops::Div<$name> for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }
    };
}

/// Represents a dimensionless quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    /// The value as an `f64`
    pub fn value(self) -> f64 {
        self.0
    }

    /// The absolute value
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

unit_struct!(Energy, "An amount of energy (kWh).");
unit_struct!(Power, "A rate of energy flow or a power rating (kW).");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_arithmetic() {
        assert_eq!(Power(4.0) / Dimensionless(0.5), Power(8.0));
        assert_eq!(Power(4.0) * Dimensionless(2.0), Power(8.0));
        assert_eq!(Energy(3.0) / Energy(4.0), Dimensionless(0.75));
        assert_eq!(Energy(3.0) - Energy(4.0), Energy(-1.0));
        assert_eq!((Dimensionless(1.0) - Dimensionless(3.0)).abs(), Dimensionless(2.0));
    }
}
