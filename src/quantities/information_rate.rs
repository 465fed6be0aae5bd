use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::Float;

#[derive(PartialEq, PartialOrd, Clone, Copy, Serialize, Deserialize, Debug)]
pub struct InformationRate(Float);

impl InformationRate {
    #[must_use]
    pub const fn bits_per_second(self) -> Float {
        self.0
    }

    /// Whether the rate can carry traffic, i.e. is finite and strictly positive.
    #[must_use]
    pub fn is_usable(self) -> bool {
        self.0.is_finite() && self.0 > 0.
    }
}

#[must_use]
pub const fn bits_per_second(r: Float) -> InformationRate {
    InformationRate(r)
}

impl Display for InformationRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}bps", self.0)
    }
}
