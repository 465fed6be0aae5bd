use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

use super::TimeSpan;

/// An instant in simulated time, measured from the start of the simulation.
#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Time(TimeSpan);

impl Time {
    pub const SIM_START: Time = Time(TimeSpan::ZERO);

    #[must_use]
    pub fn from_sim_start(t: TimeSpan) -> Time {
        Time::SIM_START + t
    }
}

impl Default for Time {
    fn default() -> Self {
        Time::SIM_START
    }
}

impl Sub<Time> for Time {
    type Output = TimeSpan;

    fn sub(self, other: Time) -> Self::Output {
        self.0 - other.0
    }
}

impl Add<TimeSpan> for Time {
    type Output = Time;

    fn add(self, other: TimeSpan) -> Self::Output {
        Time(self.0 + other)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}t", self.0.seconds())
    }
}
