use crate::error::{Error, Result};

pub const DEFAULT_TARGET_VELOCITY: u8 = 127;
pub const DEFAULT_EQUALIZE_LEVEL: u32 = 80;
const MAX_VELOCITY: u8 = 127;

/// Parameters of a normalize operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Velocity the loudest qualifying note is scaled to
    pub target_velocity: u8,
    /// Leave tracks whose volume never rises above zero out of the analysis
    pub ignore_muted: bool,
    /// Notes at or below this velocity never set the maximum
    pub velocity_threshold: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            target_velocity: DEFAULT_TARGET_VELOCITY,
            ignore_muted: true,
            velocity_threshold: 0,
        }
    }
}

impl NormalizeOptions {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_VELOCITY).contains(&self.target_velocity) {
            return Err(Error::InvalidOption(format!(
                "target velocity must be between 1 and {}, got {}",
                MAX_VELOCITY, self.target_velocity
            )));
        }
        if self.velocity_threshold > MAX_VELOCITY {
            return Err(Error::InvalidOption(format!(
                "velocity threshold must be between 0 and {}, got {}",
                MAX_VELOCITY, self.velocity_threshold
            )));
        }
        Ok(())
    }
}

/// Parameters of an equalize operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EqualizeOptions {
    /// Percentage every velocity is scaled to
    pub level: u32,
}

impl Default for EqualizeOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_EQUALIZE_LEVEL,
        }
    }
}

impl EqualizeOptions {
    pub fn scale_factor(&self) -> f64 {
        f64::from(self.level) / 100.0
    }
}
