use crate::{
    error::{PhysicsError, Result},
    math::Fixed,
};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// What the broad phase does when the pair pool cannot hold every overlapping pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Fail the tick with [`PhysicsError::PairPoolExhausted`].
    Throw,
    /// Skip the pairs that do not fit and count them.
    Drop,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::Throw
    }
}

/// Tuning for [`crate::scene::PhysicsScene`]. Units are centimetres, seconds and radians.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Number of pooled collision pair records, fixed for the lifetime of the scene.
    pub pair_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub solver_iterations: u32,
    /// Penetration left alone by position correction.
    pub penetration_slop: Fixed,
    /// Share of the remaining penetration removed per tick.
    pub correction_percentage: Fixed,
    /// Closing speed below which contacts do not bounce.
    pub restitution_threshold: Fixed,
    pub linear_snap_threshold: Fixed,
    pub angular_snap_threshold: Fixed,
    pub linear_sleep_threshold: Fixed,
    pub angular_sleep_threshold: Fixed,
    /// Consecutive low motion ticks an island needs before it may sleep.
    pub sleep_ticks: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pair_capacity: 1024,
            overflow_policy: OverflowPolicy::Throw,
            solver_iterations: 6,
            penetration_slop: Fixed::HALF,
            correction_percentage: Fixed::from_ratio(2, 5),
            restitution_threshold: Fixed::from_int(10),
            linear_snap_threshold: Fixed::HALF,
            angular_snap_threshold: Fixed::from_ratio(1, 100),
            linear_sleep_threshold: Fixed::from_int(2),
            angular_sleep_threshold: Fixed::from_ratio(1, 20),
            sleep_ticks: 60,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.solver_iterations == 0 {
            return Err(PhysicsError::InvalidConfig(
                "solver_iterations must be at least 1".into(),
            ));
        }
        if self.correction_percentage.is_negative() || self.correction_percentage > Fixed::ONE {
            return Err(PhysicsError::InvalidConfig(format!(
                "correction_percentage must be within [0, 1], got {}",
                self.correction_percentage
            )));
        }
        let non_negative = [
            ("penetration_slop", self.penetration_slop),
            ("restitution_threshold", self.restitution_threshold),
            ("linear_snap_threshold", self.linear_snap_threshold),
            ("angular_snap_threshold", self.angular_snap_threshold),
            ("linear_sleep_threshold", self.linear_sleep_threshold),
            ("angular_sleep_threshold", self.angular_sleep_threshold),
        ];
        for &(name, value) in non_negative.iter() {
            if value.is_negative() {
                return Err(PhysicsError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;

        Ok(config)
    }
}
