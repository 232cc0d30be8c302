//! Motor controller seam. Subsystems talk to these traits; the CAN binding
//! for the real controllers lives out of tree, `sim` covers desktop runs and
//! tests.

use thiserror::Error;

pub mod sim;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotorError {
    #[error("no motor controller responding on CAN id {0}")]
    Acquisition(i32),
    #[error("motor controller on CAN id {0} rejected its configuration")]
    ConfigRejected(i32),
}

/// What the controller does with the rotor when commanded to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleMode {
    Coast,
    Brake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorType {
    Brushless,
    Brushed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotorConfig {
    pub idle_mode: IdleMode,
    pub current_limit_amps: i32,
    /// Scales native rotations into output units (degrees here).
    pub position_conversion_factor: f64,
    pub velocity_conversion_factor: f64,
}

impl Default for MotorConfig {
    /// Controller power-on defaults.
    fn default() -> Self {
        Self {
            idle_mode: IdleMode::Coast,
            current_limit_amps: 80,
            position_conversion_factor: 1.,
            velocity_conversion_factor: 1.,
        }
    }
}

/// One speed-controlled motor channel with its built-in encoder.
pub trait MotorController {
    /// Applies the full configuration in one shot. Called once per channel
    /// during subsystem bring-up.
    fn configure(&self, config: &MotorConfig) -> Result<(), MotorError>;

    /// Mirrors `leader`'s output on this channel, negated when `inverted`.
    /// The binding is evaluated by the controller, not re-checked by callers.
    fn follow(&self, leader: &Self, inverted: bool) -> Result<(), MotorError>;

    /// Duty-cycle command in [-1, 1]. Out-of-range values are the
    /// controller's problem, not the caller's.
    fn set(&self, speed: f64);

    fn stop(&self);

    /// Output current draw in amps.
    fn output_current(&self) -> f64;

    /// Encoder position after the position conversion factor (degrees).
    fn position(&self) -> f64;
}

/// Acquires motor controllers by CAN id. Each id can be claimed once.
pub trait MotorBus {
    type Motor: MotorController;

    fn motor(&mut self, can_id: i32, kind: MotorType) -> Result<Self::Motor, MotorError>;
}
