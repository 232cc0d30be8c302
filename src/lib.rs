pub mod constants;
pub mod container;
pub mod hal;
pub mod subsystems;
pub mod telemetry;

use std::cell::RefCell;
use std::rc::Rc;

use crate::hal::{MotorBus, MotorController, MotorError};
use crate::subsystems::Intake;
use crate::telemetry::TelemetrySink;

/// The robot. One mechanism this season: the intake/indexer.
pub struct Chomper<M: MotorController, T: TelemetrySink> {
    pub intake: Rc<RefCell<Intake<M, T>>>,
}

impl<M: MotorController, T: TelemetrySink> Chomper<M, T> {
    /// Brings up every subsystem against the given bus. A failure on any
    /// channel means no robot, not half a robot.
    pub fn new<B>(bus: &mut B, telemetry: T) -> Result<Self, MotorError>
    where
        B: MotorBus<Motor = M>,
    {
        Ok(Chomper {
            intake: Rc::new(RefCell::new(Intake::new(bus, telemetry)?)),
        })
    }
}
