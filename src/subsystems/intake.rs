use uom::si::angle::degree;
use uom::si::electric_current::ampere;
use uom::si::f64::{Angle, ElectricCurrent};

use crate::constants::intake::*;
use crate::constants::robotmap;
use crate::hal::{MotorBus, MotorConfig, MotorController, MotorError, MotorType};
use crate::subsystems::Subsystem;
use crate::telemetry::TelemetrySink;

/// Roller intake feeding a two-motor indexer belt. The second indexer motor
/// never takes commands of its own; it follows the leader inverted.
pub struct Intake<M: MotorController, T: TelemetrySink> {
    intake_motor: M,
    indexer_motor: M,
    indexer_follower: M,
    telemetry: T,
}

impl<M: MotorController, T: TelemetrySink> Intake<M, T> {
    /// Claims all three motors off the bus and configures them. Any
    /// acquisition or configuration failure aborts construction.
    pub fn new<B>(bus: &mut B, telemetry: T) -> Result<Self, MotorError>
    where
        B: MotorBus<Motor = M>,
    {
        let intake_motor = bus.motor(robotmap::intake::INTAKE_MOTOR, MotorType::Brushless)?;
        let indexer_motor = bus.motor(robotmap::intake::INDEXER_MOTOR, MotorType::Brushless)?;
        let indexer_follower =
            bus.motor(robotmap::intake::INDEXER_FOLLOWER, MotorType::Brushless)?;

        configure_intake_motor(&intake_motor)?;
        configure_indexer_motors(&indexer_motor, &indexer_follower)?;

        Ok(Self {
            intake_motor,
            indexer_motor,
            indexer_follower,
            telemetry,
        })
    }

    pub fn run_all(&self, speed: f64) {
        self.intake_motor.set(speed);
        self.indexer_motor.set(speed);
    }

    pub fn stop_all(&self) {
        self.intake_motor.stop();
        self.indexer_motor.stop();
    }

    pub fn run_intake(&self, speed: f64) {
        self.intake_motor.set(speed);
    }

    pub fn stop_intake(&self) {
        self.intake_motor.stop();
    }

    /// Runs the indexer belt; the follower tracks through its binding.
    pub fn run_indexer(&self, speed: f64) {
        self.indexer_motor.set(speed);
    }

    pub fn stop_indexer(&self) {
        self.indexer_motor.stop();
    }

    pub fn get_intake_current(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.intake_motor.output_current())
    }

    pub fn get_intake_position(&self) -> Angle {
        Angle::new::<degree>(self.intake_motor.position())
    }

    pub fn get_indexer_current(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.indexer_motor.output_current())
    }

    pub fn get_indexer_position(&self) -> Angle {
        Angle::new::<degree>(self.indexer_motor.position())
    }

    pub fn get_indexer_follower_current(&self) -> ElectricCurrent {
        ElectricCurrent::new::<ampere>(self.indexer_follower.output_current())
    }

    pub fn get_indexer_follower_position(&self) -> Angle {
        Angle::new::<degree>(self.indexer_follower.position())
    }
}

impl<M: MotorController, T: TelemetrySink> Subsystem for Intake<M, T> {
    async fn periodic(&self) {
        self.telemetry
            .put_number("intake.current", self.get_intake_current().get::<ampere>())
            .await;
        self.telemetry
            .put_number("indexer.current", self.get_indexer_current().get::<ampere>())
            .await;
        self.telemetry
            .put_number(
                "indexer.follower.current",
                self.get_indexer_follower_current().get::<ampere>(),
            )
            .await;
    }
}

fn configure_intake_motor<M: MotorController>(motor: &M) -> Result<(), MotorError> {
    let config = MotorConfig {
        idle_mode: INTAKE_IDLE_MODE,
        current_limit_amps: INTAKE_CURRENT_LIMIT_AMPS,
        position_conversion_factor: INTAKE_GEARBOX_RATIO,
        velocity_conversion_factor: 1.,
    };

    motor.configure(&config)
}

fn configure_indexer_motors<M: MotorController>(
    leader: &M,
    follower: &M,
) -> Result<(), MotorError> {
    let config = MotorConfig {
        idle_mode: INDEXER_IDLE_MODE,
        current_limit_amps: INDEXER_CURRENT_LIMIT_AMPS,
        position_conversion_factor: INTAKE_GEARBOX_RATIO,
        velocity_conversion_factor: 1.,
    };

    leader.configure(&config)?;
    follower.configure(&config)?;
    follower.follow(leader, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::robotmap::intake::{INDEXER_FOLLOWER, INDEXER_MOTOR, INTAKE_MOTOR};
    use crate::hal::sim::{SimBus, SimMotor};
    use crate::telemetry::SimTelemetry;

    fn intake_on_bus() -> (Intake<SimMotor, SimTelemetry>, SimBus, SimTelemetry) {
        let mut bus = SimBus::new();
        let telemetry = SimTelemetry::new();
        let intake = Intake::new(&mut bus, telemetry.clone()).unwrap();
        (intake, bus, telemetry)
    }

    fn commanded(bus: &SimBus, can_id: i32) -> f64 {
        bus.state(can_id).unwrap().borrow().commanded()
    }

    fn applied(bus: &SimBus, can_id: i32) -> f64 {
        bus.state(can_id).unwrap().borrow().applied_output()
    }

    fn config_of(bus: &SimBus, can_id: i32) -> MotorConfig {
        bus.state(can_id).unwrap().borrow().config().cloned().unwrap()
    }

    #[test]
    fn construction_applies_the_motor_configs() {
        let (_intake, bus, _) = intake_on_bus();

        let intake_config = config_of(&bus, INTAKE_MOTOR);
        assert_eq!(intake_config.idle_mode, INTAKE_IDLE_MODE);
        assert_eq!(intake_config.current_limit_amps, INTAKE_CURRENT_LIMIT_AMPS);
        assert_eq!(intake_config.position_conversion_factor, INTAKE_GEARBOX_RATIO);
        assert_eq!(intake_config.velocity_conversion_factor, 1.);

        let leader_config = config_of(&bus, INDEXER_MOTOR);
        assert_eq!(leader_config.idle_mode, INDEXER_IDLE_MODE);
        assert_eq!(leader_config.current_limit_amps, INDEXER_CURRENT_LIMIT_AMPS);
        assert_eq!(leader_config.position_conversion_factor, INTAKE_GEARBOX_RATIO);

        // Follower inherits the leader config and binds inverted
        assert_eq!(config_of(&bus, INDEXER_FOLLOWER), leader_config);
        assert_eq!(
            bus.state(INDEXER_FOLLOWER).unwrap().borrow().following(),
            Some((INDEXER_MOTOR, true))
        );
    }

    #[test]
    fn run_all_commands_both_sides_and_inverts_the_follower() {
        let (intake, bus, _) = intake_on_bus();

        for speed in [-1., -0.3, 0., 0.45, 1.] {
            intake.run_all(speed);

            assert_eq!(commanded(&bus, INTAKE_MOTOR), speed);
            assert_eq!(commanded(&bus, INDEXER_MOTOR), speed);
            assert_eq!(applied(&bus, INDEXER_FOLLOWER), -speed);
        }
    }

    #[test]
    fn stop_all_zeroes_both_sides_from_any_state() {
        let (intake, bus, _) = intake_on_bus();

        intake.run_all(0.8);
        intake.stop_all();

        assert_eq!(commanded(&bus, INTAKE_MOTOR), 0.);
        assert_eq!(commanded(&bus, INDEXER_MOTOR), 0.);
        assert_eq!(applied(&bus, INDEXER_FOLLOWER), 0.);
    }

    #[test]
    fn stopping_twice_matches_stopping_once() {
        let (intake, bus, _) = intake_on_bus();

        intake.run_all(0.6);
        intake.stop_all();
        let after_once = (
            commanded(&bus, INTAKE_MOTOR),
            commanded(&bus, INDEXER_MOTOR),
            applied(&bus, INDEXER_FOLLOWER),
        );

        intake.stop_all();
        let after_twice = (
            commanded(&bus, INTAKE_MOTOR),
            commanded(&bus, INDEXER_MOTOR),
            applied(&bus, INDEXER_FOLLOWER),
        );

        assert_eq!(after_once, after_twice);
        assert_eq!(after_twice, (0., 0., 0.));
    }

    #[test]
    fn intake_controls_leave_the_indexer_alone() {
        let (intake, bus, _) = intake_on_bus();
        intake.run_indexer(0.5);

        intake.run_intake(0.7);
        assert_eq!(commanded(&bus, INTAKE_MOTOR), 0.7);
        assert_eq!(commanded(&bus, INDEXER_MOTOR), 0.5);
        assert_eq!(commanded(&bus, INDEXER_FOLLOWER), 0.);
        assert_eq!(applied(&bus, INDEXER_FOLLOWER), -0.5);

        intake.stop_intake();
        assert_eq!(commanded(&bus, INTAKE_MOTOR), 0.);
        assert_eq!(commanded(&bus, INDEXER_MOTOR), 0.5);
        assert_eq!(applied(&bus, INDEXER_FOLLOWER), -0.5);
    }

    #[test]
    fn indexer_controls_leave_the_intake_alone() {
        let (intake, bus, _) = intake_on_bus();
        intake.run_intake(0.7);

        intake.run_indexer(-0.4);
        assert_eq!(commanded(&bus, INDEXER_MOTOR), -0.4);
        assert_eq!(applied(&bus, INDEXER_FOLLOWER), 0.4);
        assert_eq!(commanded(&bus, INTAKE_MOTOR), 0.7);

        intake.stop_indexer();
        assert_eq!(commanded(&bus, INDEXER_MOTOR), 0.);
        assert_eq!(applied(&bus, INDEXER_FOLLOWER), 0.);
        assert_eq!(commanded(&bus, INTAKE_MOTOR), 0.7);
    }

    #[tokio::test]
    async fn periodic_publishes_the_three_current_samples() {
        let (intake, bus, telemetry) = intake_on_bus();

        bus.state(INTAKE_MOTOR)
            .unwrap()
            .borrow_mut()
            .set_output_current(4.5);
        bus.state(INDEXER_MOTOR)
            .unwrap()
            .borrow_mut()
            .set_output_current(7.25);
        bus.state(INDEXER_FOLLOWER)
            .unwrap()
            .borrow_mut()
            .set_output_current(6.75);

        intake.periodic().await;

        assert_eq!(
            telemetry.samples(),
            vec![
                ("intake.current".to_owned(), 4.5),
                ("indexer.current".to_owned(), 7.25),
                ("indexer.follower.current".to_owned(), 6.75),
            ]
        );
    }

    #[test]
    fn position_accessors_convert_to_degrees() {
        let (intake, bus, _) = intake_on_bus();
        bus.state(INTAKE_MOTOR).unwrap().borrow_mut().set_position(72.);

        assert_eq!(intake.get_intake_position().get::<degree>(), 72.);
        assert_eq!(intake.get_indexer_position().get::<degree>(), 0.);
    }

    #[test]
    fn any_dead_port_aborts_construction() {
        for port in [INTAKE_MOTOR, INDEXER_MOTOR, INDEXER_FOLLOWER] {
            let mut bus = SimBus::new();
            bus.fail_port(port);

            let result = Intake::new(&mut bus, SimTelemetry::new());
            assert_eq!(result.err(), Some(MotorError::Acquisition(port)));
        }
    }

    #[test]
    fn a_rejected_configuration_aborts_construction() {
        let mut bus = SimBus::new();
        bus.reject_config(INDEXER_FOLLOWER);

        let result = Intake::new(&mut bus, SimTelemetry::new());
        assert_eq!(result.err(), Some(MotorError::ConfigRejected(INDEXER_FOLLOWER)));
    }
}
