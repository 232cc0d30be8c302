//! In-process motor controllers for desktop runs and headless tests. Every
//! acquired channel shares its state through the bus so tests can inspect
//! commands and inject sensor readings.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::hal::{MotorBus, MotorConfig, MotorController, MotorError, MotorType};

pub type SharedMotorState = Rc<RefCell<SimMotorState>>;

pub struct SimMotorState {
    can_id: i32,
    kind: MotorType,
    commanded: f64,
    config: Option<MotorConfig>,
    leader: Option<(SharedMotorState, bool)>,
    output_current: f64,
    position: f64,
    reject_config: bool,
}

impl SimMotorState {
    pub fn can_id(&self) -> i32 {
        self.can_id
    }

    pub fn kind(&self) -> MotorType {
        self.kind
    }

    /// Last duty cycle written to this channel, after firmware clamping.
    pub fn commanded(&self) -> f64 {
        self.commanded
    }

    /// Duty cycle the channel actually drives: its own command, or the
    /// leader's output through the follower binding.
    pub fn applied_output(&self) -> f64 {
        match &self.leader {
            Some((leader, inverted)) => {
                let output = leader.borrow().applied_output();
                if *inverted {
                    -output
                } else {
                    output
                }
            }
            None => self.commanded,
        }
    }

    pub fn config(&self) -> Option<&MotorConfig> {
        self.config.as_ref()
    }

    /// Leader CAN id and inversion flag when this channel is a follower.
    pub fn following(&self) -> Option<(i32, bool)> {
        self.leader
            .as_ref()
            .map(|(leader, inverted)| (leader.borrow().can_id, *inverted))
    }

    pub fn set_output_current(&mut self, amps: f64) {
        self.output_current = amps;
    }

    pub fn set_position(&mut self, degrees: f64) {
        self.position = degrees;
    }
}

#[derive(Clone)]
pub struct SimMotor {
    state: SharedMotorState,
}

impl MotorController for SimMotor {
    fn configure(&self, config: &MotorConfig) -> Result<(), MotorError> {
        let mut state = self.state.borrow_mut();
        if state.reject_config {
            return Err(MotorError::ConfigRejected(state.can_id));
        }
        state.config = Some(config.clone());
        Ok(())
    }

    fn follow(&self, leader: &Self, inverted: bool) -> Result<(), MotorError> {
        // A channel following itself would loop forever in the firmware too
        if Rc::ptr_eq(&self.state, &leader.state) {
            return Err(MotorError::ConfigRejected(self.state.borrow().can_id));
        }
        self.state.borrow_mut().leader = Some((leader.state.clone(), inverted));
        Ok(())
    }

    fn set(&self, speed: f64) {
        self.state.borrow_mut().commanded = speed.clamp(-1., 1.);
    }

    fn stop(&self) {
        self.state.borrow_mut().commanded = 0.;
    }

    fn output_current(&self) -> f64 {
        self.state.borrow().output_current
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }
}

#[derive(Default)]
pub struct SimBus {
    states: HashMap<i32, SharedMotorState>,
    dead_ports: HashSet<i32>,
    rejecting_ports: HashSet<i32>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rig acquisition to fail on this CAN id, as if nothing answered.
    pub fn fail_port(&mut self, can_id: i32) {
        self.dead_ports.insert(can_id);
    }

    /// Rig the controller on this CAN id to refuse configuration.
    pub fn reject_config(&mut self, can_id: i32) {
        self.rejecting_ports.insert(can_id);
    }

    /// State handle for an already-acquired channel.
    pub fn state(&self, can_id: i32) -> Option<SharedMotorState> {
        self.states.get(&can_id).cloned()
    }
}

impl MotorBus for SimBus {
    type Motor = SimMotor;

    fn motor(&mut self, can_id: i32, kind: MotorType) -> Result<SimMotor, MotorError> {
        if self.dead_ports.contains(&can_id) || self.states.contains_key(&can_id) {
            return Err(MotorError::Acquisition(can_id));
        }

        let state = Rc::new(RefCell::new(SimMotorState {
            can_id,
            kind,
            commanded: 0.,
            config: None,
            leader: None,
            output_current: 0.,
            position: 0.,
            reject_config: self.rejecting_ports.contains(&can_id),
        }));
        self.states.insert(can_id, state.clone());

        Ok(SimMotor { state })
    }
}
