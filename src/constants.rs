pub const FPS_LIMIT: f64 = 250.;

pub mod robotmap {
    pub mod intake {
        pub const INTAKE_MOTOR: i32 = 12;

        pub const INDEXER_MOTOR: i32 = 13;
        pub const INDEXER_FOLLOWER: i32 = 14;
    }
}

pub mod intake {
    use crate::hal::IdleMode;

    pub const INTAKE_IDLE_MODE: IdleMode = IdleMode::Coast;
    pub const INTAKE_CURRENT_LIMIT_AMPS: i32 = 40;

    // Output degrees per motor rotation through the 5:1 roller gearbox
    pub const INTAKE_GEARBOX_RATIO: f64 = 360. / 5.;

    pub const INDEXER_IDLE_MODE: IdleMode = IdleMode::Brake;
    pub const INDEXER_CURRENT_LIMIT_AMPS: i32 = 30;
    // TODO: confirm with mechanical whether the indexer belt shares the intake
    // gearbox; its position conversion currently borrows INTAKE_GEARBOX_RATIO

    pub const FEED_SPEED: f64 = 0.5;
}
