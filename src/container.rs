use crate::constants::intake::FEED_SPEED;
use crate::hal::MotorController;
use crate::subsystems::Intake;
use crate::telemetry::{Dashboard, TelemetrySink};

/// Maps operator entries on the dashboard onto the intake's control surface.
/// `feed` overrides the per-mechanism commands and runs the whole mechanism
/// at feed speed; otherwise `intake command` and `indexer command` drive
/// their side directly, and an absent or zero entry stops it.
pub async fn control_intake<M: MotorController, T: TelemetrySink>(
    intake: &Intake<M, T>,
    dashboard: &Dashboard,
) {
    if dashboard.get_number("feed").await.is_some_and(|v| v != 0.) {
        intake.run_all(FEED_SPEED);
        return;
    }

    match dashboard.get_number("intake command").await {
        Some(speed) if speed != 0. => intake.run_intake(speed),
        _ => intake.stop_intake(),
    }

    match dashboard.get_number("indexer command").await {
        Some(speed) if speed != 0. => intake.run_indexer(speed),
        _ => intake.stop_indexer(),
    }
}
