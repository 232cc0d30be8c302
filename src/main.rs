use tokio::task;
use tokio::time::{sleep, Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chomper::constants::FPS_LIMIT;
use chomper::container::control_intake;
use chomper::hal::sim::SimBus;
use chomper::subsystems::Subsystem;
use chomper::telemetry::{Dashboard, TelemetrySink};
use chomper::Chomper;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let local = task::LocalSet::new();

    runtime.block_on(local.run_until(async {
        let dashboard = Dashboard::init(5807);

        // Desktop runs drive the sim bus; the CAN binding lives out of tree
        let mut bus = SimBus::new();
        let robot = Chomper::new(&mut bus, dashboard.clone())
            .expect("subsystem bring-up failed, refusing to schedule");

        let mut last_loop = Instant::now();
        let mut was_enabled = false;

        loop {
            let enabled = dashboard
                .get_number("enabled")
                .await
                .is_some_and(|v| v != 0.);

            if enabled && !was_enabled {
                info!("Teleop init");
            } else if !enabled && was_enabled {
                info!("Disabled init");
            }
            was_enabled = enabled;

            if let Ok(intake) = robot.intake.try_borrow() {
                if enabled {
                    control_intake(&intake, &dashboard).await;
                } else {
                    intake.stop_all();
                }

                intake.periodic().await;
            }

            dashboard
                .put_number("Loop Rate", 1. / last_loop.elapsed().as_secs_f64())
                .await;

            let elapsed = last_loop.elapsed().as_secs_f64();
            let left = (1. / FPS_LIMIT - elapsed).max(0.);
            sleep(Duration::from_secs_f64(left)).await;
            last_loop = Instant::now();
        }
    }));
}
