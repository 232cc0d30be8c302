mod intake;

pub use intake::*;

/// Per-cycle hook the scheduler loop drives. Implementations only observe
/// and publish; commanding hardware belongs to the control operations.
#[allow(async_fn_in_trait)]
pub trait Subsystem {
    async fn periodic(&self);
}
