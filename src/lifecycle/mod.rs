//! Startup, wiring and shutdown of the actor system.

mod checkout_system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use checkout_system::CheckoutSystem;
