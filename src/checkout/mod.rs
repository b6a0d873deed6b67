//! Multi-line checkout with all-or-nothing semantics.

mod coordinator;
pub mod error;

pub use coordinator::CheckoutCoordinator;
pub use error::*;
