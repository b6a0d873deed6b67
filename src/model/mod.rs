//! Pure data structures (DTOs) managed by the actors.
//!
//! Each resource type lives in its own file together with its create/update payloads.
//! The [`ActorEntity`](actor_framework::ActorEntity) implementations are in the
//! corresponding `*_actor` modules.

pub mod branch;
pub mod ids;
pub mod order;
pub mod product;
pub mod stock;
pub mod transaction;

pub use branch::*;
pub use ids::*;
pub use order::*;
pub use product::*;
pub use stock::*;
pub use transaction::*;
