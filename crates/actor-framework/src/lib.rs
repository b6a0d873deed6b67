//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor systems. Each kind of resource (a stock
//! row, a transaction line, a catalog item) is owned by an actor task; everything else
//! talks to it through a cloneable client by sending messages.
//!
//! ## Why Actors for Resources?
//!
//! - Isolated state: an actor's store is only ever touched by its own task, so no locks.
//! - Sequential processing: a read-modify-write on one entity (e.g. "reserve 3 units if
//!   at least 3 are available") is a single message and cannot interleave with another.
//! - Uniform surface: every resource gets the same CRUD requests plus its own `Action` enum.
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model)
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - business rules for one resource kind
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing and the store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorRegistry`]) - type-safe communication
//!
//! ## Defining an Entity
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Bin {
//!     id: u32,
//!     label: String,
//!     units: u32,
//! }
//!
//! #[derive(Debug)] struct BinCreate { label: String }
//! #[derive(Debug)] struct BinUpdate { label: Option<String> }
//! #[derive(Debug)] enum BinAction { Take(u32) }
//! #[derive(Debug, thiserror::Error)] #[error("bin is short")] struct BinError;
//!
//! #[async_trait]
//! impl ActorEntity for Bin {
//!     type Id = u32;
//!     type Create = BinCreate;
//!     type Update = BinUpdate;
//!     type Action = BinAction;
//!     type ActionResult = u32;
//!     type Filter = ();
//!     type Context = ();
//!     type Error = BinError;
//!
//!     fn id(&self) -> u32 { self.id }
//!
//!     fn from_create_params(seq: u32, params: BinCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id: seq, label: params.label, units: 10 })
//!     }
//!
//!     async fn on_update(&mut self, update: BinUpdate, _ctx: &()) -> Result<(), Self::Error> {
//!         if let Some(label) = update.label { self.label = label; }
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: BinAction, _ctx: &()) -> Result<u32, Self::Error> {
//!         match action {
//!             BinAction::Take(n) if n <= self.units => { self.units -= n; Ok(self.units) }
//!             BinAction::Take(_) => Err(BinError),
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Bin>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(BinCreate { label: "A1".into() }).await.unwrap();
//!     assert_eq!(client.perform_action(id, BinAction::Take(4)).await.unwrap(), 6);
//!     assert!(client.perform_action(id, BinAction::Take(7)).await.is_err());
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected when the loop starts (`actor.run(context)`), not at
//! construction. All actors can be created first and wired afterwards, which avoids
//! construction-order cycles between actors that call each other.
//!
//! ## One Actor per Id
//!
//! [`ActorRegistry`] spawns a dedicated actor the first time an id is upserted. Requests
//! for that id are serialized by its actor; requests for other ids run on other tasks and
//! never queue behind it.
//!
//! ## Testing
//!
//! The [`mock`] module hands out a real `ResourceClient<T>` answered from a queue of
//! expectations, which is the easiest way to inject failures (a closed actor, a rejected
//! batch) into code built on top of the clients.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod registry;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use registry::ActorRegistry;
