//! # ActorEntity Trait
//!
//! The contract every resource (stock row, transaction line, catalog item, ...) implements
//! to be managed by the generic [`ResourceActor`](crate::ResourceActor). Associated types pin
//! down the id, the DTOs, the custom actions and the list filter, so a stock credit can never
//! be sent to the transaction log by mistake.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::matches`] (every entity matches by default)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! The default hooks do nothing (`Ok(())`).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Identity
/// Entities know their own id ([`ActorEntity::id`]). On creation the actor hands out a
/// monotonically increasing sequence number; entities with generated ids use it, entities
/// with natural keys (e.g. a `(branch, product)` pair) ignore it. The actor refuses to
/// create a second entity under an existing id.
///
/// # Async & Context
/// Hooks are `async` so they may call other actors. `Context` is injected into every hook
/// at `run()` time ("late binding"), which keeps construction free of dependency cycles.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum of resource-specific operations (e.g. `Reserve`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Predicate type accepted by `List` requests.
    type Filter: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The per-actor error type reported by hooks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The id this entity is stored under.
    fn id(&self) -> Self::Id;

    /// Construct the full entity from the creation payload.
    ///
    /// `seq` is the store's next sequence number (starting at 1). It is only consumed
    /// when the entity is actually stored.
    fn from_create_params(seq: u32, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether this entity is selected by `filter` in a `List` request.
    fn matches(&self, _filter: &Self::Filter) -> bool {
        true
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed. Returning an error vetoes the delete.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    ///
    /// The actor processes one message at a time, so everything done here against `self`
    /// is atomic with respect to every other request for the same actor.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
