//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns a store of entities
//! and processes requests against it one at a time.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Concurrency Model
/// The actor owns its `store` and the receiving end of its channel. Messages are processed
/// sequentially in [`ResourceActor::run`], so a request that reads and then writes an
/// entity (an `Action`, an `Upsert`) happens as one indivisible step: no other request for
/// this actor can observe or interleave with the intermediate state. No `Mutex` is needed.
///
/// Independent actors run in parallel. [`ActorRegistry`](crate::ActorRegistry) uses that to
/// give every id an actor of its own.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Counter { id: u32, hits: u32 }
/// #[derive(Debug)] struct CounterCreate;
/// #[derive(Debug)] enum CounterAction { Hit }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Id = u32;
///     type Create = CounterCreate;
///     type Update = ();
///     type Action = CounterAction;
///     type ActionResult = u32;
///     type Filter = ();
///     type Context = ();
///     type Error = CounterError;
///
///     fn id(&self) -> u32 { self.id }
///     fn from_create_params(seq: u32, _: CounterCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id: seq, hits: 0 })
///     }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u32, Self::Error> {
///         self.hits += 1;
///         Ok(self.hits)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Counter>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(CounterCreate).await.unwrap();
///     assert_eq!(client.perform_action(id, CounterAction::Hit).await.unwrap(), 1);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_seq: u64,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full, callers
    /// wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_seq: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Builds an entity that is not stored yet, running `from_create_params` and `on_create`.
    ///
    /// Fails with [`FrameworkError::SequenceExhausted`] once `seq` no longer fits the
    /// `u32` handed to entities.
    async fn admit(
        &self,
        seq: u64,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let seq = u32::try_from(seq).map_err(|_| FrameworkError::SequenceExhausted)?;
        let mut item = T::from_create_params(seq, params).map_err(FrameworkError::entity)?;
        let id = item.id();
        if self.store.contains_key(&id) {
            return Err(FrameworkError::AlreadyExists(id.to_string()));
        }
        item.on_create(context).await.map_err(FrameworkError::entity)?;
        Ok(item)
    }

    /// Admits every payload or none of them.
    async fn admit_all(
        &self,
        params: Vec<T::Create>,
        context: &T::Context,
    ) -> Result<Vec<T>, FrameworkError> {
        let mut staged: Vec<T> = Vec::with_capacity(params.len());
        let mut seq = self.next_seq;
        for p in params {
            let item = self.admit(seq, p, context).await?;
            let id = item.id();
            if staged.iter().any(|s| s.id() == id) {
                return Err(FrameworkError::AlreadyExists(id.to_string()));
            }
            staged.push(item);
            seq += 1;
        }
        Ok(staged)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook. This allows entities
    /// to access external dependencies (like other clients) that were created *after*
    /// the actor was instantiated but *before* the loop started.
    pub async fn run(mut self, context: T::Context) {
        // Just the type name, e.g. "StockEntry"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = match self.admit(self.next_seq, params, &context).await {
                        Ok(item) => {
                            let id = item.id();
                            self.next_seq += 1;
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            Ok(id)
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            Err(e)
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::CreateMany { params, respond_to } => {
                    let count = params.len();
                    debug!(entity_type, count, "CreateMany");
                    let result = match self.admit_all(params, &context).await {
                        Ok(items) => {
                            self.next_seq += items.len() as u64;
                            for item in &items {
                                self.store.insert(item.id(), item.clone());
                            }
                            info!(entity_type, count, size = self.store.len(), "Created batch");
                            Ok(items)
                        }
                        Err(e) => {
                            warn!(entity_type, count, error = %e, "Batch rejected, nothing stored");
                            Err(e)
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&filter))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?filter, matched = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::entity(e)));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::entity(e)));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(FrameworkError::entity);
                        match &result {
                            Ok(outcome) => info!(entity_type, %id, ?outcome, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Upsert {
                    id,
                    params,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Upsert");
                    let result = if let Some(item) = self.store.get_mut(&id) {
                        match item.handle_action(action, &context).await {
                            Ok(_) => {
                                info!(entity_type, %id, "Upsert applied");
                                Ok(item.clone())
                            }
                            Err(e) => Err(FrameworkError::entity(e)),
                        }
                    } else {
                        match self.admit(self.next_seq, params, &context).await {
                            Ok(item) if item.id() != id => Err(FrameworkError::IdMismatch {
                                expected: id.to_string(),
                                actual: item.id().to_string(),
                            }),
                            Ok(item) => {
                                self.next_seq += 1;
                                self.store.insert(id.clone(), item.clone());
                                info!(entity_type, %id, size = self.store.len(), "Upsert created");
                                Ok(item)
                            }
                            Err(e) => Err(e),
                        }
                    };
                    if let Err(e) = &result {
                        warn!(entity_type, %id, error = %e, "Upsert failed");
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
