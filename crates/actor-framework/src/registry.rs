//! # Actor Registry
//!
//! One [`ResourceActor`] per id, spawned the first time the id is written.
//!
//! Each id gets its own task and its own queue, so requests for one id are handled in
//! arrival order while requests for different ids never wait on each other. The registry
//! itself is only consulted to find the client for an id; the lock guarding that lookup
//! is released before any request is sent.

use crate::actor::ResourceActor;
use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

struct Registry<T: ActorEntity> {
    actors: RwLock<HashMap<T::Id, ResourceClient<T>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    context: T::Context,
    buffer_size: usize,
}

/// Routes every request for an id to the actor that owns that id alone.
pub struct ActorRegistry<T: ActorEntity> {
    inner: Arc<Registry<T>>,
}

impl<T: ActorEntity> Clone for ActorRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ActorEntity> ActorRegistry<T>
where
    T::Context: Clone,
{
    /// Creates an empty registry. Actors spawned later get `buffer_size` and a clone of `context`.
    pub fn new(buffer_size: usize, context: T::Context) -> Self {
        Self {
            inner: Arc::new(Registry {
                actors: RwLock::new(HashMap::new()),
                handles: Mutex::new(Vec::new()),
                context,
                buffer_size,
            }),
        }
    }

    /// Number of ids with an actor.
    pub fn len(&self) -> usize {
        self.inner.actors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The client of the actor owning `id`, if one exists.
    pub fn client(&self, id: &T::Id) -> Option<ResourceClient<T>> {
        self.inner.actors.read().get(id).cloned()
    }

    /// Serves `id` from an actor run elsewhere (or a mock) instead of spawning one.
    pub fn register(&self, id: T::Id, client: ResourceClient<T>) {
        self.inner.actors.write().insert(id, client);
    }

    fn client_or_spawn(&self, id: &T::Id) -> ResourceClient<T> {
        if let Some(client) = self.client(id) {
            return client;
        }
        let mut actors = self.inner.actors.write();
        // Another caller may have spawned it between the two locks.
        if let Some(client) = actors.get(id) {
            return client.clone();
        }
        let (actor, client) = ResourceActor::new(self.inner.buffer_size);
        let handle = tokio::spawn(actor.run(self.inner.context.clone()));
        self.inner.handles.lock().push(handle);
        actors.insert(id.clone(), client.clone());
        debug!(%id, actors = actors.len(), "Spawned actor");
        client
    }

    /// Reads the entity under `id`; an id without an actor has no entity.
    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        match self.client(&id) {
            Some(client) => client.get(id).await,
            None => Ok(None),
        }
    }

    /// Sends `action` to the actor owning `id`. Never spawns.
    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let client = self
            .client(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        client.perform_action(id, action).await
    }

    /// Upserts on the actor owning `id`, spawning that actor first if needed.
    pub async fn upsert(
        &self,
        id: T::Id,
        params: T::Create,
        action: T::Action,
    ) -> Result<T, FrameworkError> {
        self.client_or_spawn(&id).upsert(id, params, action).await
    }

    /// Lists matching entities across every actor.
    ///
    /// Actors are asked one after another, so the result is not a single point-in-time
    /// snapshot; each entity is as of the moment its actor answered.
    pub async fn list(&self, filter: T::Filter) -> Result<Vec<T>, FrameworkError>
    where
        T::Filter: Clone,
    {
        let clients: Vec<ResourceClient<T>> = self.inner.actors.read().values().cloned().collect();
        let mut items = Vec::new();
        for client in clients {
            items.extend(client.list(filter.clone()).await?);
        }
        Ok(items)
    }

    /// Forgets every actor and hands back the tasks it spawned.
    ///
    /// Once the remaining clones of their clients are dropped, the actors drain their
    /// queues and the handles complete.
    pub fn close(&self) -> Vec<JoinHandle<()>> {
        self.inner.actors.write().clear();
        std::mem::take(&mut *self.inner.handles.lock())
    }
}
