//! # Generic Messages
//!
//! The request enum exchanged between [`ResourceClient`](crate::ResourceClient) and
//! [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The CRUD variants cover the lifecycle of any resource; `Action` carries
/// resource-specific logic. Three variants go beyond plain CRUD:
///
/// - **CreateMany**: creates every entity or none (one message, one indivisible step).
/// - **List**: returns the entities selected by an [`ActorEntity::Filter`].
/// - **Upsert**: applies an action to an existing entity, or creates it when absent.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    CreateMany {
        params: Vec<T::Create>,
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: T::Filter,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Upsert {
        id: T::Id,
        params: T::Create,
        action: T::Action,
        respond_to: Response<T>,
    },
}
