use actor_framework::mock::create_mock_client;
use actor_framework::{ActorEntity, ActorRegistry, FrameworkError, ResourceActor};
use std::time::Duration;
use async_trait::async_trait;

// --- Test Entity ---

/// A counter keyed by a natural string key.
#[derive(Clone, Debug, PartialEq)]
struct Tally {
    key: String,
    count: u32,
    created_seq: u32,
}

#[derive(Debug)]
struct TallyCreate {
    key: String,
    start: u32,
}

#[derive(Debug)]
struct TallyUpdate {
    count: Option<u32>,
}

#[derive(Debug)]
enum TallyAction {
    Add(u32),
    Take(u32),
}

#[derive(Debug, Clone)]
struct AtLeast(u32);

#[derive(Debug, thiserror::Error)]
enum TallyError {
    #[error("empty key")]
    EmptyKey,
    #[error("not enough: {0}")]
    NotEnough(u32),
    #[error("locked")]
    Locked,
}

#[async_trait]
impl ActorEntity for Tally {
    type Id = String;
    type Create = TallyCreate;
    type Update = TallyUpdate;
    type Action = TallyAction;
    type ActionResult = u32;
    type Filter = AtLeast;
    type Context = ();
    type Error = TallyError;

    fn id(&self) -> String {
        self.key.clone()
    }

    fn from_create_params(seq: u32, params: TallyCreate) -> Result<Self, Self::Error> {
        if params.key.is_empty() {
            return Err(TallyError::EmptyKey);
        }
        Ok(Self {
            key: params.key,
            count: params.start,
            created_seq: seq,
        })
    }

    fn matches(&self, filter: &AtLeast) -> bool {
        self.count >= filter.0
    }

    async fn on_update(&mut self, update: TallyUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(count) = update.count {
            self.count = count;
        }
        Ok(())
    }

    async fn on_delete(&self, _ctx: &()) -> Result<(), Self::Error> {
        if self.key == "locked" {
            return Err(TallyError::Locked);
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: TallyAction, _ctx: &()) -> Result<u32, Self::Error> {
        match action {
            TallyAction::Add(n) => self.count += n,
            TallyAction::Take(n) if n <= self.count => self.count -= n,
            TallyAction::Take(_) => return Err(TallyError::NotEnough(self.count)),
        }
        Ok(self.count)
    }
}

fn tally(key: &str, start: u32) -> TallyCreate {
    TallyCreate {
        key: key.into(),
        start,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run(()));

    // 1. Create
    let id = client.create(tally("apples", 3)).await.unwrap();
    assert_eq!(id, "apples");

    // 2. Action
    assert_eq!(client.perform_action(id.clone(), TallyAction::Add(2)).await.unwrap(), 5);

    // 3. Action rejected by the entity, state untouched
    let err = client
        .perform_action(id.clone(), TallyAction::Take(9))
        .await
        .unwrap_err();
    assert!(matches!(
        err.entity_error::<TallyError>(),
        Some(TallyError::NotEnough(5))
    ));
    assert_eq!(client.get(id.clone()).await.unwrap().unwrap().count, 5);

    // 4. Update
    let updated = client
        .update(id.clone(), TallyUpdate { count: Some(1) })
        .await
        .unwrap();
    assert_eq!(updated.count, 1);

    // 5. Delete
    client.delete(id.clone()).await.unwrap();
    assert!(client.get(id.clone()).await.unwrap().is_none());

    // 6. Action on a missing entity
    let missing = client.perform_action(id, TallyAction::Add(1)).await;
    assert!(matches!(missing, Err(FrameworkError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_create_is_rejected() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run(()));

    client.create(tally("pears", 1)).await.unwrap();
    let again = client.create(tally("pears", 7)).await;
    assert!(matches!(again, Err(FrameworkError::AlreadyExists(_))));
    assert_eq!(client.get("pears".into()).await.unwrap().unwrap().count, 1);
}

#[tokio::test]
async fn test_delete_veto_keeps_entity() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run(()));

    client.create(tally("locked", 1)).await.unwrap();
    let result = client.delete("locked".into()).await;
    assert!(result.is_err());
    assert!(client.get("locked".into()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_create_many_is_all_or_nothing() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run(()));

    // Second payload is invalid: nothing from the batch may be stored.
    let result = client
        .create_many(vec![tally("a", 1), tally("", 1), tally("c", 1)])
        .await;
    assert!(result.is_err());
    assert!(client.get("a".into()).await.unwrap().is_none());

    // Duplicates inside one batch are rejected too.
    let result = client.create_many(vec![tally("d", 1), tally("d", 2)]).await;
    assert!(matches!(result, Err(FrameworkError::AlreadyExists(_))));
    assert!(client.get("d".into()).await.unwrap().is_none());

    let stored = client
        .create_many(vec![tally("x", 1), tally("y", 2)])
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    // Sequence numbers are consecutive and only consumed by stored entities.
    assert_eq!(stored[0].created_seq, 1);
    assert_eq!(stored[1].created_seq, 2);
}

#[tokio::test]
async fn test_upsert_creates_then_applies() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run(()));

    let created = client
        .upsert("plums".into(), tally("plums", 4), TallyAction::Add(4))
        .await
        .unwrap();
    assert_eq!(created.count, 4);

    let applied = client
        .upsert("plums".into(), tally("plums", 4), TallyAction::Add(4))
        .await
        .unwrap();
    assert_eq!(applied.count, 8);

    let mismatch = client
        .upsert("figs".into(), tally("dates", 1), TallyAction::Add(1))
        .await;
    assert!(matches!(mismatch, Err(FrameworkError::IdMismatch { .. })));
    assert!(client.get("dates".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_applies_filter() {
    let (actor, client) = ResourceActor::<Tally>::new(10);
    tokio::spawn(actor.run(()));

    for (key, start) in [("a", 1), ("b", 5), ("c", 9)] {
        client.create(tally(key, start)).await.unwrap();
    }

    let mut keys: Vec<String> = client
        .list(AtLeast(5))
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.key)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["b", "c"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_registry_serializes_actions_per_id() {
    let registry = ActorRegistry::<Tally>::new(16, ());

    for key in ["k1", "k2", "k3", "k4", "k5"] {
        registry
            .upsert(key.into(), tally(key, 0), TallyAction::Add(0))
            .await
            .unwrap();
    }
    assert_eq!(registry.len(), 5);

    // 50 concurrent takers compete for 10 units of k1: exactly 10 succeed.
    registry
        .perform_action("k1".into(), TallyAction::Add(10))
        .await
        .unwrap();
    let mut handles = Vec::new();
    for _ in 0..50 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry.perform_action("k1".into(), TallyAction::Take(1)).await
        }));
    }
    let mut ok = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            ok += 1;
        }
    }
    assert_eq!(ok, 10);
    assert_eq!(registry.get("k1".into()).await.unwrap().unwrap().count, 0);

    // Listing visits every actor.
    assert_eq!(registry.list(AtLeast(0)).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_registry_gives_each_id_its_own_actor() {
    let registry = ActorRegistry::<Tally>::new(16, ());
    for key in ["a", "b"] {
        registry
            .upsert(key.into(), tally(key, 1), TallyAction::Add(1))
            .await
            .unwrap();
    }

    let a = registry.client(&"a".to_string()).unwrap();
    let b = registry.client(&"b".to_string()).unwrap();
    assert!(!a.same_actor(&b));
    assert!(a.same_actor(&registry.client(&"a".to_string()).unwrap()));

    // Writing "a" again reuses its actor.
    let again = registry
        .upsert("a".into(), tally("a", 1), TallyAction::Add(1))
        .await
        .unwrap();
    assert_eq!(again.count, 2);
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn test_registry_stalled_id_does_not_block_others() {
    let registry = ActorRegistry::<Tally>::new(16, ());
    registry
        .upsert("free".into(), tally("free", 5), TallyAction::Add(0))
        .await
        .unwrap();

    // "stuck" is served by an actor that never answers.
    let (stuck, _requests) = create_mock_client::<Tally>(4);
    registry.register("stuck".into(), stuck);
    let pending = tokio::spawn({
        let registry = registry.clone();
        async move { registry.perform_action("stuck".into(), TallyAction::Take(1)).await }
    });

    let left = tokio::time::timeout(
        Duration::from_secs(1),
        registry.perform_action("free".into(), TallyAction::Take(2)),
    )
    .await
    .expect("free id waited behind the stalled one")
    .unwrap();
    assert_eq!(left, 3);
    assert!(!pending.is_finished());
}

#[tokio::test]
async fn test_registry_unknown_id() {
    let registry = ActorRegistry::<Tally>::new(16, ());

    assert!(registry.get("ghost".into()).await.unwrap().is_none());
    let action = registry.perform_action("ghost".into(), TallyAction::Add(1)).await;
    assert!(matches!(action, Err(FrameworkError::NotFound(_))));
    // Actions never spawn an actor.
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_registry_close_stops_actors() {
    let registry = ActorRegistry::<Tally>::new(16, ());
    registry
        .upsert("a".into(), tally("a", 1), TallyAction::Add(1))
        .await
        .unwrap();

    let handles = registry.close();
    assert_eq!(handles.len(), 1);
    assert!(registry.is_empty());
    for handle in handles {
        handle.await.unwrap();
    }
}
