use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Failures raised by the actor plumbing itself rather than by entity hooks.
///
/// Every entity error type converts from this, so clients can surface a single
/// domain error to their callers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    Conflict(String),
    #[error("Create requires an explicit id")]
    MissingId,
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// Trait that any domain document must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: From<FrameworkError> + Send + Sync + Debug + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    /// Value that must be unique across the collection (e.g. an email address).
    fn unique_key(&self) -> Option<String> {
        None
    }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    GetOrCreate {
        id: T::Id,
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    GetMany {
        ids: Vec<T::Id>,
        respond_to: Response<Vec<Option<T>>, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    /// Applies every action or none of them.
    ActionBatch {
        actions: Vec<(T::Id, T::Action)>,
        respond_to: Response<Vec<T::ActionResult>, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

type IdFn<Id> = Box<dyn Fn() -> Id + Send + Sync>;

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Option<IdFn<T::Id>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, Some(Box::new(next_id_fn)))
    }

    /// An actor whose entities are only ever created under a caller-chosen id.
    pub fn keyed(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::build(buffer_size, None)
    }

    fn build(buffer_size: usize, next_id_fn: Option<IdFn<T::Id>>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn,
        };
        (actor, ResourceClient::new(sender))
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let next_id = self.next_id_fn.as_ref().map(|next_id| next_id());
                    let result = match next_id {
                        Some(id) => self.insert_new(id, params),
                        None => Err(FrameworkError::MissingId.into()),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::GetOrCreate { id, params, respond_to } => {
                    let result = match self.store.get(&id) {
                        Some(item) => Ok(item.clone()),
                        None => self.insert_new(id, params),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::GetMany { ids, respond_to } => {
                    let items = ids.iter().map(|id| self.store.get(id).cloned()).collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::List { respond_to } => {
                    let items = self.store.values().cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = match self.store.get(&id) {
                        Some(item) => item.on_delete(),
                        None => Err(FrameworkError::NotFound(id.to_string()).into()),
                    };
                    if result.is_ok() {
                        self.store.remove(&id);
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action),
                        None => Err(FrameworkError::NotFound(id.to_string()).into()),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::ActionBatch { actions, respond_to } => {
                    let _ = respond_to.send(self.apply_batch(actions));
                }
            }
        }
    }

    fn insert_new(&mut self, id: T::Id, params: T::CreateParams) -> Result<T, T::Error> {
        let mut item = T::from_create_params(id.clone(), params)?;
        item.on_create()?;
        if let Some(key) = item.unique_key() {
            if self.store.values().any(|other| other.unique_key().as_deref() == Some(key.as_str())) {
                return Err(FrameworkError::Conflict(key).into());
            }
        }
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        let current = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;

        // Patches run against a copy so a rejected patch or key clash leaves the
        // stored document as it was.
        let mut updated = current.clone();
        updated.on_update(patch)?;
        if let Some(key) = updated.unique_key() {
            let clash = self
                .store
                .iter()
                .any(|(other_id, other)| other_id != &id && other.unique_key().as_deref() == Some(key.as_str()));
            if clash {
                return Err(FrameworkError::Conflict(key).into());
            }
        }
        self.store.insert(id, updated.clone());
        Ok(updated)
    }

    fn apply_batch(&mut self, actions: Vec<(T::Id, T::Action)>) -> Result<Vec<T::ActionResult>, T::Error> {
        let mut staged: HashMap<T::Id, T> = HashMap::new();
        let mut results = Vec::with_capacity(actions.len());

        for (id, action) in actions {
            let item = match staged.entry(id.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let current = self
                        .store
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
                    entry.insert(current)
                }
            };
            results.push(item.handle_action(action)?);
        }

        self.store.extend(staged);
        Ok(results)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would demand `T: Clone` bounds on the associated types too.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get_or_create(&self, id: T::Id, params: T::CreateParams) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::GetOrCreate { id, params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn get_many(&self, ids: Vec<T::Id>) -> Result<Vec<Option<T>>, T::Error> {
        self.request(|respond_to| ResourceRequest::GetMany { ids, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, T::Error> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), T::Error> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }

    pub async fn perform_batch(&self, actions: Vec<(T::Id, T::Action)>) -> Result<Vec<T::ActionResult>, T::Error> {
        self.request(|respond_to| ResourceRequest::ActionBatch { actions, respond_to })
            .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        label: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterPatch {
        label: Option<String>,
    }

    #[derive(Debug)]
    enum CounterAction {
        Take(u32),
    }

    #[derive(Debug, PartialEq)]
    enum CounterError {
        Framework(FrameworkError),
        Exhausted { wanted: u32, left: u32 },
        Invalid(String),
    }

    impl From<FrameworkError> for CounterError {
        fn from(err: FrameworkError) -> Self {
            Self::Framework(err)
        }
    }

    impl Entity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type Patch = CounterPatch;
        type Action = CounterAction;
        type ActionResult = u32;
        type Error = CounterError;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, params: CounterCreate) -> Result<Self, CounterError> {
            if params.label.is_empty() {
                return Err(CounterError::Invalid("label".into()));
            }
            Ok(Self {
                id,
                label: params.label,
                value: params.value,
            })
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.label.clone())
        }

        fn on_update(&mut self, patch: CounterPatch) -> Result<(), CounterError> {
            if let Some(label) = patch.label {
                self.label = label;
            }
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<u32, CounterError> {
            match action {
                CounterAction::Take(n) if n <= self.value => {
                    self.value -= n;
                    Ok(self.value)
                }
                CounterAction::Take(n) => Err(CounterError::Exhausted {
                    wanted: n,
                    left: self.value,
                }),
            }
        }
    }

    fn spawn_counters() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("counter_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    async fn create(client: &ResourceClient<Counter>, label: &str, value: u32) -> Counter {
        client
            .create(CounterCreate {
                label: label.into(),
                value,
            })
            .await
            .unwrap()
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_create_assigns_generated_ids() {
        let client = spawn_counters();

        let a = create(&client, "a", 1).await;
        let b = create(&client, "b", 1).await;

        assert_eq!(a.id, "counter_1");
        assert_eq!(b.id, "counter_2");
        assert_eq!(client.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unique_key_rejects_duplicates() {
        let client = spawn_counters();
        create(&client, "apples", 3).await;

        let err = client
            .create(CounterCreate {
                label: "apples".into(),
                value: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err, CounterError::Framework(FrameworkError::Conflict("apples".into())));

        let pears = create(&client, "pears", 1).await;
        let err = client
            .update(pears.id.clone(), CounterPatch { label: Some("apples".into()) })
            .await
            .unwrap_err();
        assert_eq!(err, CounterError::Framework(FrameworkError::Conflict("apples".into())));
        assert_eq!(client.get(pears.id).await.unwrap().unwrap().label, "pears");
    }

    #[tokio::test]
    async fn test_action_batch_is_all_or_nothing() {
        let client = spawn_counters();
        let a = create(&client, "a", 5).await;
        let b = create(&client, "b", 1).await;

        let err = client
            .perform_batch(vec![
                (a.id.clone(), CounterAction::Take(3)),
                (b.id.clone(), CounterAction::Take(2)),
            ])
            .await
            .unwrap_err();
        assert_eq!(err, CounterError::Exhausted { wanted: 2, left: 1 });

        assert_eq!(client.get(a.id.clone()).await.unwrap().unwrap().value, 5);
        assert_eq!(client.get(b.id.clone()).await.unwrap().unwrap().value, 1);

        let left = client
            .perform_batch(vec![
                (a.id.clone(), CounterAction::Take(3)),
                (a.id.clone(), CounterAction::Take(2)),
                (b.id.clone(), CounterAction::Take(1)),
            ])
            .await
            .unwrap();
        assert_eq!(left, vec![2, 0, 0]);
        assert_eq!(client.get(a.id).await.unwrap().unwrap().value, 0);
    }

    #[tokio::test]
    async fn test_batch_with_unknown_id_changes_nothing() {
        let client = spawn_counters();
        let a = create(&client, "a", 5).await;

        let err = client
            .perform_batch(vec![
                (a.id.clone(), CounterAction::Take(1)),
                ("missing".into(), CounterAction::Take(1)),
            ])
            .await
            .unwrap_err();
        assert_eq!(err, CounterError::Framework(FrameworkError::NotFound("missing".into())));
        assert_eq!(client.get(a.id).await.unwrap().unwrap().value, 5);
    }

    #[tokio::test]
    async fn test_keyed_actor_only_accepts_explicit_ids() {
        let (actor, client) = ResourceActor::<Counter>::keyed(10);
        tokio::spawn(actor.run());

        let err = client
            .create(CounterCreate {
                label: "x".into(),
                value: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err, CounterError::Framework(FrameworkError::MissingId));

        let first = client
            .get_or_create("alice".into(), CounterCreate { label: "x".into(), value: 1 })
            .await
            .unwrap();
        let again = client
            .get_or_create("alice".into(), CounterCreate { label: "ignored".into(), value: 9 })
            .await
            .unwrap();
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn test_get_many_preserves_request_order() {
        let client = spawn_counters();
        let a = create(&client, "a", 1).await;
        let b = create(&client, "b", 2).await;

        let found = client
            .get_many(vec![b.id.clone(), "nope".into(), a.id.clone()])
            .await
            .unwrap();
        assert_eq!(found[0].as_ref().map(|c| c.value), Some(2));
        assert!(found[1].is_none());
        assert_eq!(found[2].as_ref().map(|c| c.value), Some(1));
    }

    #[tokio::test]
    async fn test_delete_and_missing_ids() {
        let client = spawn_counters();
        let a = create(&client, "a", 1).await;

        client.delete(a.id.clone()).await.unwrap();
        assert!(client.get(a.id.clone()).await.unwrap().is_none());

        let err = client.delete(a.id.clone()).await.unwrap_err();
        assert_eq!(err, CounterError::Framework(FrameworkError::NotFound(a.id)));
    }

    #[tokio::test]
    async fn test_closed_actor_reports_communication_error() {
        let (actor, client) = ResourceActor::<Counter>::keyed(1);
        drop(actor);

        let err = client.list().await.unwrap_err();
        assert_eq!(err, CounterError::Framework(FrameworkError::ActorClosed));
    }
}
