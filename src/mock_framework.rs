//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_batch`] to assert behavior
//! and answer each request the way the actor would.

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;

pub type MockReceiver<T> = mpsc::Receiver<ResourceRequest<T>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so each reply (success,
/// failure, or none at all) is scripted deterministically.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, MockReceiver<T>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::CreateParams, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

pub async fn expect_get_or_create<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Id, T::CreateParams, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::GetOrCreate { id, params, respond_to }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_get_many<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(Vec<T::Id>, Response<Vec<Option<T>>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::GetMany { ids, respond_to }) => Some((ids, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

pub async fn expect_batch<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(Vec<(T::Id, T::Action)>, Response<Vec<T::ActionResult>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::ActionBatch { actions, respond_to }) => Some((actions, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::UserClient;
    use crate::domain::{Role, User, UserCreate};
    use crate::user_actor::UserError;
    use chrono::Utc;

    #[tokio::test]
    async fn test_register_forces_customer_role() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let users = UserClient::new(client);

        let register_task = tokio::spawn(async move {
            users
                .register(UserCreate::admin("Mallory", "mallory@example.com"))
                .await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.role, Role::Customer);
        let user = User {
            id: "user_1".into(),
            name: params.name,
            email: params.email,
            phone: None,
            role: params.role,
            is_blocked: false,
            created_at: Utc::now(),
        };
        responder.send(Ok(user.clone())).unwrap();

        let result = register_task.await.unwrap();
        assert_eq!(result, Ok(user));
    }

    #[tokio::test]
    async fn test_actor_that_never_answers_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let users = UserClient::new(client);

        let task = tokio::spawn(async move { users.get_user("user_1".into()).await });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        drop(responder);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(UserError::ActorCommunicationError(_))));
    }
}
