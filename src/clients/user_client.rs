use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Role, User, UserCreate, UserPatch};
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    /// Public sign-up. The requested role is ignored; every new account is a customer.
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn register(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner
            .create(UserCreate {
                role: Role::Customer,
                ..params
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: String, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.update(id, patch).await
    }
}
