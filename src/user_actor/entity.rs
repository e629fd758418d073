use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};
use super::UserError;

const MAX_NAME_LEN: usize = 50;

fn validate_name(name: &str) -> Result<String, UserError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserError::ValidationError("Please provide a name".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(UserError::ValidationError(format!(
            "Name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Lower-cases and trims, then requires a `local@domain.tld` shape without whitespace.
fn normalize_email(email: &str) -> Result<String, UserError> {
    let email = email.trim().to_lowercase();
    let valid = !email.chars().any(char::is_whitespace)
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .split_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            }
            None => false,
        };
    if valid {
        Ok(email)
    } else {
        Err(UserError::ValidationError("Please provide a valid email".into()))
    }
}

fn validate_phone(phone: &str) -> Result<String, UserError> {
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(phone.to_string())
    } else {
        Err(UserError::ValidationError(
            "Please provide a valid 10-digit phone number".into(),
        ))
    }
}

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();
    type Error = UserError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the user
    /// * `params` - User creation parameters containing name, email and role
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, UserError> {
        Ok(Self {
            id,
            name: validate_name(&params.name)?,
            email: normalize_email(&params.email)?,
            phone: params.phone.as_deref().map(validate_phone).transpose()?,
            role: params.role,
            is_blocked: false,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    /// Applies an admin edit.
    ///
    /// # Fields Updated
    /// - `name`, `phone`: re-validated
    /// - `role`, `is_blocked`: taken as given
    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        if let Some(name) = patch.name {
            self.name = validate_name(&name)?;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(validate_phone(&phone)?);
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(is_blocked) = patch.is_blocked {
            self.is_blocked = is_blocked;
        }
        Ok(())
    }

    /// Users have no custom actions.
    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }
}
