use crate::modules::directory::core::model::{Role, User};
use crate::shared::core::errors::ApplicationError;
use uuid::Uuid;

/// The authenticated caller, passed explicitly to every service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApplicationError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApplicationError::Forbidden("admin role required".into()))
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }
}
