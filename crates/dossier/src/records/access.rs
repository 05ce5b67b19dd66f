use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::domain::{Employee, UserAccount, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
        }
    }

    /// Super admins hold every permission an admin has.
    pub const fn satisfies(self, required: Role) -> bool {
        matches!(
            (self, required),
            (Role::SuperAdmin, _) | (Role::Admin, Role::Admin)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{} role required", .required.label())]
    Forbidden { required: Role },
    #[error("employee belongs to a company outside your assignment")]
    OutOfScope,
}

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub companies: Vec<String>,
}

impl From<&UserAccount> for Actor {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
            role: account.role,
            companies: account.companies.clone(),
        }
    }
}

impl Actor {
    pub fn require(&self, required: Role) -> Result<(), AccessError> {
        if self.role.satisfies(required) {
            Ok(())
        } else {
            Err(AccessError::Forbidden { required })
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Admins only see employees of their assigned companies.
    pub fn can_see_company(&self, company: &str) -> bool {
        self.is_super_admin() || self.companies.iter().any(|assigned| assigned == company)
    }

    pub fn require_employee(&self, employee: &Employee) -> Result<(), AccessError> {
        if self.can_see_company(&employee.company) {
            Ok(())
        } else {
            Err(AccessError::OutOfScope)
        }
    }
}

/// Hex-encoded SHA-256 digest, matching the credential store format.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(password_hash)
}
