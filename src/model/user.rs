//! Users of the platform: the super admin, tenant companies and their staff.
//!
//! [`User`] implements [`ActorEntity`](crate::framework::ActorEntity); see
//! [`UserAction`](crate::user_actor::UserAction) for the plan, permission and
//! storage operations.

use super::{PlanId, UserLimit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

super::resource_id!(
    /// Type-safe identifier for Users.
    UserId,
    "user"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    /// A tenant.
    Company,
    /// A sub-user owned by a company.
    Staff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// The owning company, for staff.
    pub created_by: Option<UserId>,
    pub active_plan: Option<PlanId>,
    pub plan_expire_date: Option<NaiveDate>,
    /// Staff ceiling of a company. A company without a plan has `Limited(0)`.
    pub total_users: UserLimit,
    pub storage_used_mb: u64,
    /// Copied from the plan when it is applied. `None` means unlimited.
    pub storage_limit_mb: Option<u64>,
    pub active_modules: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
    pub is_disabled: bool,
}

impl User {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn is_company(&self) -> bool {
        self.role == Role::Company
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    /// The tenant this user belongs to: its owner for staff, itself otherwise.
    pub fn tenant_id(&self) -> UserId {
        match (self.role, self.created_by) {
            (Role::Staff, Some(owner)) => owner,
            _ => self.id,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_by: Option<UserId>,
}

impl UserCreate {
    pub fn super_admin(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: Role::SuperAdmin,
            created_by: None,
        }
    }

    pub fn company(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: Role::Company,
            created_by: None,
        }
    }

    pub fn staff(tenant: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: Role::Staff,
            created_by: Some(tenant),
        }
    }
}

/// Profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub role: Option<Role>,
    pub created_by: Option<UserId>,
    pub email: Option<String>,
    pub disabled: Option<bool>,
}

impl UserQuery {
    /// All staff owned by `tenant`, enabled or not.
    pub fn staff_of(tenant: UserId) -> Self {
        Self {
            role: Some(Role::Staff),
            created_by: Some(tenant),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

/// A minimal address check: one `@`, a non-empty local part and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
