//! Entity trait implementation for the User domain type.

use super::actions::UserAction;
use super::error::UserError;
use crate::framework::ActorEntity;
use crate::model::{
    is_valid_email, normalize_key, Role, User, UserCreate, UserId, UserLimit, UserQuery,
    UserUpdate,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

fn check_name(name: &str) -> Result<(), UserError> {
    if name.trim().is_empty() {
        return Err(UserError::Validation("name must not be empty".into()));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), UserError> {
    if !is_valid_email(email) {
        return Err(UserError::Validation(format!("invalid email: {}", email)));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = User;
    type Query = UserQuery;
    type Context = ();
    type Error = UserError;

    /// Creates a new User from creation parameters.
    ///
    /// Staff must name their owning company. Nobody else may.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, UserError> {
        check_name(&params.name)?;
        let email = params.email.trim().to_string();
        check_email(&email)?;
        match (params.role, params.created_by) {
            (Role::Staff, None) => {
                return Err(UserError::Validation("staff must belong to a company".into()))
            }
            (Role::SuperAdmin | Role::Company, Some(_)) => {
                return Err(UserError::Validation(
                    "only staff can be created by another user".into(),
                ))
            }
            _ => {}
        }

        Ok(User {
            id,
            name: params.name.trim().to_string(),
            email,
            role: params.role,
            created_by: params.created_by,
            active_plan: None,
            plan_expire_date: None,
            total_users: match params.role {
                Role::SuperAdmin => UserLimit::Unlimited,
                _ => UserLimit::Limited(0),
            },
            storage_used_mb: 0,
            storage_limit_mb: None,
            active_modules: BTreeSet::new(),
            permissions: BTreeSet::new(),
            is_disabled: false,
        })
    }

    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), UserError> {
        if let Some(name) = update.name {
            check_name(&name)?;
            self.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            let email = email.trim().to_string();
            check_email(&email)?;
            self.email = email;
        }
        Ok(())
    }

    /// # Actions
    /// - `ApplyPlan`: overwrites plan, expiry, ceiling, storage limit and modules.
    /// - `SetDisabled`: the super admin cannot be disabled.
    /// - `GrantPermissions` / `RevokePermissions`: set union / difference.
    /// - `AddStorage`: checked against `storage_limit_mb`. Staff have no
    ///   storage of their own.
    async fn handle_action(&mut self, action: UserAction, _ctx: &()) -> Result<User, UserError> {
        match action {
            UserAction::ApplyPlan(grant) => {
                if self.role != Role::Company {
                    return Err(UserError::Validation(format!(
                        "{} is not a company; plans apply to companies only",
                        self.id
                    )));
                }
                self.active_plan = Some(grant.plan);
                self.plan_expire_date = grant.expires_on;
                self.total_users = grant.total_users;
                self.storage_limit_mb = grant.storage_limit_mb;
                self.active_modules = grant.modules;
            }
            UserAction::SetDisabled(disabled) => {
                if disabled && self.is_super_admin() {
                    return Err(UserError::Validation(
                        "the super admin cannot be disabled".into(),
                    ));
                }
                self.is_disabled = disabled;
            }
            UserAction::GrantPermissions(permissions) => {
                self.permissions.extend(permissions);
            }
            UserAction::RevokePermissions(permissions) => {
                self.permissions.retain(|p| !permissions.contains(p));
            }
            UserAction::AddStorage(mb) => {
                if self.is_staff() {
                    return Err(UserError::Validation(
                        "staff storage is recorded on the company".into(),
                    ));
                }
                let total = self.storage_used_mb.saturating_add(mb);
                if let Some(limit) = self.storage_limit_mb {
                    if total > limit {
                        return Err(UserError::StorageLimitExceeded {
                            used: self.storage_used_mb,
                            requested: mb,
                            limit,
                        });
                    }
                }
                self.storage_used_mb = total;
            }
        }
        Ok(self.clone())
    }

    fn matches(&self, query: &UserQuery) -> bool {
        query.role.is_none_or(|role| self.role == role)
            && query.created_by.is_none_or(|owner| self.created_by == Some(owner))
            && query
                .email
                .as_deref()
                .is_none_or(|email| normalize_key(email) == normalize_key(&self.email))
            && query.disabled.is_none_or(|disabled| self.is_disabled == disabled)
    }

    /// Emails are unique, case-insensitively.
    fn unique_key(&self) -> Option<String> {
        Some(normalize_key(&self.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlanId;
    use crate::user_actor::PlanGrant;

    fn company() -> User {
        User::from_create_params(UserId(1), UserCreate::company("Acme", "owner@acme.io")).unwrap()
    }

    #[test]
    fn staff_need_an_owner() {
        let params = UserCreate {
            created_by: None,
            ..UserCreate::staff(UserId(1), "Bob", "bob@acme.io")
        };
        assert!(matches!(
            User::from_create_params(UserId(2), params),
            Err(UserError::Validation(_))
        ));
    }

    #[test]
    fn bad_email_is_rejected() {
        assert!(matches!(
            User::from_create_params(UserId(1), UserCreate::company("Acme", "acme.io")),
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn storage_respects_the_plan_limit() {
        let mut user = company();
        user.handle_action(
            UserAction::ApplyPlan(PlanGrant {
                plan: PlanId(1),
                expires_on: None,
                total_users: UserLimit::Limited(3),
                storage_limit_mb: Some(100),
                modules: BTreeSet::new(),
            }),
            &(),
        )
        .await
        .unwrap();

        user.handle_action(UserAction::AddStorage(60), &()).await.unwrap();
        let err = user
            .handle_action(UserAction::AddStorage(41), &())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            UserError::StorageLimitExceeded {
                used: 60,
                requested: 41,
                limit: 100
            }
        );
    }

    #[tokio::test]
    async fn staff_storage_is_not_recorded_on_staff() {
        let mut staff =
            User::from_create_params(UserId(2), UserCreate::staff(UserId(1), "Bob", "bob@acme.io"))
                .unwrap();
        let result = staff.handle_action(UserAction::AddStorage(10), &()).await;
        assert!(matches!(result, Err(UserError::Validation(_))));
        assert_eq!(staff.storage_used_mb, 0);
    }

    #[tokio::test]
    async fn permissions_are_set_operations() {
        let mut user = company();
        let grant = BTreeSet::from(["hrm.manage".to_string(), "hrm.view".to_string()]);
        user.handle_action(UserAction::GrantPermissions(grant), &())
            .await
            .unwrap();
        let revoke = BTreeSet::from(["hrm.manage".to_string()]);
        let user = user
            .handle_action(UserAction::RevokePermissions(revoke), &())
            .await
            .unwrap();
        assert!(user.has_permission("hrm.view"));
        assert!(!user.has_permission("hrm.manage"));
    }

    #[tokio::test]
    async fn plans_only_apply_to_companies() {
        let mut staff =
            User::from_create_params(UserId(2), UserCreate::staff(UserId(1), "Bob", "bob@acme.io"))
                .unwrap();
        let result = staff
            .handle_action(
                UserAction::ApplyPlan(PlanGrant {
                    plan: PlanId(1),
                    expires_on: None,
                    total_users: UserLimit::Unlimited,
                    storage_limit_mb: None,
                    modules: BTreeSet::new(),
                }),
                &(),
            )
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }
}
