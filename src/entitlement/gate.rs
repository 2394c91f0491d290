//! Permission checks in front of module features.

use super::error::EntitlementError;
use super::service::EntitlementService;
use crate::clients::AddOnClient;
use crate::model::User;
use tracing::{debug, instrument};

/// Decides whether a user may perform `permission` inside `module`.
#[derive(Clone)]
pub struct Gate {
    entitlement: EntitlementService,
    addons: AddOnClient,
}

impl Gate {
    pub fn new(entitlement: EntitlementService, addons: AddOnClient) -> Self {
        Self {
            entitlement,
            addons,
        }
    }

    /// Fails with `UserDisabled` for a disabled user, with `ModuleInactive`
    /// when the module is not activated for the user, then with
    /// `PermissionDenied` when the permission is not allowed.
    ///
    /// The super admin and company owners may use any permission the module
    /// declares. Base modules that are not registered AddOns declare none, so
    /// owners may use any permission there. Staff need an explicit grant.
    #[instrument(skip(self, user), fields(user = %user.id))]
    pub async fn authorize(
        &self,
        user: &User,
        permission: &str,
        module: &str,
    ) -> Result<(), EntitlementError> {
        if user.is_disabled {
            debug!("User disabled");
            return Err(EntitlementError::UserDisabled(user.id.to_string()));
        }
        if !self.entitlement.module_is_active(module, user).await? {
            debug!("Module inactive");
            return Err(EntitlementError::ModuleInactive(module.to_string()));
        }

        let allowed = if user.is_staff() {
            user.has_permission(permission)
        } else {
            match self.addons.find(module).await? {
                Some(addon) => addon.permissions.contains(permission),
                None => true,
            }
        };

        if allowed {
            Ok(())
        } else {
            debug!("Permission denied");
            Err(EntitlementError::PermissionDenied(permission.to_string()))
        }
    }
}
