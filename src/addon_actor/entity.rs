//! Entity trait implementation for the AddOn domain type.

use super::actions::AddOnAction;
use super::error::AddOnError;
use crate::framework::ActorEntity;
use crate::model::{normalize_key, AddOn, AddOnCreate, AddOnId, AddOnQuery, AddOnUpdate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for AddOn {
    type Id = AddOnId;
    type Create = AddOnCreate;
    type Update = AddOnUpdate;
    type Action = AddOnAction;
    type ActionResult = bool;
    type Query = AddOnQuery;
    type Context = ();
    type Error = AddOnError;

    fn from_create_params(id: AddOnId, params: AddOnCreate) -> Result<Self, AddOnError> {
        let module = params.module.trim().to_string();
        if module.is_empty() {
            return Err(AddOnError::Validation("module name must not be empty".into()));
        }
        if params
            .parent_module
            .as_deref()
            .is_some_and(|parent| normalize_key(parent) == normalize_key(&module))
        {
            return Err(AddOnError::Validation(format!(
                "{} cannot be its own parent",
                module
            )));
        }
        Ok(AddOn {
            id,
            alias: if params.alias.trim().is_empty() {
                module.clone()
            } else {
                params.alias
            },
            module,
            description: params.description,
            priority: params.priority,
            parent_module: params.parent_module,
            version: params.version,
            monthly_price: params.monthly_price,
            yearly_price: params.yearly_price,
            permissions: params.permissions,
            enabled: params.enabled,
            display: params.display,
        })
    }

    async fn on_update(&mut self, update: AddOnUpdate, _ctx: &()) -> Result<(), AddOnError> {
        if let Some(alias) = update.alias {
            self.alias = alias;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(parent) = update.parent_module {
            self.parent_module = parent;
        }
        if let Some(version) = update.version {
            self.version = version;
        }
        if let Some(price) = update.monthly_price {
            self.monthly_price = price;
        }
        if let Some(price) = update.yearly_price {
            self.yearly_price = price;
        }
        if let Some(permissions) = update.permissions {
            self.permissions = permissions;
        }
        if let Some(display) = update.display {
            self.display = display;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: AddOnAction, _ctx: &()) -> Result<bool, AddOnError> {
        let enabled = action == AddOnAction::Enable;
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        Ok(changed)
    }

    fn matches(&self, query: &AddOnQuery) -> bool {
        query
            .module
            .as_deref()
            .is_none_or(|m| normalize_key(m) == normalize_key(&self.module))
            && query.enabled.is_none_or(|e| self.enabled == e)
            && query.parent_module.as_deref().is_none_or(|p| {
                self.parent_module
                    .as_deref()
                    .is_some_and(|own| normalize_key(own) == normalize_key(p))
            })
    }

    fn unique_key(&self) -> Option<String> {
        Some(normalize_key(&self.module))
    }
}
