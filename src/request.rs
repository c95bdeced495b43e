// src/request.rs
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::actions::Action;
use crate::error::AccessError;
use crate::models::comment::Comment;
use crate::models::post::Post;
use crate::models::user::{Role, User};
use crate::registry::PermissionTable;
use crate::resource::{parse_action, Model, ModelKind};
use crate::utils::rbac::has_permission;

/// The requesting identity with role names still unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl RequestUser {
    /// Resolve role names; the first unknown one is an error.
    pub fn to_user(&self) -> Result<User, AccessError> {
        let roles = self
            .roles
            .iter()
            .map(|name| name.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(User::new(self.id.clone(), self.email.clone(), roles))
    }
}

impl From<User> for RequestUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles.iter().map(|role| role.as_str().to_string()).collect(),
        }
    }
}

/// An untyped check, as it arrives from JSON or the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRequest {
    pub model: String,
    pub action: String,
    pub user: RequestUser,
    #[serde(default)]
    pub data: Option<Value>,
}

impl AccessRequest {
    /// Malformed JSON is [`AccessError::InvalidData`]; names inside a
    /// well-formed request are checked by [`check_permission_dynamic`].
    pub fn from_json_str(raw: &str) -> Result<Self, AccessError> {
        serde_json::from_str(raw)
            .map_err(|e| AccessError::InvalidData(format!("access request: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read access request from {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Failed to parse access request from {}", path.display()))
    }
}

/// Decide an untyped request against `table`.
///
/// Unknown names, an action the model does not support, and data that does
/// not fit the model are errors. A denial is `Ok(false)`.
pub fn check_permission_dynamic(
    table: &PermissionTable,
    request: &AccessRequest,
) -> Result<bool, AccessError> {
    let model: ModelKind = request.model.parse()?;
    let action: Action = request.action.parse()?;
    if !model.supports(action) {
        return Err(AccessError::InvalidActionForModel { model, action });
    }
    let user = request.user.to_user()?;
    let data = request.data.as_ref();

    let allowed = match model {
        ModelKind::Post => evaluate::<Post>(table, action, &user, data)?,
        ModelKind::Comment => evaluate::<Comment>(table, action, &user, data)?,
    };

    debug!(
        user = %user.id,
        model = %model,
        action = %action,
        allowed,
        "dynamic permission check"
    );
    Ok(allowed)
}

fn evaluate<M: Model>(
    table: &PermissionTable,
    action: Action,
    user: &User,
    data: Option<&Value>,
) -> Result<bool, AccessError> {
    let action = parse_action::<M>(action)?;
    let instance = match data {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            M::deserialize(value)
                .map_err(|e| AccessError::InvalidData(format!("{} for {}", e, M::KIND)))?,
        ),
    };

    Ok(has_permission(table, action, user, instance.as_ref()))
}
