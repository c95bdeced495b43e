// src/helpers/auth_helper.rs
use tracing::warn;

use crate::actions::Action;
use crate::error::AccessError;
use crate::models::user::User;
use crate::registry::PermissionTable;
use crate::resource::Model;
use crate::utils::rbac::has_permission;

/// Turn a denial into [`AccessError::Forbidden`] so request handlers can use `?`
/// and let [`actix_web::ResponseError`] produce the 403.
pub fn ensure_permission<M: Model>(
    table: &PermissionTable,
    action: M::Action,
    user: &User,
    data: Option<&M>,
) -> Result<(), AccessError> {
    if has_permission(table, action, user, data) {
        return Ok(());
    }

    let action: Action = action.into();
    warn!("🚫 Access denied to {} for {} on {}", user.email, action, M::KIND);
    Err(AccessError::Forbidden {
        model: M::KIND,
        action,
    })
}
