// src/utils/rbac.rs
use tracing::{debug, trace};

use crate::actions::Action;
use crate::models::user::User;
use crate::registry::PermissionTable;
use crate::resource::Model;

/// Whether `user` may perform `action` on a model `M`.
///
/// Every role the user holds is consulted; the first role whose rule grants
/// wins. A missing rule, an explicit `false`, or a conditional rule without
/// an instance in `data` all contribute a denial for that role.
pub fn has_permission<M: Model>(
    table: &PermissionTable,
    action: M::Action,
    user: &User,
    data: Option<&M>,
) -> bool {
    let requested: Action = action.into();

    if !user.has_any_role() {
        debug!(
            user = %user.id,
            model = %M::KIND,
            action = %requested,
            "denied: user holds no roles"
        );
        return false;
    }

    for role in &user.roles {
        let granted = match table.rule::<M>(*role, action) {
            Some(rule) => rule.evaluate(user, data),
            None => false,
        };

        trace!(
            user = %user.id,
            role = %role,
            model = %M::KIND,
            action = %requested,
            granted,
            "role evaluated"
        );

        if granted {
            debug!(
                user = %user.id,
                role = %role,
                model = %M::KIND,
                action = %requested,
                "granted"
            );
            return true;
        }
    }

    debug!(user = %user.id, model = %M::KIND, action = %requested, "denied: no role grants");
    false
}

/// Same decision as [`has_permission`], named after the call contract.
pub fn check_permission<M: Model>(
    table: &PermissionTable,
    action: M::Action,
    user: &User,
    data: Option<&M>,
) -> bool {
    has_permission(table, action, user, data)
}

impl PermissionTable {
    pub fn has_permission<M: Model>(
        &self,
        action: M::Action,
        user: &User,
        data: Option<&M>,
    ) -> bool {
        has_permission(self, action, user, data)
    }
}
