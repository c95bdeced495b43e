// src/policy.rs
use once_cell::sync::Lazy;

use crate::error::TableError;
use crate::models::post::{Post, PostAction};
use crate::models::user::{Role, User};
use crate::registry::PermissionTable;

static DEFAULT_PERMISSIONS: Lazy<PermissionTable> = Lazy::new(|| {
    // The declaration below is static; a failure here is a programming error
    // caught by `test_default_table_builds`.
    default_table().unwrap_or_else(|e| panic!("invalid default permission table: {}", e))
});

fn is_post_owner(user: &User, post: &Post) -> bool {
    post.is_owned_by(&user.id)
}

/// The stock policy.
///
/// `moderator` and `admin` are declared without rules and therefore deny
/// everything until rules are written for them.
pub fn default_table() -> Result<PermissionTable, TableError> {
    PermissionTable::builder()
        .allow::<Post>(Role::User, PostAction::View, true)
        .allow::<Post>(Role::User, PostAction::Create, true)
        .check::<Post>(Role::User, PostAction::Update, is_post_owner)
        .check::<Post>(Role::User, PostAction::Delete, is_post_owner)
        .role(Role::Moderator)
        .role(Role::Admin)
        .build()
}

/// Shared, immutable instance of [`default_table`].
pub fn default_permissions() -> &'static PermissionTable {
    &DEFAULT_PERMISSIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleKind;
    use crate::actions::Action;
    use crate::resource::ModelKind;

    #[test]
    fn test_default_table_builds() {
        let table = default_table().unwrap();
        assert_eq!(table.roles(), vec![Role::User, Role::Moderator, Role::Admin]);
        assert_eq!(table.rule_count(), 4);
    }

    #[test]
    fn test_user_post_rules() {
        assert_eq!(
            default_permissions().actions_for(Role::User, ModelKind::Post),
            vec![
                (Action::View, RuleKind::Allow),
                (Action::Create, RuleKind::Allow),
                (Action::Update, RuleKind::Conditional),
                (Action::Delete, RuleKind::Conditional),
            ]
        );
    }

    #[test]
    fn test_moderator_and_admin_are_declared_but_empty() {
        let table = default_permissions();
        for role in [Role::Moderator, Role::Admin] {
            assert!(table.has_role_entry(role));
            assert!(table.models_for(role).is_empty());
        }
    }
}
