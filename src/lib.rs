// src/lib.rs

pub mod actions;
pub mod configs;
pub mod error;
pub mod helpers;
pub mod models;
pub mod policy;
pub mod registry;
pub mod request;
pub mod resource;
pub mod utils;

pub use actions::Action;
pub use error::{AccessError, TableError};
pub use models::{
    comment::{Comment, CommentAction},
    post::{Post, PostAction},
    user::{Role, User},
};
pub use resource::{Model, ModelKind};
pub use registry::{PermissionTable, PermissionTableBuilder, Predicate, Rule, RuleKind};

// Evaluation entry points
pub use utils::rbac::{check_permission, has_permission};
pub use helpers::auth_helper::ensure_permission;
pub use request::{check_permission_dynamic, AccessRequest, RequestUser};
pub use policy::{default_permissions, default_table};

pub use configs::initializer::{setup_rolecheck_logging, RolecheckConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub mod prelude {
    pub use crate::{
        check_permission,
        default_permissions,
        has_permission,
        Action,
        Model,
        ModelKind,
        PermissionTable,
        Role,
        Rule,
        User,
    };
}
