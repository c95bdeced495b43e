// src/actions.rs
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AccessError;

/// Operation kinds a permission rule can be declared for.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[display(fmt = "view")]
    View,
    #[display(fmt = "create")]
    Create,
    #[display(fmt = "update")]
    Update,
    #[display(fmt = "delete")]
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl FromStr for Action {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AccessError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_action_parsing() {
        assert_eq!("view".parse::<Action>().unwrap(), Action::View);
        assert_eq!("delete".parse::<Action>().unwrap(), Action::Delete);
        assert!(matches!("VIEW".parse::<Action>(), Err(AccessError::UnknownAction(_))));
        assert!(matches!(" view".parse::<Action>(), Err(AccessError::UnknownAction(_))));
        assert!(matches!(
            "publish".parse::<Action>(),
            Err(AccessError::UnknownAction(name)) if name == "publish"
        ));
    }

    #[test]
    fn test_action_display_matches_wire_name() {
        for action in Action::ALL {
            assert_eq!(action.to_string(), action.as_str());
        }
    }

    #[test]
    fn test_action_serde_tokens() {
        assert_tokens(&Action::Update, &[Token::UnitVariant { name: "Action", variant: "update" }]);
    }
}
