// src/resource.rs
use derive_more::Display;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::str::FromStr;

use crate::actions::Action;
use crate::error::AccessError;

/// Resource types that permissions are declared against.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[display(fmt = "post")]
    Post,
    #[display(fmt = "comment")]
    Comment,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Post, ModelKind::Comment];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Post => "post",
            ModelKind::Comment => "comment",
        }
    }

    /// Actions that are meaningful for this model kind.
    pub fn valid_actions(&self) -> Vec<Action> {
        match self {
            ModelKind::Post => crate::models::post::Post::valid_actions(),
            ModelKind::Comment => crate::models::comment::Comment::valid_actions(),
        }
    }

    pub fn supports(&self, action: Action) -> bool {
        self.valid_actions().contains(&action)
    }
}

impl FromStr for ModelKind {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AccessError::UnknownModel(s.to_string()))
    }
}

/// A data shape that can be the subject of a permission check.
///
/// Each implementor is bound to exactly one [`ModelKind`] and carries its own
/// action type, so a rule or a check for an action the model does not support
/// cannot be written down.
pub trait Model: DeserializeOwned + Send + Sync + 'static {
    const KIND: ModelKind;

    /// The subset of [`Action`] this model accepts.
    type Action: Copy + Eq + Into<Action> + TryFrom<Action> + Send + Sync + 'static;

    fn valid_actions() -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| Self::Action::try_from(*action).is_ok())
            .collect()
    }
}

/// Narrow a general [`Action`] to the action type of `M`.
pub fn parse_action<M: Model>(action: Action) -> Result<M::Action, AccessError> {
    M::Action::try_from(action).map_err(|_| AccessError::InvalidActionForModel {
        model: M::KIND,
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::{Post, PostAction};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct ReadOnly;

    impl From<ReadOnly> for Action {
        fn from(_: ReadOnly) -> Self {
            Action::View
        }
    }

    impl TryFrom<Action> for ReadOnly {
        type Error = ();

        fn try_from(action: Action) -> Result<Self, Self::Error> {
            match action {
                Action::View => Ok(ReadOnly),
                _ => Err(()),
            }
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct Archive;

    impl Model for Archive {
        const KIND: ModelKind = ModelKind::Post;
        type Action = ReadOnly;
    }

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("post".parse::<ModelKind>().unwrap(), ModelKind::Post);
        assert_eq!("comment".parse::<ModelKind>().unwrap(), ModelKind::Comment);
        assert!(matches!(" POST ".parse::<ModelKind>(), Err(AccessError::UnknownModel(_))));
        assert!(matches!(
            "invoice".parse::<ModelKind>(),
            Err(AccessError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_valid_actions_follow_action_type() {
        assert_eq!(Archive::valid_actions(), vec![Action::View]);
        assert_eq!(ModelKind::Post.valid_actions(), Action::ALL.to_vec());
        assert!(ModelKind::Comment.supports(Action::Delete));
    }

    #[test]
    fn test_parse_action_rejects_unsupported_action() {
        assert_eq!(parse_action::<Archive>(Action::View).unwrap(), ReadOnly);

        let err = parse_action::<Archive>(Action::Delete).unwrap_err();
        assert!(matches!(
            err,
            AccessError::InvalidActionForModel { model: ModelKind::Post, action: Action::Delete }
        ));
        assert_eq!(err.to_string(), "Invalid action for model: delete on post");
    }

    #[test]
    fn test_parse_action_for_post() {
        assert_eq!(parse_action::<Post>(Action::Update).unwrap(), PostAction::Update);
    }
}
