// src/models/comment.rs
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::resource::{Model, ModelKind};

/// A comment thread node; replies nest under `comments`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub title: String,
    pub description: String,
    #[serde(alias = "userId")]
    pub owner_id: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Comment {
    pub fn reply_count(&self) -> usize {
        self.comments
            .iter()
            .map(|reply| 1 + reply.reply_count())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentAction {
    View,
    Create,
    Update,
    Delete,
}

impl From<CommentAction> for Action {
    fn from(action: CommentAction) -> Self {
        match action {
            CommentAction::View => Action::View,
            CommentAction::Create => Action::Create,
            CommentAction::Update => Action::Update,
            CommentAction::Delete => Action::Delete,
        }
    }
}

impl TryFrom<Action> for CommentAction {
    type Error = Action;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        Ok(match action {
            Action::View => CommentAction::View,
            Action::Create => CommentAction::Create,
            Action::Update => CommentAction::Update,
            Action::Delete => CommentAction::Delete,
        })
    }
}

impl Model for Comment {
    const KIND: ModelKind = ModelKind::Comment;
    type Action = CommentAction;
}
