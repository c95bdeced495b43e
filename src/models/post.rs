// src/models/post.rs
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::resource::{Model, ModelKind};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(alias = "userId")]
    pub owner_id: String,
}

impl Post {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostAction {
    View,
    Create,
    Update,
    Delete,
}

impl From<PostAction> for Action {
    fn from(action: PostAction) -> Self {
        match action {
            PostAction::View => Action::View,
            PostAction::Create => Action::Create,
            PostAction::Update => Action::Update,
            PostAction::Delete => Action::Delete,
        }
    }
}

impl TryFrom<Action> for PostAction {
    type Error = Action;

    fn try_from(action: Action) -> Result<Self, Self::Error> {
        Ok(match action {
            Action::View => PostAction::View,
            Action::Create => PostAction::Create,
            Action::Update => PostAction::Update,
            Action::Delete => PostAction::Delete,
        })
    }
}

impl Model for Post {
    const KIND: ModelKind = ModelKind::Post;
    type Action = PostAction;
}
