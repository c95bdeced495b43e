// src/registry.rs
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::debug;

use crate::actions::Action;
use crate::error::TableError;
use crate::models::user::{Role, User};
use crate::resource::{Model, ModelKind};

/// Pure ownership or attribute check over a user and a concrete instance.
pub type Predicate<M> = fn(&User, &M) -> bool;

/// What a role may do for one (model, action) pair.
pub enum Rule<M: Model> {
    Allow(bool),
    Check(Predicate<M>),
}

impl<M: Model> Rule<M> {
    /// Contribution of this rule for `user` against an optional instance.
    /// Conditional rules fail closed when there is no instance to look at.
    pub fn evaluate(&self, user: &User, data: Option<&M>) -> bool {
        match self {
            Rule::Allow(granted) => *granted,
            Rule::Check(predicate) => data.map_or(false, |instance| predicate(user, instance)),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Allow(true) => RuleKind::Allow,
            Rule::Allow(false) => RuleKind::Deny,
            Rule::Check(_) => RuleKind::Conditional,
        }
    }
}

impl<M: Model> Clone for Rule<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Model> Copy for Rule<M> {}

impl<M: Model> fmt::Debug for Rule<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Allow(granted) => f.debug_tuple("Allow").field(granted).finish(),
            Rule::Check(_) => f.write_str("Check(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Allow,
    Deny,
    Conditional,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Allow => "allow",
            RuleKind::Deny => "deny",
            RuleKind::Conditional => "conditional",
        }
    }
}

struct StoredRule {
    kind: RuleKind,
    rule: Box<dyn Any + Send + Sync>,
}

type ActionRules = BTreeMap<Action, StoredRule>;
type ModelRules = BTreeMap<ModelKind, ActionRules>;

/// Immutable role -> model -> action -> rule mapping.
///
/// Absence is meaningful at every level: a role that was never declared, a
/// declared role with nothing for a model, and a model with nothing for an
/// action are all "no opinion". Only a built table can be queried.
pub struct PermissionTable {
    roles: BTreeMap<Role, ModelRules>,
}

impl PermissionTable {
    pub fn builder() -> PermissionTableBuilder {
        PermissionTableBuilder::default()
    }

    /// Typed lookup. The action type ties the query to `M`, so only actions
    /// valid for the model can be asked about.
    pub fn rule<M: Model>(&self, role: Role, action: M::Action) -> Option<&Rule<M>> {
        let action: Action = action.into();
        self.roles
            .get(&role)?
            .get(&M::KIND)?
            .get(&action)?
            .rule
            .downcast_ref::<Rule<M>>()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.roles.keys().copied().collect()
    }

    pub fn has_role_entry(&self, role: Role) -> bool {
        self.roles.contains_key(&role)
    }

    pub fn models_for(&self, role: Role) -> Vec<ModelKind> {
        self.roles
            .get(&role)
            .map(|models| models.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn actions_for(&self, role: Role, model: ModelKind) -> Vec<(Action, RuleKind)> {
        self.roles
            .get(&role)
            .and_then(|models| models.get(&model))
            .map(|actions| actions.iter().map(|(action, stored)| (*action, stored.kind)).collect())
            .unwrap_or_default()
    }

    pub fn rule_count(&self) -> usize {
        self.roles
            .values()
            .flat_map(|models| models.values())
            .map(|actions| actions.len())
            .sum()
    }
}

impl fmt::Debug for PermissionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (role, models) in &self.roles {
            let summary: BTreeMap<ModelKind, BTreeMap<Action, RuleKind>> = models
                .iter()
                .map(|(model, actions)| {
                    (*model, actions.iter().map(|(a, stored)| (*a, stored.kind)).collect())
                })
                .collect();
            map.entry(role, &summary);
        }
        map.finish()
    }
}

/// Declares a [`PermissionTable`]. Declaration faults are collected and
/// reported by [`PermissionTableBuilder::build`].
#[derive(Default)]
pub struct PermissionTableBuilder {
    roles: BTreeMap<Role, ModelRules>,
    bindings: HashMap<ModelKind, TypeId>,
    errors: Vec<TableError>,
}

impl PermissionTableBuilder {
    /// Declare a role, even if it ends up with no rules.
    pub fn role(mut self, role: Role) -> Self {
        self.roles.entry(role).or_default();
        self
    }

    pub fn allow<M: Model>(self, role: Role, action: M::Action, granted: bool) -> Self {
        self.rule::<M>(role, action, Rule::Allow(granted))
    }

    pub fn check<M: Model>(self, role: Role, action: M::Action, predicate: Predicate<M>) -> Self {
        self.rule::<M>(role, action, Rule::Check(predicate))
    }

    pub fn rule<M: Model>(mut self, role: Role, action: M::Action, rule: Rule<M>) -> Self {
        let action: Action = action.into();
        let bound = *self.bindings.entry(M::KIND).or_insert_with(TypeId::of::<M>);
        if bound != TypeId::of::<M>() {
            self.errors.push(TableError::ConflictingModelType { model: M::KIND });
            return self;
        }

        let actions = self.roles.entry(role).or_default().entry(M::KIND).or_default();
        if actions.contains_key(&action) {
            self.errors.push(TableError::DuplicateRule {
                role,
                model: M::KIND,
                action,
            });
            return self;
        }

        actions.insert(
            action,
            StoredRule {
                kind: rule.kind(),
                rule: Box::new(rule),
            },
        );
        self
    }

    pub fn build(self) -> Result<PermissionTable, TableError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let table = PermissionTable { roles: self.roles };
        debug!(
            "Permission table built: {} roles, {} rules",
            table.roles.len(),
            table.rule_count()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::{Comment, CommentAction};
    use crate::models::post::{Post, PostAction};

    fn owns(user: &User, post: &Post) -> bool {
        user.id == post.owner_id
    }

    fn post(owner: &str) -> Post {
        Post {
            id: "1".into(),
            title: "t".into(),
            description: "d".into(),
            owner_id: owner.into(),
        }
    }

    #[test]
    fn test_lookup_by_triple() {
        let table = PermissionTable::builder()
            .allow::<Post>(Role::User, PostAction::View, true)
            .check::<Post>(Role::User, PostAction::Update, owns)
            .build()
            .unwrap();

        assert!(matches!(
            table.rule::<Post>(Role::User, PostAction::View),
            Some(Rule::Allow(true))
        ));
        assert!(matches!(
            table.rule::<Post>(Role::User, PostAction::Update),
            Some(Rule::Check(_))
        ));
        assert!(table.rule::<Post>(Role::User, PostAction::Delete).is_none());
        assert!(table.rule::<Comment>(Role::User, CommentAction::View).is_none());
        assert!(table.rule::<Post>(Role::Admin, PostAction::View).is_none());
        assert_eq!(table.rule_count(), 2);
    }

    #[test]
    fn test_absence_is_distinct_from_explicit_deny() {
        let table = PermissionTable::builder()
            .role(Role::Moderator)
            .allow::<Post>(Role::User, PostAction::Delete, false)
            .build()
            .unwrap();

        assert!(table.has_role_entry(Role::Moderator));
        assert!(!table.has_role_entry(Role::Admin));
        assert!(table.models_for(Role::Moderator).is_empty());
        assert!(matches!(
            table.rule::<Post>(Role::User, PostAction::Delete),
            Some(Rule::Allow(false))
        ));
        assert!(table.rule::<Post>(Role::Moderator, PostAction::Delete).is_none());
        assert_eq!(
            table.actions_for(Role::User, ModelKind::Post),
            vec![(Action::Delete, RuleKind::Deny)]
        );
    }

    #[test]
    fn test_duplicate_rule_is_rejected() {
        let err = PermissionTable::builder()
            .allow::<Post>(Role::User, PostAction::View, true)
            .allow::<Post>(Role::User, PostAction::View, false)
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            TableError::DuplicateRule {
                role: Role::User,
                model: ModelKind::Post,
                action: Action::View,
            }
        );
    }

    #[test]
    fn test_two_types_for_one_model_kind_is_rejected() {
        #[derive(serde::Deserialize)]
        struct Draft;

        impl Model for Draft {
            const KIND: ModelKind = ModelKind::Post;
            type Action = PostAction;
        }

        let err = PermissionTable::builder()
            .allow::<Post>(Role::User, PostAction::View, true)
            .allow::<Draft>(Role::Admin, PostAction::View, true)
            .build()
            .unwrap_err();

        assert_eq!(err, TableError::ConflictingModelType { model: ModelKind::Post });
    }

    #[test]
    fn test_rule_evaluation_fails_closed_without_data() {
        let rule: Rule<Post> = Rule::Check(|_, _| true);
        let user = User::new("1", "a@b.c", vec![Role::User]);

        assert!(!rule.evaluate(&user, None));
        assert!(rule.evaluate(&user, Some(&post("2"))));
        assert!(Rule::<Post>::Allow(true).evaluate(&user, None));
        assert_eq!(rule.kind(), RuleKind::Conditional);
    }

    #[test]
    fn test_debug_summarises_rules() {
        let table = PermissionTable::builder()
            .role(Role::Admin)
            .check::<Post>(Role::User, PostAction::Delete, owns)
            .build()
            .unwrap();

        let rendered = format!("{:?}", table);
        assert!(rendered.contains("Admin: {}"));
        assert!(rendered.contains("Conditional"));
    }
}
