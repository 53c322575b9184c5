use std::future::Future;
use std::sync::Arc;

use fitchlist_types::RowKey;
use futures::future::BoxFuture;

use crate::error::BoxError;
use crate::handle::ListHandle;

/// Async callback behind a row or toolbar action
pub type ActionHandler<T> =
    Arc<dyn Fn(ActionContext<T>) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// What an action handler gets to work with
pub struct ActionContext<T> {
    /// Lets the handler refresh the list or clear the selection when it is done
    pub handle: ListHandle<T>,
    pub selected: Vec<RowKey>,
    /// Set for row actions, `None` for toolbar actions
    pub row: Option<T>,
}

pub struct ActionDef<T> {
    pub key: String,
    pub label: String,
    pub is_primary: bool,
    pub requires_confirmation: bool,
    pub handler: ActionHandler<T>,
}

impl<T> Clone for ActionDef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            is_primary: self.is_primary,
            requires_confirmation: self.requires_confirmation,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T: 'static> ActionDef<T> {
    pub fn new<F, Fut>(key: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ActionContext<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self {
            key: key.into(),
            label: label.into(),
            is_primary: false,
            requires_confirmation: false,
            handler: Arc::new(move |ctx| -> BoxFuture<'static, Result<(), BoxError>> {
                Box::pin(handler(ctx))
            }),
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn confirm(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }
}

impl<T> std::fmt::Debug for ActionDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("is_primary", &self.is_primary)
            .field("requires_confirmation", &self.requires_confirmation)
            .finish_non_exhaustive()
    }
}

/// The action shown first: the one flagged primary, else the first defined.
pub fn primary_action<T>(actions: &[ActionDef<T>]) -> Option<&ActionDef<T>> {
    actions
        .iter()
        .find(|action| action.is_primary)
        .or_else(|| actions.first())
}

pub fn find_action<'a, T>(actions: &'a [ActionDef<T>], key: &str) -> Option<&'a ActionDef<T>> {
    actions.iter().find(|action| action.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(key: &str) -> ActionDef<RowKey> {
        ActionDef::new(key, key.to_uppercase(), |_ctx: ActionContext<RowKey>| async {
            Ok::<(), BoxError>(())
        })
    }

    #[test]
    fn test_primary_falls_back_to_first() {
        let actions = vec![noop("edit"), noop("delete")];
        assert_eq!(primary_action(&actions).map(|a| a.key.as_str()), Some("edit"));

        let actions = vec![noop("edit"), noop("delete").primary()];
        assert_eq!(primary_action(&actions).map(|a| a.key.as_str()), Some("delete"));

        assert!(primary_action::<RowKey>(&[]).is_none());
    }

    #[test]
    fn test_find_action_by_key() {
        let actions = vec![noop("edit"), noop("delete").confirm()];
        let delete = find_action(&actions, "delete");
        assert!(delete.is_some_and(|a| a.requires_confirmation));
        assert!(find_action(&actions, "archive").is_none());
    }
}
