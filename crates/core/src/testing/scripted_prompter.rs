//! Scripted stand-in for the terminal dialog layer.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{Category, Item};
use crate::classify::{CategoryDecision, DecisionPrompter, ItemDecision};

/// [`DecisionPrompter`] that replays canned decisions.
///
/// An exhausted script behaves like the operator exiting the loop, which
/// is also how tests express an early exit.
#[derive(Default)]
pub struct ScriptedPrompter {
    category_script: Mutex<VecDeque<CategoryDecision>>,
    item_script: Mutex<VecDeque<ItemDecision>>,
    seen_categories: Mutex<Vec<String>>,
    seen_items: Mutex<Vec<u32>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category_decisions(self, decisions: Vec<CategoryDecision>) -> Self {
        *self.category_script.lock().unwrap() = decisions.into();
        self
    }

    pub fn with_item_decisions(self, decisions: Vec<ItemDecision>) -> Self {
        *self.item_script.lock().unwrap() = decisions.into();
        self
    }

    /// Category names presented, in order.
    pub fn seen_categories(&self) -> Vec<String> {
        self.seen_categories.lock().unwrap().clone()
    }

    /// Item identifiers presented, in order.
    pub fn seen_items(&self) -> Vec<u32> {
        self.seen_items.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionPrompter for ScriptedPrompter {
    async fn decide_category(&self, category: &Category) -> Option<CategoryDecision> {
        self.seen_categories
            .lock()
            .unwrap()
            .push(category.name.clone());
        self.category_script.lock().unwrap().pop_front()
    }

    async fn decide_item(&self, item: &Item) -> Option<ItemDecision> {
        self.seen_items.lock().unwrap().push(item.id);
        self.item_script.lock().unwrap().pop_front()
    }
}
