// src/wishlist/wishlist_structs.rs

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A liked product. Only `id` takes part in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Adds the item if no item with its id is present, removes it otherwise.
    /// Returns whether the item is liked after the call.
    pub fn toggle_like(&mut self, item: WishlistItem) -> bool {
        if self.contains(&item.id) {
            self.items.retain(|i| i.id != item.id);
            false
        } else {
            self.items.push(item);
            true
        }
    }
}

#[derive(Debug, Default)]
pub struct WishlistStore {
    wishlists: HashMap<Uuid, Wishlist>,
}

impl WishlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &Uuid) -> Option<&Wishlist> {
        self.wishlists.get(user_id)
    }

    pub fn entry(&mut self, user_id: Uuid) -> &mut Wishlist {
        self.wishlists.entry(user_id).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> WishlistItem {
        WishlistItem {
            id: id.to_string(),
            name: format!("Liked {id}"),
            price: BigDecimal::from(250),
            image: None,
            category: None,
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut wishlist = Wishlist::default();

        assert!(wishlist.toggle_like(item("p1")));
        assert!(wishlist.contains("p1"));

        assert!(!wishlist.toggle_like(item("p1")));
        assert!(wishlist.items().is_empty());
    }

    #[test]
    fn toggle_twice_restores_other_items() {
        let mut wishlist = Wishlist::default();
        wishlist.toggle_like(item("a"));
        wishlist.toggle_like(item("b"));
        let before = wishlist.clone();

        wishlist.toggle_like(item("c"));
        wishlist.toggle_like(item("c"));

        assert_eq!(wishlist, before);
    }

    #[test]
    fn identity_is_by_id_only() {
        let mut wishlist = Wishlist::default();
        wishlist.toggle_like(item("p1"));

        let mut renamed = item("p1");
        renamed.name = "Different label".to_string();
        assert!(!wishlist.toggle_like(renamed));
        assert!(wishlist.items().is_empty());
    }
}
