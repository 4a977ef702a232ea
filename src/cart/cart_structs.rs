// src/cart/cart_structs.rs

use std::{collections::HashMap, fmt, str::FromStr};

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::hotel_structs::HotelCart;

/// The four product buckets a cart is partitioned into.
/// Hotel bookings live in their own single-slot cart and are not a category here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartCategory {
    Grocery,
    Clothing,
    Jewellery,
    Electronics,
}

impl CartCategory {
    pub const ALL: [CartCategory; 4] = [
        CartCategory::Grocery,
        CartCategory::Clothing,
        CartCategory::Jewellery,
        CartCategory::Electronics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CartCategory::Grocery => "grocery",
            CartCategory::Clothing => "clothing",
            CartCategory::Jewellery => "jewellery",
            CartCategory::Electronics => "electronics",
        }
    }
}

impl fmt::Display for CartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CartCategory {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CartCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CartError::InvalidCategory(s.to_string()))
    }
}

/// Failures of cart mutations. Whenever one is returned the cart is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Invalid cart category: '{0}'")]
    InvalidCategory(String),

    #[error("Item '{id}' not found in {category} cart")]
    NotFound { id: String, category: CartCategory },

    #[error("Item '{0}' has a negative price")]
    NegativePrice(String),
}

/// Item as sent by a client when adding to the cart. The category is still
/// unchecked text; any quantity the client sends is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(alias = "type")]
    pub category: String,
}

/// One line of a category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    pub category: CartCategory,
}

impl CartItem {
    pub fn line_total(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

/// Per-category item lists. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    grocery: Vec<CartItem>,
    clothing: Vec<CartItem>,
    jewellery: Vec<CartItem>,
    electronics: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self, category: CartCategory) -> &[CartItem] {
        match category {
            CartCategory::Grocery => &self.grocery,
            CartCategory::Clothing => &self.clothing,
            CartCategory::Jewellery => &self.jewellery,
            CartCategory::Electronics => &self.electronics,
        }
    }

    fn list_mut(&mut self, category: CartCategory) -> &mut Vec<CartItem> {
        match category {
            CartCategory::Grocery => &mut self.grocery,
            CartCategory::Clothing => &mut self.clothing,
            CartCategory::Jewellery => &mut self.jewellery,
            CartCategory::Electronics => &mut self.electronics,
        }
    }

    fn find_mut(&mut self, id: &str, category: CartCategory) -> Result<&mut CartItem, CartError> {
        self.list_mut(category)
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CartError::NotFound {
                id: id.to_string(),
                category,
            })
    }

    /// Adds an item to its category list. A repeat add of the same id bumps the
    /// quantity by one; a new id is appended with quantity 1 whatever the
    /// client sent.
    pub fn add_item(&mut self, item: NewCartItem) -> Result<(), CartError> {
        let category = match item.category.parse::<CartCategory>() {
            Ok(category) => category,
            Err(e) => {
                warn!(item_id = %item.id, category = %item.category, "Ignoring add to invalid cart category");
                return Err(e);
            }
        };

        let list = self.list_mut(category);
        if let Some(existing) = list.iter_mut().find(|x| x.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return Ok(());
        }

        if item.price < BigDecimal::zero() {
            warn!(item_id = %item.id, "Ignoring add of item with negative price");
            return Err(CartError::NegativePrice(item.id));
        }

        list.push(CartItem {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: 1,
            category,
        });
        Ok(())
    }

    /// Increments the quantity. It saturates at `u32::MAX` rather than wrapping.
    pub fn increase_quantity(&mut self, id: &str, category: CartCategory) -> Result<(), CartError> {
        let item = self.find_mut(id, category)?;
        item.quantity = item.quantity.saturating_add(1);
        Ok(())
    }

    /// Decrements the quantity, dropping the line once it reaches zero.
    pub fn decrease_quantity(&mut self, id: &str, category: CartCategory) -> Result<(), CartError> {
        let item = self.find_mut(id, category)?;
        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            self.list_mut(category).retain(|x| x.id != id);
        }
        Ok(())
    }

    pub fn remove_item(&mut self, id: &str, category: CartCategory) -> Result<(), CartError> {
        let list = self.list_mut(category);
        let before = list.len();
        list.retain(|x| x.id != id);
        if list.len() == before {
            return Err(CartError::NotFound {
                id: id.to_string(),
                category,
            });
        }
        Ok(())
    }

    /// Empties one category, or every category when `None`.
    pub fn clear(&mut self, category: Option<CartCategory>) {
        match category {
            Some(category) => self.list_mut(category).clear(),
            None => *self = Cart::default(),
        }
    }

    /// Takes every line of one category out of the cart, leaving it empty.
    pub fn take_category(&mut self, category: CartCategory) -> Vec<CartItem> {
        std::mem::take(self.list_mut(category))
    }

    /// Puts lines taken by `take_category` back in front of the category.
    /// Lines added since then are kept after them; a line with the same id
    /// is merged into the restored one by adding quantities.
    pub fn restore_category(&mut self, category: CartCategory, lines: Vec<CartItem>) {
        let list = self.list_mut(category);
        let added_since = std::mem::replace(list, lines);
        for item in added_since {
            match list.iter_mut().find(|x| x.id == item.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
                None => list.push(item),
            }
        }
    }

    pub fn category_total(&self, category: CartCategory) -> BigDecimal {
        lines_total(self.items(category))
    }

    pub fn category_count(&self, category: CartCategory) -> u64 {
        self.items(category).iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        CartCategory::ALL.iter().all(|c| self.items(*c).is_empty())
    }

    pub fn category_summary(&self, category: CartCategory) -> CategorySummary {
        CategorySummary {
            category,
            items: self.items(category).to_vec(),
            total: self.category_total(category),
            count: self.category_count(category),
        }
    }

    pub fn summary(&self) -> Vec<CategorySummary> {
        CartCategory::ALL
            .iter()
            .map(|c| self.category_summary(*c))
            .collect()
    }
}

/// Σ price × quantity over `lines`.
pub fn lines_total(lines: &[CartItem]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::zero(), |sum, item| sum + item.line_total())
}

/// Read model of one category: its lines plus derived total and badge count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: CartCategory,
    pub items: Vec<CartItem>,
    pub total: BigDecimal,
    pub count: u64,
}

/// Everything a single user holds in memory between requests.
#[derive(Debug, Default)]
pub struct UserCarts {
    pub cart: Cart,
    pub hotel: HotelCart,
}

/// Session store: one cart set per authenticated user, created empty on first use.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: HashMap<Uuid, UserCarts>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &Uuid) -> Option<&UserCarts> {
        self.carts.get(user_id)
    }

    pub fn entry(&mut self, user_id: Uuid) -> &mut UserCarts {
        self.carts.entry(user_id).or_default()
    }
}
