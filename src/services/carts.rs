use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::sessions::CartKey;

/// One line of a session cart. Quantity is always >= 1; a decrement that
/// would reach zero removes the line instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Clone, Debug)]
struct Cart {
    entries: Vec<CartEntry>,
    updated_at: DateTime<Utc>,
}

impl Cart {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Session-scoped cart repository, keyed by cart identity. Lines keep their
/// insertion order. No stock check happens here; availability is enforced
/// at pricing and checkout time.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<CartKey, Cart>,
}

impl CartStore {
    pub fn new() -> Self {
        Self {
            carts: DashMap::new(),
        }
    }

    /// Adds one unit of the product, initializing the line at quantity 1.
    pub fn add(&self, key: &CartKey, product_id: Uuid) {
        let mut cart = self
            .carts
            .entry(key.clone())
            .or_insert_with(Cart::new);
        match cart.entries.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => entry.quantity += 1,
            None => cart.entries.push(CartEntry {
                product_id,
                quantity: 1,
            }),
        }
        cart.touch();
    }

    /// Removes one unit; a line at quantity 1 is dropped entirely. Unknown
    /// product ids are a no-op.
    pub fn decrease(&self, key: &CartKey, product_id: Uuid) {
        if let Some(mut cart) = self.carts.get_mut(key) {
            if let Some(pos) = cart.entries.iter().position(|e| e.product_id == product_id) {
                if cart.entries[pos].quantity > 1 {
                    cart.entries[pos].quantity -= 1;
                } else {
                    cart.entries.remove(pos);
                }
                cart.touch();
            }
        }
    }

    /// Drops the line entirely. Unknown product ids are a no-op.
    pub fn remove(&self, key: &CartKey, product_id: Uuid) {
        if let Some(mut cart) = self.carts.get_mut(key) {
            if let Some(pos) = cart.entries.iter().position(|e| e.product_id == product_id) {
                cart.entries.remove(pos);
                cart.touch();
            }
        }
    }

    /// Entries in insertion order.
    pub fn view(&self, key: &CartKey) -> Vec<CartEntry> {
        self.carts
            .get(key)
            .map(|cart| cart.entries.clone())
            .unwrap_or_default()
    }

    /// When the cart was last mutated. Mutations refresh this stamp, which
    /// stands in for marking the backing session dirty.
    pub fn last_updated(&self, key: &CartKey) -> Option<DateTime<Utc>> {
        self.carts.get(key).map(|cart| cart.updated_at)
    }

    pub fn is_empty(&self, key: &CartKey) -> bool {
        self.carts
            .get(key)
            .map(|cart| cart.entries.is_empty())
            .unwrap_or(true)
    }

    /// Empties the cart. Called only once a checkout has fully committed.
    pub fn clear(&self, key: &CartKey) {
        if let Some(mut cart) = self.carts.get_mut(key) {
            cart.entries.clear();
            cart.touch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CartKey {
        CartKey::Anonymous("test-session".to_string())
    }

    #[test]
    fn add_initializes_at_one_and_increments() {
        let store = CartStore::new();
        let product = Uuid::new_v4();
        let key = key();

        store.add(&key, product);
        assert_eq!(store.view(&key), vec![CartEntry { product_id: product, quantity: 1 }]);

        store.add(&key, product);
        assert_eq!(store.view(&key)[0].quantity, 2);
    }

    #[test]
    fn decrease_at_one_removes_the_line() {
        let store = CartStore::new();
        let product = Uuid::new_v4();
        let key = key();

        store.add(&key, product);
        store.decrease(&key, product);
        assert!(store.view(&key).is_empty());
        assert!(store.is_empty(&key));
    }

    #[test]
    fn decrease_and_remove_on_missing_product_are_noops() {
        let store = CartStore::new();
        let present = Uuid::new_v4();
        let absent = Uuid::new_v4();
        let key = key();

        store.add(&key, present);
        store.decrease(&key, absent);
        store.remove(&key, absent);
        assert_eq!(store.view(&key).len(), 1);
    }

    #[test]
    fn view_preserves_insertion_order() {
        let store = CartStore::new();
        let key = key();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        store.add(&key, first);
        store.add(&key, second);
        store.add(&key, third);
        store.add(&key, second);

        let ids: Vec<Uuid> = store.view(&key).iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn mutations_refresh_the_update_stamp() {
        let store = CartStore::new();
        let product = Uuid::new_v4();
        let key = key();

        assert!(store.last_updated(&key).is_none());
        store.add(&key, product);
        let stamped = store.last_updated(&key).expect("cart exists after add");
        store.decrease(&key, product);
        assert!(store.last_updated(&key).expect("cart still exists") >= stamped);
    }

    #[test]
    fn carts_are_private_per_identity() {
        let store = CartStore::new();
        let product = Uuid::new_v4();
        let customer = CartKey::Customer(Uuid::new_v4());
        let anonymous = CartKey::Anonymous("other".to_string());

        store.add(&customer, product);
        assert!(store.view(&anonymous).is_empty());
        assert_eq!(store.view(&customer).len(), 1);
    }

    #[test]
    fn clear_empties_only_the_given_cart() {
        let store = CartStore::new();
        let product = Uuid::new_v4();
        let a = CartKey::Anonymous("a".to_string());
        let b = CartKey::Anonymous("b".to_string());

        store.add(&a, product);
        store.add(&b, product);
        store.clear(&a);

        assert!(store.is_empty(&a));
        assert_eq!(store.view(&b).len(), 1);
    }
}
