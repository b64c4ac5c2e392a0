use rand::Rng;
use std::collections::HashMap;

/// Known connection identities with O(1) insert, remove and uniform pick.
///
/// `ids` is dense; `index` maps each id to its slot. Removal swaps the last id
/// into the freed slot.
#[derive(Debug, Default)]
pub struct IdentitySet {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already known
    pub fn insert(&mut self, id: &str) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        self.index.insert(id.to_string(), self.ids.len());
        self.ids.push(id.to_string());
        true
    }

    /// Returns false if the id was not known
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        self.ids.swap_remove(slot);
        if let Some(moved) = self.ids.get(slot) {
            self.index.insert(moved.clone(), slot);
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Uniformly random identity, or None when empty
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.ids.is_empty() {
            return None;
        }
        Some(&self.ids[rng.gen_range(0..self.ids.len())])
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
