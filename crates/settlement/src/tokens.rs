//! Index assignment for the token list of a settlement.

use primitive_types::H160;
use std::collections::{hash_map::Entry, HashMap};

/// A deduplicating, insertion ordered token address to index table.
///
/// Trades and swap steps reference tokens by index into the settlement's token
/// list, so every encoder owns exactly one registry and resolves all addresses
/// through it.
#[derive(Clone, Debug, Default)]
pub struct TokenRegistry {
    tokens: Vec<H160>,
    indices: HashMap<H160, usize>,
}

impl TokenRegistry {
    /// Returns the index assigned to the token, assigning the next sequential
    /// index on first use.
    pub fn index(&mut self, token: H160) -> usize {
        match self.indices.entry(token) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.tokens.len();
                self.tokens.push(token);
                entry.insert(index);
                index
            }
        }
    }

    /// A snapshot of the insertion ordered token list.
    pub fn addresses(&self) -> Vec<H160> {
        self.tokens.clone()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_indices_in_first_seen_order() {
        let token_a = H160([0x0a; 20]);
        let token_b = H160([0x0b; 20]);

        let mut registry = TokenRegistry::default();
        assert_eq!(registry.index(token_a), 0);
        assert_eq!(registry.index(token_b), 1);
        assert_eq!(registry.index(token_a), 0);
        assert_eq!(registry.addresses(), [token_a, token_b]);
    }

    #[test]
    fn snapshot_is_detached_from_the_registry() {
        let mut registry = TokenRegistry::default();
        registry.index(H160([0x0a; 20]));
        let snapshot = registry.addresses();
        registry.index(H160([0x0b; 20]));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
