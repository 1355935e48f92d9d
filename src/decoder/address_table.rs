use solana_sdk::pubkey::Pubkey;

/// Ordered account addresses of one transaction
///
/// Index order is `static ++ loaded writable ++ loaded readonly`. Entries are
/// never reordered or deduplicated, so instruction indices stay valid for the
/// lifetime of the transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressTable(Vec<Pubkey>);

impl AddressTable {
    /// Concatenates the three address lists of a transaction
    pub fn from_parts(
        static_keys: &[Pubkey],
        loaded_writable: &[Pubkey],
        loaded_readonly: &[Pubkey],
    ) -> Self {
        let mut keys =
            Vec::with_capacity(static_keys.len() + loaded_writable.len() + loaded_readonly.len());
        keys.extend_from_slice(static_keys);
        keys.extend_from_slice(loaded_writable);
        keys.extend_from_slice(loaded_readonly);
        Self(keys)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Address at `index`, `None` when out of range
    pub fn get(&self, index: usize) -> Option<&Pubkey> {
        self.0.get(index)
    }

    /// Address referenced by an instruction account index
    pub fn resolve(&self, index: u8) -> Option<Pubkey> {
        self.get(usize::from(index)).copied()
    }

    /// Position of the first occurrence of `key`
    pub fn index_of(&self, key: &Pubkey) -> Option<usize> {
        self.0.iter().position(|k| k == key)
    }

    pub fn contains(&self, key: &Pubkey) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pubkey> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Pubkey] {
        &self.0
    }
}

impl From<Vec<Pubkey>> for AddressTable {
    fn from(keys: Vec<Pubkey>) -> Self {
        Self(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<Pubkey> {
        (0..n).map(|_| Pubkey::new_unique()).collect()
    }

    #[test]
    fn test_concatenation_order_and_length() {
        for (s, w, r) in [(0, 0, 0), (3, 0, 0), (0, 2, 0), (0, 0, 4), (5, 2, 3), (1, 7, 1)] {
            let (a, b, c) = (keys(s), keys(w), keys(r));
            let table = AddressTable::from_parts(&a, &b, &c);

            assert_eq!(table.len(), s + w + r);
            let expected: Vec<Pubkey> = a.iter().chain(&b).chain(&c).copied().collect();
            assert_eq!(table.as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn test_duplicates_are_kept() {
        let key = Pubkey::new_unique();
        let table = AddressTable::from_parts(&[key], &[key], &[]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of(&key), Some(0));
    }

    #[test]
    fn test_out_of_range_lookup() {
        let table = AddressTable::from_parts(&keys(2), &[], &[]);
        assert!(table.get(2).is_none());
        assert!(table.resolve(200).is_none());
        assert!(table.index_of(&Pubkey::new_unique()).is_none());
    }
}
