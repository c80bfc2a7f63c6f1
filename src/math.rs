/// Type alias for the hasher that backs [`Set`] and [`Map`].
pub type FxBuildHasher = fxhash::FxBuildHasher;

/// Type alias for sets, we use this to hide which type of set we are actually using.
/// Iteration follows insertion order, which is also the order in which elements are displayed.
pub type Set<S> = indexmap::IndexSet<S, FxBuildHasher>;
/// Type alias for maps, we use this to hide which type of map we are actually using.
/// Like [`Set`], iteration follows insertion order.
pub type Map<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;

/// Splits `list` at every occurrence of `separator` and trims the resulting pieces. Empty
/// pieces are kept, so `"q0,,q1"` yields three entries, the middle one being empty.
pub fn split_trimmed(list: &str, separator: char) -> impl Iterator<Item = &str> + '_ {
    list.split(separator).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_keep_insertion_order() {
        let mut set = Set::default();
        for x in ["q2", "q0", "q1", "q0"] {
            set.insert(x);
        }
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["q2", "q0", "q1"]);
    }

    #[test]
    fn splitting_trims_and_keeps_empty_pieces() {
        assert_eq!(
            split_trimmed(" q0 ,, q1", ',').collect::<Vec<_>>(),
            vec!["q0", "", "q1"]
        );
    }
}
