/// An owned key/value pair stored in a tree node.
///
/// The key never changes once the entry exists; the value is overwritten in
/// place when the same key is inserted again.
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) const fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}
