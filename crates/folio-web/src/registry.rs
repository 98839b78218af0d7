#![forbid(unsafe_code)]

//! Stable [`ElementId`] handles for host-side nodes.
//!
//! The runtime only ever sees opaque ids. A node gets an id the first time a
//! query returns it and keeps it for the life of the registry, so repeated
//! queries for the same node agree.

use folio_core::host::ElementId;

/// Interning table from host nodes to ids.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    nodes: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T: PartialEq> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `node`, assigning a fresh one on first sight.
    pub fn intern(&mut self, node: T) -> ElementId {
        if let Some(id) = self.find(&node) {
            return id;
        }
        let id = ElementId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    /// Id of an already-interned node.
    #[must_use]
    pub fn find(&self, node: &T) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|n| n == node)
            .and_then(|i| u32::try_from(i).ok())
            .map(ElementId::new)
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.nodes.get(id.get() as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First interned node along `chain`, walking outwards.
    ///
    /// Clicks land on the innermost element; this maps them back to the
    /// control the runtime knows about.
    pub fn find_in<I>(&self, chain: I) -> Option<ElementId>
    where
        I: IntoIterator<Item = T>,
    {
        chain.into_iter().find_map(|node| self.find(&node))
    }
}
