//! Singly linked list used as a bucket by [`ChainingMap`](crate::ChainingMap)

use std::fmt;

/// A list node owning the rest of the chain
#[derive(Debug)]
struct Node<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
    /// The following node, if any
    next: Link<V>,
}

/// Owning pointer to the next node
type Link<V> = Option<Box<Node<V>>>;

/// A singly linked list of key-value pairs.
///
/// New entries go to the head, so iteration yields the most recent insert first.
/// Keys are not checked for uniqueness here; the owning table does that.
#[derive(Debug)]
pub struct Chain<V> {
    /// First node of the list
    head: Link<V>,
    /// Number of nodes
    len: usize,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Chain<V> {
    /// Creates an empty chain
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of nodes in the chain
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain has no nodes
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Links a new node in front of the current head
    pub fn push_front(&mut self, key: String, value: V) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
        self.len = self.len.saturating_add(1);
    }

    /// Unlinks the head node and returns its pair
    pub fn pop_front(&mut self) -> Option<(String, V)> {
        let node = self.head.take()?;
        let Node { key, value, next } = *node;
        self.head = next;
        self.len = self.len.saturating_sub(1);
        Some((key, value))
    }

    /// Returns the value of the first node holding `key`
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value of the first node holding `key`
    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    /// Unlinks the first node holding `key` and returns its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| node.key != key) {
            link = &mut link.as_mut()?.next;
        }
        let node = link.take()?;
        let Node { value, next, .. } = *node;
        *link = next;
        self.len = self.len.saturating_sub(1);
        Some(value)
    }

    /// Returns an iterator from head to tail
    #[must_use]
    pub fn iter(&self) -> ChainIter<'_, V> {
        ChainIter { next: self.head.as_deref() }
    }
}

impl<V> Drop for Chain<V> {
    fn drop(&mut self) {
        // unlink node by node so long chains do not recurse through Box drops
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl<V> fmt::Display for Chain<V>
where
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, (key, value)) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "({key}: {value})")?;
        }
        Ok(())
    }
}

/// Borrowing iterator over a [`Chain`], head to tail
#[derive(Debug)]
pub struct ChainIter<'a, V> {
    /// Node to yield next
    next: Option<&'a Node<V>>,
}

impl<V> Clone for ChainIter<'_, V> {
    fn clone(&self) -> Self {
        Self { next: self.next }
    }
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some((node.key.as_str(), &node.value))
    }
}

impl<'a, V> IntoIterator for &'a Chain<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = ChainIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Consuming iterator over a [`Chain`], head to tail
#[derive(Debug)]
pub struct ChainIntoIter<V> {
    /// The chain being drained
    chain: Chain<V>,
}

impl<V> Iterator for ChainIntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len(), Some(self.chain.len()))
    }
}

impl<V> IntoIterator for Chain<V> {
    type Item = (String, V);
    type IntoIter = ChainIntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        ChainIntoIter { chain: self }
    }
}
