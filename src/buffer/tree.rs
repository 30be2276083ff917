//! Weighted persistent AVL tree.
//!
//! Both the line rope and the style span tree are ordered sequences addressed
//! by a cumulative measure: lines count 1 each, spans count their length.
//! This module implements that shape once.
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │ item  weight=3       │
//!                 │ total=9  height=2    │
//!                 └───────┬──────┬───────┘
//!           ┌─────────────┘      └─────────────┐
//!   ┌───────┴────────┐                 ┌───────┴────────┐
//!   │ weight=2 tot=2 │                 │ weight=4 tot=4 │
//!   └────────────────┘                 └────────────────┘
//!     offsets 0..2        offsets 2..5       offsets 5..9
//! ```
//!
//! Nodes are immutable and shared through [`Arc`]. Every update copies the
//! path from the root to the touched node and returns a new root; all other
//! subtrees are shared with the previous version, which stays valid.

use std::sync::Arc;

/// An item with a measure along the tree's address axis.
pub(crate) trait Weighted {
    /// Width of the item on the address axis. Must be non-zero.
    fn weight(&self) -> usize;
}

type Link<T> = Option<Arc<Node<T>>>;

#[derive(Debug)]
struct Node<T> {
    item: T,
    left: Link<T>,
    right: Link<T>,
    /// Sum of the weights in this subtree.
    total: usize,
    height: u32,
}

#[inline]
fn height<T>(link: &Link<T>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

#[inline]
fn total<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.total)
}

impl<T: Weighted + Clone> Node<T> {
    /// Build a node, recomputing its height and total from its children.
    fn make(left: Link<T>, item: T, right: Link<T>) -> Arc<Self> {
        let total = total(&left) + item.weight() + total(&right);
        let height = height(&left).max(height(&right)) + 1;
        Arc::new(Self {
            item,
            left,
            right,
            total,
            height,
        })
    }

    /// Build a node whose children differ in height by at most 2, rotating
    /// as needed to restore the AVL invariant.
    fn balance(left: Link<T>, item: T, right: Link<T>) -> Arc<Self> {
        let (left_height, right_height) = (height(&left), height(&right));

        if left_height > right_height + 1 {
            if let Some(l) = &left {
                if height(&l.left) >= height(&l.right) {
                    // Single right rotation.
                    let new_right = Self::make(l.right.clone(), item, right);
                    return Self::make(l.left.clone(), l.item.clone(), Some(new_right));
                }
                if let Some(lr) = &l.right {
                    // Left-right double rotation.
                    let new_left = Self::make(l.left.clone(), l.item.clone(), lr.left.clone());
                    let new_right = Self::make(lr.right.clone(), item, right);
                    return Self::make(Some(new_left), lr.item.clone(), Some(new_right));
                }
            }
        } else if right_height > left_height + 1 {
            if let Some(r) = &right {
                if height(&r.right) >= height(&r.left) {
                    // Single left rotation.
                    let new_left = Self::make(left, item, r.left.clone());
                    return Self::make(Some(new_left), r.item.clone(), r.right.clone());
                }
                if let Some(rl) = &r.left {
                    // Right-left double rotation.
                    let new_left = Self::make(left, item, rl.left.clone());
                    let new_right = Self::make(rl.right.clone(), r.item.clone(), r.right.clone());
                    return Self::make(Some(new_left), rl.item.clone(), Some(new_right));
                }
            }
        }

        Self::make(left, item, right)
    }
}

/// A persistent weighted AVL tree.
///
/// Cloning is O(1): it copies the root handle only.
pub(crate) struct Tree<T> {
    root: Link<T>,
}

impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<T: Weighted + Clone> Tree<T> {
    /// Create an empty tree.
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Build a perfectly balanced tree from items in order.
    pub fn from_items(items: &[T]) -> Self {
        fn build<T: Weighted + Clone>(items: &[T]) -> Link<T> {
            if items.is_empty() {
                return None;
            }
            let mid = items.len() / 2;
            Some(Node::make(
                build(&items[..mid]),
                items[mid].clone(),
                build(&items[mid + 1..]),
            ))
        }

        Self { root: build(items) }
    }

    /// Sum of all item weights.
    #[inline]
    pub fn total(&self) -> usize {
        total(&self.root)
    }

    /// Height of the tree (0 when empty).
    #[inline]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Check if the tree holds no items.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Find the item covering `offset`, with the offset at which it starts.
    pub fn find(&self, mut offset: usize) -> Option<(&T, usize)> {
        let mut base = 0;
        let mut link = &self.root;
        while let Some(node) = link {
            let left_total = total(&node.left);
            let weight = node.item.weight();
            if offset < left_total {
                link = &node.left;
            } else if offset < left_total + weight {
                return Some((&node.item, base + left_total));
            } else {
                offset -= left_total + weight;
                base += left_total + weight;
                link = &node.right;
            }
        }
        None
    }

    /// Insert `item` so that it starts at `offset`.
    ///
    /// `offset` must be an item boundary (or the total); callers split items
    /// beforehand when it is not.
    #[must_use]
    pub fn insert(&self, offset: usize, item: T) -> Self {
        fn insert<T: Weighted + Clone>(link: &Link<T>, offset: usize, item: T) -> Arc<Node<T>> {
            let Some(node) = link else {
                return Node::make(None, item, None);
            };
            let left_total = total(&node.left);
            if offset <= left_total {
                let left = insert(&node.left, offset, item);
                Node::balance(Some(left), node.item.clone(), node.right.clone())
            } else {
                let offset = offset.saturating_sub(left_total + node.item.weight());
                let right = insert(&node.right, offset, item);
                Node::balance(node.left.clone(), node.item.clone(), Some(right))
            }
        }

        Self {
            root: Some(insert(&self.root, offset, item)),
        }
    }

    /// Remove the item covering `offset`, returning the new tree and the item.
    ///
    /// Returns `None` when `offset` is past the end.
    pub fn remove(&self, offset: usize) -> Option<(Self, T)> {
        fn remove<T: Weighted + Clone>(node: &Arc<Node<T>>, offset: usize) -> (Link<T>, T) {
            let left_total = total(&node.left);
            let weight = node.item.weight();

            match (&node.left, &node.right) {
                (Some(left), _) if offset < left_total => {
                    let (left, removed) = remove(left, offset);
                    let root = Node::balance(left, node.item.clone(), node.right.clone());
                    (Some(root), removed)
                }
                (_, Some(right)) if offset >= left_total + weight => {
                    let (right, removed) = remove(right, offset - left_total - weight);
                    let root = Node::balance(node.left.clone(), node.item.clone(), right);
                    (Some(root), removed)
                }
                (None, right) => (right.clone(), node.item.clone()),
                (left, None) => (left.clone(), node.item.clone()),
                (Some(_), Some(right)) => {
                    // Replace this node with its in-order successor, then
                    // delete the successor from the right subtree.
                    let (right, successor) = remove(right, 0);
                    let root = Node::balance(node.left.clone(), successor, right);
                    (Some(root), node.item.clone())
                }
            }
        }

        if offset >= self.total() {
            return None;
        }
        let root = self.root.as_ref()?;
        let (root, removed) = remove(root, offset);
        Some((Self { root }, removed))
    }

    /// Replace the item covering `offset` with `f(item, start)`.
    ///
    /// The tree shape is unchanged, so no rebalancing is needed. Returns an
    /// unchanged copy when `offset` is past the end.
    #[must_use]
    pub fn replace(&self, offset: usize, f: impl FnOnce(&T, usize) -> T) -> Self {
        fn replace<T: Weighted + Clone>(
            node: &Arc<Node<T>>,
            offset: usize,
            base: usize,
            f: impl FnOnce(&T, usize) -> T,
        ) -> Arc<Node<T>> {
            let left_total = total(&node.left);
            let weight = node.item.weight();
            match (&node.left, &node.right) {
                (Some(left), _) if offset < left_total => {
                    let left = replace(left, offset, base, f);
                    Node::make(Some(left), node.item.clone(), node.right.clone())
                }
                (_, Some(right)) if offset >= left_total + weight => {
                    let shift = left_total + weight;
                    let right = replace(right, offset - shift, base + shift, f);
                    Node::make(node.left.clone(), node.item.clone(), Some(right))
                }
                _ => {
                    let item = f(&node.item, base + left_total);
                    Node::make(node.left.clone(), item, node.right.clone())
                }
            }
        }

        match &self.root {
            Some(root) if offset < root.total => Self {
                root: Some(replace(root, offset, 0, f)),
            },
            _ => self.clone(),
        }
    }

    /// Replace every item lying entirely inside `lo..hi` with `f(item)`.
    ///
    /// Subtrees outside the range are shared, so the cost is proportional to
    /// the number of items touched plus the tree height.
    #[must_use]
    pub fn map_range(&self, lo: usize, hi: usize, f: impl Fn(&T) -> T) -> Self {
        fn map<T: Weighted + Clone>(
            link: &Link<T>,
            base: usize,
            lo: usize,
            hi: usize,
            f: &impl Fn(&T) -> T,
        ) -> Link<T> {
            let node = link.as_ref()?;
            if base >= hi || base + node.total <= lo {
                return link.clone();
            }
            let start = base + total(&node.left);
            let end = start + node.item.weight();
            let left = map(&node.left, base, lo, hi, f);
            let right = map(&node.right, end, lo, hi, f);
            let item = if start >= lo && end <= hi {
                f(&node.item)
            } else {
                node.item.clone()
            };
            Some(Node::make(left, item, right))
        }

        if lo >= hi {
            return self.clone();
        }
        Self {
            root: map(&self.root, 0, lo, hi, &f),
        }
    }

    /// Iterate over items in order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.iter_from(0)
    }

    /// Iterate in order, starting with the item covering `offset`.
    pub fn iter_from(&self, mut offset: usize) -> Iter<'_, T> {
        let mut stack = Vec::with_capacity(self.height() as usize);
        let mut link = &self.root;
        while let Some(node) = link {
            let left_total = total(&node.left);
            let weight = node.item.weight();
            if offset < left_total {
                stack.push(node.as_ref());
                link = &node.left;
            } else if offset < left_total + weight {
                stack.push(node.as_ref());
                break;
            } else {
                offset -= left_total + weight;
                link = &node.right;
            }
        }
        Iter { stack }
    }

    /// Verify heights, totals and the AVL balance invariant at every node.
    pub fn is_balanced(&self) -> bool {
        fn check<T: Weighted>(link: &Link<T>) -> Option<(u32, usize)> {
            let Some(node) = link else {
                return Some((0, 0));
            };
            let (left_height, left_total) = check(&node.left)?;
            let (right_height, right_total) = check(&node.right)?;
            let height = left_height.max(right_height) + 1;
            let total = left_total + node.item.weight() + right_total;
            let balanced = left_height.abs_diff(right_height) <= 1;
            (balanced && node.height == height && node.total == total && node.item.weight() > 0)
                .then_some((height, total))
        }

        check(&self.root).is_some()
    }
}

/// In-order iterator over a [`Tree`].
pub(crate) struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut link = &node.right;
        while let Some(child) = link {
            self.stack.push(child.as_ref());
            link = &child.left;
        }
        Some(&node.item)
    }
}
