//! A height-balanced binary search tree.
//!
//! The tree owns its items and orders them with a comparator closure that it
//! stores, so the same tree type can hold plain keys or sweep-line segments.
//! Nodes live in an arena and refer to their children by index; there are no
//! parent links, so navigating upwards (for successors and predecessors) is done
//! by descending again from the root.

use std::cmp::Ordering;

/// The index of a node in the tree's arena.
///
/// Node ids stay valid until the tree is next modified. (Deleting a node with
/// two children moves its successor's item into it, so after a deletion an id
/// might point at a different item or at nothing.)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    fn idx(self) -> usize {
        match self {
            Dir::Left => 0,
            Dir::Right => 1,
        }
    }

    fn flip(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    // The change in balance when the subtree in this direction gets taller.
    fn sign(self) -> i8 {
        match self {
            Dir::Left => -1,
            Dir::Right => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node<T> {
    item: T,
    children: [Option<NodeId>; 2],
    // height(right) - height(left)
    balance: i8,
}

impl<T> Node<T> {
    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn child(&self, dir: Dir) -> Option<NodeId> {
        self.children[dir.idx()]
    }

    pub fn balance(&self) -> i8 {
        self.balance
    }
}

/// What we're looking for while descending the tree.
#[derive(Debug)]
enum Probe<'a, T> {
    /// The node comparing equal to this key.
    Key(&'a T),
    /// The leftmost node of the subtree.
    Min,
    /// The rightmost node of the subtree.
    Max,
    /// The node at the end of this path.
    Path(&'a [Dir]),
}

impl<'a, T> Probe<'a, T> {
    /// Returns `None` if `node` is the one we're looking for; otherwise, the
    /// direction to go and what to look for there.
    fn step<C: Fn(&T, &T) -> Ordering>(self, cmp: &C, node: &Node<T>) -> Option<(Dir, Self)> {
        match self {
            Probe::Key(key) => match cmp(key, &node.item) {
                Ordering::Less => Some((Dir::Left, Probe::Key(key))),
                Ordering::Greater => Some((Dir::Right, Probe::Key(key))),
                Ordering::Equal => None,
            },
            Probe::Min => node.children[0].map(|_| (Dir::Left, Probe::Min)),
            Probe::Max => node.children[1].map(|_| (Dir::Right, Probe::Max)),
            Probe::Path(path) => path.split_first().map(|(d, rest)| (*d, Probe::Path(rest))),
        }
    }
}

struct Inserted {
    root: NodeId,
    id: NodeId,
    grew: bool,
}

struct Removed<T> {
    root: Option<NodeId>,
    item: T,
    shrank: bool,
}

/// A problem found by [`AvlTree::check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The stored balance factor disagrees with the subtree heights.
    WrongBalance {
        node: NodeId,
        stored: i8,
        actual: isize,
    },
    /// The subtree heights differ by more than one.
    Unbalanced { node: NodeId, balance: isize },
    /// An in-order neighbor pair that isn't strictly increasing.
    OutOfOrder { left: NodeId, right: NodeId },
}

/// An AVL tree, ordered by the comparator `C`.
///
/// The tree is a set: inserting an item that compares equal to an existing one
/// fails. Mutating operations return their results instead of mutating their
/// arguments; see [`AvlTree::insert`] and [`AvlTree::delete`].
#[derive(Clone)]
pub struct AvlTree<T, C> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
    cmp: C,
}

impl<T: std::fmt::Debug, C: Fn(&T, &T) -> Ordering> std::fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> Default for AvlTree<T, fn(&T, &T) -> Ordering> {
    fn default() -> Self {
        AvlTree::new(T::cmp)
    }
}

impl<T, C: Fn(&T, &T) -> Ordering> AvlTree<T, C> {
    pub fn new(cmp: C) -> Self {
        AvlTree {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            cmp,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Panics if `id` is stale.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes[id.0].as_ref().expect("stale node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes[id.0].as_mut().expect("stale node id")
    }

    pub fn item(&self, id: NodeId) -> &T {
        &self.node(id).item
    }

    fn alloc(&mut self, item: T) -> NodeId {
        let node = Node {
            item,
            children: [None, None],
            balance: 0,
        };
        self.len += 1;
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, id: NodeId) -> Node<T> {
        let node = self.nodes[id.0].take().expect("stale node id");
        self.free.push(id);
        self.len -= 1;
        node
    }

    /// The number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, at: Option<NodeId>) -> usize {
        at.map_or(0, |id| {
            let node = self.node(id);
            1 + self
                .subtree_height(node.children[0])
                .max(self.subtree_height(node.children[1]))
        })
    }

    fn descend(&self, mut probe: Probe<'_, T>) -> Option<NodeId> {
        let mut at = self.root;
        while let Some(id) = at {
            match probe.step(&self.cmp, self.node(id)) {
                None => return Some(id),
                Some((dir, next)) => {
                    at = self.node(id).children[dir.idx()];
                    probe = next;
                }
            }
        }
        None
    }

    /// Finds the node comparing equal to `key`.
    pub fn search(&self, key: &T) -> Option<NodeId> {
        self.descend(Probe::Key(key))
    }

    pub fn first(&self) -> Option<NodeId> {
        self.descend(Probe::Min)
    }

    pub fn last(&self) -> Option<NodeId> {
        self.descend(Probe::Max)
    }

    fn extreme(&self, mut id: NodeId, dir: Dir) -> NodeId {
        while let Some(child) = self.node(id).children[dir.idx()] {
            id = child;
        }
        id
    }

    /// The directions leading from the root to `id`.
    ///
    /// We first try following the comparator. That's enough for a consistent
    /// ordering, but if the ordering has changed since `id` was inserted then we
    /// might need to search the whole tree.
    fn path_to(&self, id: NodeId) -> Option<Vec<Dir>> {
        let key = &self.node(id).item;
        let mut path = Vec::new();
        let mut at = self.root;
        while let Some(cur) = at {
            if cur == id {
                return Some(path);
            }
            let dir = match (self.cmp)(key, &self.node(cur).item) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => break,
            };
            path.push(dir);
            at = self.node(cur).children[dir.idx()];
        }

        tracing::debug!(
            ?id,
            len = self.len,
            "comparator descent missed a node, searching the whole tree"
        );
        let mut path = Vec::new();
        self.find_path(self.root, &mut path, &|cur| cur == id)
            .then_some(path)
    }

    // Depth-first search for a node satisfying `pred`, leaving the path to it
    // in `path`.
    fn find_path(
        &self,
        at: Option<NodeId>,
        path: &mut Vec<Dir>,
        pred: &impl Fn(NodeId) -> bool,
    ) -> bool {
        let Some(id) = at else {
            return false;
        };
        if pred(id) {
            return true;
        }
        for dir in [Dir::Left, Dir::Right] {
            path.push(dir);
            if self.find_path(self.node(id).children[dir.idx()], path, pred) {
                return true;
            }
            path.pop();
        }
        false
    }

    // The in-order neighbor of `id` in direction `dir`.
    fn neighbor(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        if let Some(child) = self.node(id).children[dir.idx()] {
            return Some(self.extreme(child, dir.flip()));
        }

        // Without parent links, we walk down from the root. The neighbor is the
        // last node at which we turned the other way.
        let path = self.path_to(id)?;
        let mut candidate = None;
        let mut at = self.root?;
        for step in path {
            if step != dir {
                candidate = Some(at);
            }
            at = self.node(at).children[step.idx()]?;
        }
        candidate
    }

    /// The next node in order, if there is one.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbor(id, Dir::Right)
    }

    /// The previous node in order, if there is one.
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbor(id, Dir::Left)
    }

    /// Inserts an item, returning the node that holds it.
    ///
    /// If the tree already has an item comparing equal to `item`, the tree is
    /// left unchanged and `item` is handed back.
    pub fn insert(&mut self, item: T) -> Result<NodeId, T> {
        let ins = self.insert_at(self.root, item)?;
        self.root = Some(ins.root);
        Ok(ins.id)
    }

    fn insert_at(&mut self, at: Option<NodeId>, item: T) -> Result<Inserted, T> {
        let Some(id) = at else {
            let id = self.alloc(item);
            return Ok(Inserted {
                root: id,
                id,
                grew: true,
            });
        };

        let dir = match (self.cmp)(&item, &self.node(id).item) {
            Ordering::Less => Dir::Left,
            Ordering::Greater => Dir::Right,
            Ordering::Equal => return Err(item),
        };
        let ins = self.insert_at(self.node(id).children[dir.idx()], item)?;
        let node = self.node_mut(id);
        node.children[dir.idx()] = Some(ins.root);
        if !ins.grew {
            return Ok(Inserted { root: id, ..ins });
        }

        node.balance += dir.sign();
        let balance = node.balance;
        let (root, grew) = match balance {
            0 => (id, false),
            -1 | 1 => (id, true),
            // After an insertion, a rotation always restores the old height.
            _ => (self.rotate(id).0, false),
        };
        Ok(Inserted {
            root,
            id: ins.id,
            grew,
        })
    }

    /// Removes and returns the item comparing equal to `key`.
    pub fn delete(&mut self, key: &T) -> Option<T> {
        self.remove_with(Probe::Key(key))
    }

    /// Finds the node comparing equal to `key`, even if the comparator can't.
    ///
    /// This is [`AvlTree::search`], falling back to a linear search of every
    /// node.
    pub fn find_exact(&self, key: &T) -> Option<NodeId> {
        if let Some(id) = self.search(key) {
            return Some(id);
        }
        let path = self.path_to_key(key)?;
        let mut at = self.root?;
        for step in path {
            at = self.node(at).children[step.idx()]?;
        }
        Some(at)
    }

    fn path_to_key(&self, key: &T) -> Option<Vec<Dir>> {
        let mut path = Vec::new();
        self.find_path(self.root, &mut path, &|id| {
            (self.cmp)(key, &self.node(id).item) == Ordering::Equal
        })
        .then_some(path)
    }

    /// Removes and returns the item comparing equal to `key`, even if the
    /// comparator can't find it.
    ///
    /// If the items' ordering has changed since they were inserted (as it does
    /// for segments when the sweep-line moves), descending by comparisons can
    /// take a wrong turn. In that case we fall back to searching every node,
    /// which takes time linear in the tree's size instead of logarithmic.
    pub fn remove_exact(&mut self, key: &T) -> Option<T> {
        if let Some(item) = self.delete(key) {
            return Some(item);
        }

        let path = self.path_to_key(key)?;
        tracing::debug!(
            depth = path.len(),
            len = self.len,
            "removing a node that the comparator couldn't find"
        );
        self.remove_with(Probe::Path(&path))
    }

    fn remove_with(&mut self, probe: Probe<'_, T>) -> Option<T> {
        let removed = self.remove_at(self.root, probe)?;
        self.root = removed.root;
        Some(removed.item)
    }

    fn remove_at(&mut self, at: Option<NodeId>, probe: Probe<'_, T>) -> Option<Removed<T>> {
        let id = at?;
        let children = self.node(id).children;
        match probe.step(&self.cmp, self.node(id)) {
            Some((dir, next)) => {
                let removed = self.remove_at(children[dir.idx()], next)?;
                self.node_mut(id).children[dir.idx()] = removed.root;
                if !removed.shrank {
                    return Some(Removed {
                        root: Some(id),
                        ..removed
                    });
                }
                self.node_mut(id).balance -= dir.sign();
                let (root, shrank) = self.rebalance_after_removal(id);
                Some(Removed {
                    root: Some(root),
                    item: removed.item,
                    shrank,
                })
            }
            None => match children {
                [None, None] => Some(Removed {
                    root: None,
                    item: self.release(id).item,
                    shrank: true,
                }),
                [Some(child), None] | [None, Some(child)] => Some(Removed {
                    root: Some(child),
                    item: self.release(id).item,
                    shrank: true,
                }),
                [Some(_), Some(right)] => {
                    // Replace this node's item with its in-order successor,
                    // which is the minimum of the right subtree.
                    let succ = self
                        .remove_at(Some(right), Probe::Min)
                        .expect("non-empty subtree has a minimum");
                    let node = self.node_mut(id);
                    node.children[1] = succ.root;
                    let item = std::mem::replace(&mut node.item, succ.item);
                    if !succ.shrank {
                        return Some(Removed {
                            root: Some(id),
                            item,
                            shrank: false,
                        });
                    }
                    node.balance -= Dir::Right.sign();
                    let (root, shrank) = self.rebalance_after_removal(id);
                    Some(Removed {
                        root: Some(root),
                        item,
                        shrank,
                    })
                }
            },
        }
    }

    // Called after one of `id`'s subtrees shrank and its balance was updated.
    // Returns the new subtree root, and whether the subtree got shorter.
    fn rebalance_after_removal(&mut self, id: NodeId) -> (NodeId, bool) {
        match self.node(id).balance {
            0 => (id, true),
            -1 | 1 => (id, false),
            _ => self.rotate(id),
        }
    }

    /// Rotates a subtree whose balance is +2 or -2, returning the new root and
    /// whether the subtree's height changed.
    fn rotate(&mut self, id: NodeId) -> (NodeId, bool) {
        let heavy = if self.node(id).balance > 0 {
            Dir::Right
        } else {
            Dir::Left
        };
        let child = self.node(id).children[heavy.idx()].expect("heavy side is non-empty");
        if self.node(child).balance == -heavy.sign() {
            (self.rotate_double(id, heavy), true)
        } else {
            self.rotate_single(id, heavy)
        }
    }

    fn rotate_single(&mut self, id: NodeId, heavy: Dir) -> (NodeId, bool) {
        let (d, e) = (heavy.idx(), heavy.flip().idx());
        let child = self.node(id).children[d].expect("heavy side is non-empty");
        let inner = self.node(child).children[e];
        self.node_mut(id).children[d] = inner;
        self.node_mut(child).children[e] = Some(id);

        let height_changed = self.node(child).balance != 0;
        let new_balance = self.node(child).balance - heavy.sign();
        self.node_mut(child).balance = new_balance;
        self.node_mut(id).balance = -new_balance;
        (child, height_changed)
    }

    fn rotate_double(&mut self, id: NodeId, heavy: Dir) -> NodeId {
        let (d, e) = (heavy.idx(), heavy.flip().idx());
        let child = self.node(id).children[d].expect("heavy side is non-empty");
        let mid = self.node(child).children[e].expect("inner grandchild of a double rotation");
        let [mid_left, mid_right] = self.node(mid).children;
        let (mid_inner, mid_outer) = if heavy == Dir::Right {
            (mid_left, mid_right)
        } else {
            (mid_right, mid_left)
        };
        self.node_mut(id).children[d] = mid_inner;
        self.node_mut(child).children[e] = mid_outer;

        let b = self.node(mid).balance;
        let mid_node = self.node_mut(mid);
        mid_node.children[e] = Some(id);
        mid_node.children[d] = Some(child);
        mid_node.balance = 0;
        let [left, right] = mid_node.children.map(|c| c.expect("just set"));
        self.node_mut(left).balance = -b.max(0);
        self.node_mut(right).balance = -b.min(0);
        mid
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> Iter<'_, T, C> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left(self.root);
        iter
    }

    /// Checks the tree's invariants.
    ///
    /// Every balance factor must match the subtree heights and be at most one
    /// in absolute value, and the items must be strictly increasing in order.
    pub fn check(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        self.check_balance(self.root, &mut violations);

        let mut ids = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut at = self.root;
        while at.is_some() || !stack.is_empty() {
            while let Some(id) = at {
                stack.push(id);
                at = self.node(id).children[0];
            }
            if let Some(id) = stack.pop() {
                ids.push(id);
                at = self.node(id).children[1];
            }
        }
        for pair in ids.windows(2) {
            if (self.cmp)(self.item(pair[0]), self.item(pair[1])) != Ordering::Less {
                violations.push(Violation::OutOfOrder {
                    left: pair[0],
                    right: pair[1],
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn check_balance(&self, at: Option<NodeId>, violations: &mut Vec<Violation>) -> usize {
        let Some(id) = at else {
            return 0;
        };
        let node = self.node(id);
        let left = self.check_balance(node.children[0], violations) as isize;
        let right = self.check_balance(node.children[1], violations) as isize;
        let actual = right - left;
        if actual != node.balance as isize {
            violations.push(Violation::WrongBalance {
                node: id,
                stored: node.balance,
                actual,
            });
        }
        if actual.abs() > 1 {
            violations.push(Violation::Unbalanced {
                node: id,
                balance: actual,
            });
        }
        1 + left.max(right) as usize
    }
}

/// An in-order iterator over an [`AvlTree`].
pub struct Iter<'a, T, C> {
    tree: &'a AvlTree<T, C>,
    stack: Vec<NodeId>,
}

impl<T, C: Fn(&T, &T) -> Ordering> Iter<'_, T, C> {
    fn push_left(&mut self, mut at: Option<NodeId>) {
        while let Some(id) = at {
            self.stack.push(id);
            at = self.tree.node(id).children[0];
        }
    }
}

impl<'a, T, C: Fn(&T, &T) -> Ordering> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let id = self.stack.pop()?;
        let tree: &'a AvlTree<T, C> = self.tree;
        let node = tree.node(id);
        self.push_left(node.children[1]);
        Some(&node.item)
    }
}
