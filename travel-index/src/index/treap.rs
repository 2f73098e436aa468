//! Randomized binary search tree over route strings.
//!
//! Nodes are ordered by their route string and heap-ordered by a random
//! priority, which keeps the expected height logarithmic without any
//! balance bookkeeping. Each node is owned by its parent; rotations move
//! boxed subtrees between owners.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Highest priority a node can be assigned. Priorities are drawn from
/// `1..=MAX_PRIORITY`.
pub const MAX_PRIORITY: u8 = 100;

type Link = Option<Box<TreapNode>>;

#[derive(Debug)]
struct TreapNode {
    route: String,
    priority: u8,
    left: Link,
    right: Link,
}

impl TreapNode {
    fn new(route: String, priority: u8) -> Box<Self> {
        Box::new(Self {
            route,
            priority,
            left: None,
            right: None,
        })
    }
}

/// Treap keyed on route strings.
///
/// The random source is injected so that tests can fix priorities. The
/// treap does not deduplicate: every insert adds a node.
#[derive(Debug)]
pub struct RouteTreap<R = StdRng> {
    root: Link,
    len: usize,
    rng: R,
}

impl RouteTreap<StdRng> {
    /// Create an empty treap seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for RouteTreap<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RouteTreap<R> {
    /// Create an empty treap drawing priorities from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            root: None,
            len: 0,
            rng,
        }
    }

    /// Insert a route with a fresh random priority.
    pub fn insert(&mut self, route: impl Into<String>) {
        let priority = self.rng.gen_range(1..=MAX_PRIORITY);
        self.insert_with_priority(route, priority);
    }

    /// Insert a route with an explicit priority.
    pub fn insert_with_priority(&mut self, route: impl Into<String>, priority: u8) {
        let node = TreapNode::new(route.into(), priority);
        self.root = Some(insert_at(self.root.take(), node));
        self.len += 1;
    }
}

impl<R> RouteTreap<R> {
    /// Every stored route starting with `prefix` (case-sensitive), in
    /// lexicographic order.
    ///
    /// Both subtrees of every node are visited: a prefix is not a full key,
    /// so the side it sorts on says nothing about where its matches live.
    pub fn search_prefix(&self, prefix: &str) -> Vec<String> {
        let mut matches = Vec::new();
        collect_prefix(&self.root, prefix, &mut matches);
        matches
    }

    /// Whether `route` is stored, by ordinary BST lookup.
    pub fn contains(&self, route: &str) -> bool {
        let mut current = &self.root;
        while let Some(node) = current {
            current = match route.cmp(node.route.as_str()) {
                Ordering::Equal => return true,
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
            };
        }
        false
    }

    /// All routes in order.
    pub fn in_order(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.len);
        collect_in_order(&self.root, &mut out);
        out
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the treap has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Sideways dump of the tree: right subtree above, left below, four
    /// spaces per level, one `(route, priority)` line per node.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_into(&self.root, 0, &mut out);
        out
    }
}

fn insert_at(link: Link, node: Box<TreapNode>) -> Box<TreapNode> {
    let Some(mut root) = link else {
        return node;
    };

    if node.route < root.route {
        let child = insert_at(root.left.take(), node);
        let promote = child.priority > root.priority;
        root.left = Some(child);
        if promote { rotate_right(root) } else { root }
    } else {
        let child = insert_at(root.right.take(), node);
        let promote = child.priority > root.priority;
        root.right = Some(child);
        if promote { rotate_left(root) } else { root }
    }
}

/// Lift the left child above `root`. The child's right subtree becomes
/// `root`'s left subtree.
fn rotate_right(mut root: Box<TreapNode>) -> Box<TreapNode> {
    match root.left.take() {
        Some(mut pivot) => {
            root.left = pivot.right.take();
            pivot.right = Some(root);
            pivot
        }
        None => root,
    }
}

/// Lift the right child above `root`. The child's left subtree becomes
/// `root`'s right subtree.
fn rotate_left(mut root: Box<TreapNode>) -> Box<TreapNode> {
    match root.right.take() {
        Some(mut pivot) => {
            root.right = pivot.left.take();
            pivot.left = Some(root);
            pivot
        }
        None => root,
    }
}

fn collect_prefix(link: &Link, prefix: &str, out: &mut Vec<String>) {
    if let Some(node) = link {
        collect_prefix(&node.left, prefix, out);
        if node.route.starts_with(prefix) {
            out.push(node.route.clone());
        }
        collect_prefix(&node.right, prefix, out);
    }
}

fn collect_in_order<'a>(link: &'a Link, out: &mut Vec<&'a str>) {
    if let Some(node) = link {
        collect_in_order(&node.left, out);
        out.push(&node.route);
        collect_in_order(&node.right, out);
    }
}

fn height(link: &Link) -> usize {
    match link {
        Some(node) => 1 + height(&node.left).max(height(&node.right)),
        None => 0,
    }
}

fn render_into(link: &Link, level: usize, out: &mut String) {
    if let Some(node) = link {
        render_into(&node.right, level + 1, out);
        out.push_str(&"    ".repeat(level));
        out.push_str(&format!("({}, {})\n", node.route, node.priority));
        render_into(&node.left, level + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::node_count_checked as check_invariants;
    use super::*;

    fn seeded() -> RouteTreap {
        RouteTreap::with_rng(StdRng::seed_from_u64(7))
    }

    fn root_route<R>(treap: &RouteTreap<R>) -> &str {
        &treap.root.as_ref().unwrap().route
    }

    #[test]
    fn empty_treap() {
        let treap = seeded();
        assert!(treap.is_empty());
        assert_eq!(treap.len(), 0);
        assert_eq!(treap.height(), 0);
        assert!(treap.search_prefix("").is_empty());
        assert!(!treap.contains("Mumbai -> Dubai"));
        assert_eq!(treap.render(), "");
    }

    #[test]
    fn higher_priority_left_child_rotates_right() {
        let mut treap = seeded();
        treap.insert_with_priority("M", 10);
        treap.insert_with_priority("C", 50);

        // C outranks M, so it becomes the root with M on its right
        assert_eq!(root_route(&treap), "C");
        let root = treap.root.as_ref().unwrap();
        assert_eq!(root.right.as_ref().unwrap().route, "M");
        assert!(root.left.is_none());
        check_invariants(&treap.root);
    }

    #[test]
    fn higher_priority_right_child_rotates_left() {
        let mut treap = seeded();
        treap.insert_with_priority("C", 10);
        treap.insert_with_priority("M", 50);

        assert_eq!(root_route(&treap), "M");
        let root = treap.root.as_ref().unwrap();
        assert_eq!(root.left.as_ref().unwrap().route, "C");
        check_invariants(&treap.root);
    }

    #[test]
    fn rotation_moves_inner_subtree() {
        // D(90) with B(40) left, B has C(20) right. Inserting A(95) lifts A
        // through B and D; C must stay reachable.
        let mut treap = seeded();
        treap.insert_with_priority("D", 90);
        treap.insert_with_priority("B", 40);
        treap.insert_with_priority("C", 20);
        treap.insert_with_priority("A", 95);

        assert_eq!(root_route(&treap), "A");
        assert_eq!(treap.in_order(), vec!["A", "B", "C", "D"]);
        assert_eq!(check_invariants(&treap.root), 4);
    }

    #[test]
    fn lower_priority_stays_below() {
        let mut treap = seeded();
        treap.insert_with_priority("M", 80);
        treap.insert_with_priority("C", 30);
        treap.insert_with_priority("X", 30);

        assert_eq!(root_route(&treap), "M");
        assert_eq!(treap.height(), 2);
    }

    #[test]
    fn equal_keys_go_right() {
        let mut treap = seeded();
        treap.insert_with_priority("Delhi -> Dubai", 50);
        treap.insert_with_priority("Delhi -> Dubai", 10);

        let root = treap.root.as_ref().unwrap();
        assert!(root.left.is_none());
        assert_eq!(root.right.as_ref().unwrap().route, "Delhi -> Dubai");
        assert_eq!(treap.len(), 2);
    }

    #[test]
    fn prefix_search_is_case_sensitive() {
        let mut treap = seeded();
        treap.insert("Mumbai -> Dubai");
        treap.insert("mumbai -> bali");

        assert_eq!(treap.search_prefix("Mumbai"), vec!["Mumbai -> Dubai"]);
        assert_eq!(treap.search_prefix("mumbai"), vec!["mumbai -> bali"]);
        assert!(treap.search_prefix("MUMBAI").is_empty());
    }

    #[test]
    fn prefix_search_finds_matches_on_both_sides() {
        // Root "Mumbai -> Dubai" sorts after the prefix "Mumbai", yet
        // "Mumbai -> Goa" lives in its right subtree.
        let mut treap = seeded();
        treap.insert_with_priority("Mumbai -> Dubai", 90);
        treap.insert_with_priority("Mumbai -> Bali", 50);
        treap.insert_with_priority("Mumbai -> Goa", 50);
        treap.insert_with_priority("Delhi -> Dubai", 10);

        assert_eq!(
            treap.search_prefix("Mumbai"),
            vec!["Mumbai -> Bali", "Mumbai -> Dubai", "Mumbai -> Goa"]
        );
        assert_eq!(treap.search_prefix("Delhi"), vec!["Delhi -> Dubai"]);
        assert!(treap.search_prefix("Paris").is_empty());
    }

    #[test]
    fn empty_prefix_matches_everything() {
        let mut treap = seeded();
        for route in ["b", "a", "c"] {
            treap.insert(route);
        }
        assert_eq!(treap.search_prefix(""), vec!["a", "b", "c"]);
    }

    #[test]
    fn contains_exact_only() {
        let mut treap = seeded();
        treap.insert("Mumbai -> Dubai");
        assert!(treap.contains("Mumbai -> Dubai"));
        assert!(!treap.contains("Mumbai"));
        assert!(!treap.contains("mumbai -> dubai"));
    }

    #[test]
    fn render_layout() {
        let mut treap = seeded();
        treap.insert_with_priority("M", 90);
        treap.insert_with_priority("C", 40);
        treap.insert_with_priority("X", 30);

        assert_eq!(treap.render(), "    (X, 30)\n(M, 90)\n    (C, 40)\n");
    }

    #[test]
    fn sorted_inserts_stay_shallow() {
        let mut treap = seeded();
        for i in 0..1000 {
            treap.insert(format!("route {i:04}"));
        }
        assert_eq!(check_invariants(&treap.root), 1000);
        // A degenerate list would be 1000 deep
        assert!(treap.height() < 100, "height {}", treap.height());
    }
}
