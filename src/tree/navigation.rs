//! Previous/next leaf navigation.
//!
//! Leaves are visited in depth-first order, materializing children on the
//! way. Moving forward from the last leaf, or backward from the first, yields
//! nothing; the cursor never wraps around.

use super::node::TreeNode;
use super::result_tree::ResultTree;

/// Direction of a navigation step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn pick<'a>(self, nodes: &'a [TreeNode]) -> Option<&'a TreeNode> {
        match self {
            Direction::Forward => nodes.first(),
            Direction::Backward => nodes.last(),
        }
    }

    fn sibling(self, nodes: &[TreeNode], index: usize) -> Option<&TreeNode> {
        match self {
            Direction::Forward => nodes.get(index + 1),
            Direction::Backward => index.checked_sub(1).and_then(|i| nodes.get(i)),
        }
    }
}

/// The chain of nodes from a root down to one node.
#[derive(Clone, Debug)]
pub struct NodePath(Vec<TreeNode>);

impl NodePath {
    /// A path holding a single root node.
    pub fn root(node: TreeNode) -> Self {
        Self(vec![node])
    }

    /// Wrap a root-to-node chain; `None` if it is empty.
    pub fn from_nodes(nodes: Vec<TreeNode>) -> Option<Self> {
        (!nodes.is_empty()).then_some(Self(nodes))
    }

    /// The node the path leads to.
    pub fn node(&self) -> &TreeNode {
        // never empty by construction
        &self.0[self.0.len() - 1]
    }

    pub fn parent(&self) -> Option<&TreeNode> {
        self.0.len().checked_sub(2).map(|i| &self.0[i])
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn into_nodes(self) -> Vec<TreeNode> {
        self.0
    }
}

/// Step to the next (or previous) leaf from `current`.
///
/// Without a current node the first (last) leaf of the tree is returned.
/// Moving forward from a node with children enters it; otherwise the search
/// climbs until an ancestor has a sibling in `direction`, then descends into
/// that sibling's first (last) leaf.
pub async fn advance(
    tree: &ResultTree,
    current: Option<&NodePath>,
    direction: Direction,
) -> Option<NodePath> {
    let Some(current) = current else {
        let roots = tree.tree();
        let root = direction.pick(&roots)?.clone();
        return Some(descend(tree, vec![root], direction).await);
    };

    if direction == Direction::Forward && current.node().has_children() {
        let children = tree.get_children(current.node()).await;
        if let Some(first) = children.first() {
            let mut path = current.0.clone();
            path.push(first.clone());
            return Some(descend(tree, path, direction).await);
        }
    }

    let mut path = current.0.clone();
    while let Some(node) = path.pop() {
        let siblings = match path.last() {
            Some(parent) => tree.get_children(parent).await,
            None => tree.tree(),
        };
        let id = node.node_id();
        let next = siblings
            .iter()
            .position(|sibling| sibling.has_id(&id))
            .and_then(|index| direction.sibling(&siblings, index));
        if let Some(next) = next {
            path.push(next.clone());
            return Some(descend(tree, path, direction).await);
        }
    }
    None
}

/// The first leaf of the tree.
pub async fn first_leaf(tree: &ResultTree) -> Option<NodePath> {
    advance(tree, None, Direction::Forward).await
}

/// The last leaf of the tree.
pub async fn last_leaf(tree: &ResultTree) -> Option<NodePath> {
    advance(tree, None, Direction::Backward).await
}

/// Follow first (last) children down from the end of `path` to a leaf.
async fn descend(tree: &ResultTree, mut path: Vec<TreeNode>, direction: Direction) -> NodePath {
    while let Some(node) = path.last() {
        if !node.has_children() {
            break;
        }
        let children = tree.get_children(node).await;
        match direction.pick(&children) {
            Some(child) => {
                let child = child.clone();
                path.push(child);
            }
            None => break,
        }
    }
    NodePath(path)
}
