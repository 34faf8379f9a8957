//! Path reconstruction for revealing a node by identity.
//!
//! The node a view last selected may no longer exist after a rebuild (the
//! configuration changed, or it was never materialized). Resolution then
//! falls back to the deepest node whose resource still encloses the target's.

use super::node::TreeNode;
use super::result_tree::ResultTree;
use crate::base::NodeId;

/// The chain of nodes from a root to `target`, or to the closest surviving
/// ancestor-like node.
///
/// Depth-first over the live tree. An exact identity match ends the search.
/// Otherwise the best candidate is the node with the longest resource that is
/// a path prefix of the target's resource; the first one wins on ties. Only
/// candidates are descended into. Returns an empty path when nothing matches.
pub async fn path_from_root(tree: &ResultTree, target: &NodeId) -> Vec<TreeNode> {
    let mut best: Vec<TreeNode> = Vec::new();
    let mut best_len = 0;

    let mut stack: Vec<Vec<TreeNode>> = tree
        .tree()
        .iter()
        .rev()
        .map(|root| vec![root.clone()])
        .collect();

    while let Some(path) = stack.pop() {
        let Some(node) = path.last() else {
            continue;
        };
        if node.has_id(target) {
            return path;
        }

        let Some(score) = candidate_score(node, target) else {
            continue;
        };
        if score > best_len {
            best_len = score;
            best = path.clone();
        }

        if node.has_children() {
            let children = tree.get_children(node).await;
            for child in children.iter().rev() {
                let mut child_path = path.clone();
                child_path.push(child.clone());
                stack.push(child_path);
            }
        }
    }

    best
}

/// Length of the node's resource if it is a path prefix of the target's.
fn candidate_score(node: &TreeNode, target: &NodeId) -> Option<usize> {
    let resource = node.resource()?;
    let target = target.resource()?;
    resource
        .is_path_prefix_of(target)
        .then(|| resource.as_str().len())
}
