//! Breadth-first flattening of the session tree into leaf contexts.
//!
//! Each leaf carries its full path plus the chain of nodes from the root's
//! child down to the leaf itself, so the parser can merge inherited fields.

use crate::source::{Container, Node, Segment};

use std::collections::VecDeque;

/// One ancestor (or the leaf itself) and the path that reaches it.
#[derive(Debug, Clone)]
pub struct ChainLink<'a> {
    pub path: Vec<Segment>,
    pub node: &'a Node,
}

#[derive(Debug, Clone)]
pub struct LeafContext<'a> {
    /// Root to leaf.
    pub path: Vec<Segment>,
    /// Same length as `path`; the last link is the leaf.
    pub chain: Vec<ChainLink<'a>>,
}

impl<'a> LeafContext<'a> {
    pub fn leaf(&self) -> Option<&'a Node> {
        self.chain.last().map(|link| link.node)
    }
}

struct Link<'a> {
    segment: Segment,
    node: &'a Node,
    parent: Option<usize>,
}

/// Walk `root` and return its leaves in breadth-first discovery order.
///
/// A node with a sub-container is never a leaf, even when that container is
/// empty. The tree is owned data, so there are no cycles to guard against.
pub fn walk(root: &Container<Node>) -> Vec<LeafContext<'_>> {
    let mut links: Vec<Link<'_>> = Vec::new();
    let mut pending: VecDeque<usize> = VecDeque::new();

    for (segment, node) in root.children() {
        links.push(Link {
            segment,
            node,
            parent: None,
        });
        pending.push_back(links.len() - 1);
    }

    let mut out = Vec::new();
    while let Some(idx) = pending.pop_front() {
        let node = links[idx].node;
        match node.children() {
            Some(sub) => {
                for (segment, child) in sub.children() {
                    links.push(Link {
                        segment,
                        node: child,
                        parent: Some(idx),
                    });
                    pending.push_back(links.len() - 1);
                }
            }
            None => out.push(flatten(&links, idx)),
        }
    }

    tracing::debug!(nodes = links.len(), leaves = out.len(), "walked session tree");
    out
}

fn flatten<'a>(links: &[Link<'a>], leaf: usize) -> LeafContext<'a> {
    let mut lineage = Vec::new();
    let mut cur = Some(leaf);
    while let Some(idx) = cur {
        lineage.push(idx);
        cur = links[idx].parent;
    }
    lineage.reverse();

    let mut path = Vec::with_capacity(lineage.len());
    let mut chain = Vec::with_capacity(lineage.len());
    for idx in lineage {
        path.push(links[idx].segment.clone());
        chain.push(ChainLink {
            path: path.clone(),
            node: links[idx].node,
        });
    }

    LeafContext { path, chain }
}
