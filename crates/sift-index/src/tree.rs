//! Page trees.
//!
//! Pages reference their parent by `pid`. [`ContentTree`] keeps them in an
//! arena with parent/child indices and walks it depth first without
//! recursion. Three page flags shape the walk:
//!
//! - `hidden`: the page and everything below it are skipped
//! - `no_search`: the page itself is skipped, its children are visited
//! - `no_search_sub`: the children are skipped, the page itself is not

use std::collections::HashMap;

use crate::record::Record;

#[derive(Debug)]
struct TreeNode {
    record: Record,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena of records linked by `pid`.
#[derive(Debug, Default)]
pub struct ContentTree {
    nodes: Vec<TreeNode>,
    roots: Vec<usize>,
}

impl ContentTree {
    /// Build the tree.
    ///
    /// Records whose `pid` is missing or unknown become roots. Records that
    /// only reach each other through their `pid` links form a cycle; the
    /// first of them in input order is cut from its parent and becomes a
    /// root, so every record is walked. Siblings are ordered by their
    /// `sorting` field, then by input order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let positions: HashMap<String, usize> = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.id.clone(), index))
            .collect();

        let mut nodes: Vec<TreeNode> = records
            .into_iter()
            .map(|record| TreeNode {
                record,
                parent: None,
                children: Vec::new(),
            })
            .collect();

        let mut roots = Vec::new();
        for index in 0..nodes.len() {
            let parent = nodes[index]
                .record
                .string("pid")
                .and_then(|pid| positions.get(&pid).copied())
                .filter(|&parent| parent != index);
            match parent {
                Some(parent) => {
                    nodes[index].parent = Some(parent);
                    nodes[parent].children.push(index);
                }
                None => roots.push(index),
            }
        }

        let mut reachable = vec![false; nodes.len()];
        mark_reachable(&nodes, &roots, &mut reachable);
        for index in 0..nodes.len() {
            if reachable[index] {
                continue;
            }
            if let Some(parent) = nodes[index].parent.take() {
                nodes[parent].children.retain(|&child| child != index);
                log::warn!(
                    "Page {} has a pid cycle through page {}; walking it as a root",
                    nodes[index].record.id,
                    nodes[parent].record.id
                );
            }
            roots.push(index);
            mark_reachable(&nodes, &[index], &mut reachable);
        }

        let sorting = |nodes: &[TreeNode], index: usize| {
            nodes[index].record.integer("sorting").unwrap_or(i64::MAX)
        };
        roots.sort_by_key(|&index| sorting(&nodes, index));
        for index in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[index].children);
            children.sort_by_key(|&child| sorting(&nodes, child));
            nodes[index].children = children;
        }

        Self { nodes, roots }
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent record of the record with the given id.
    pub fn parent_of(&self, id: &str) -> Option<&Record> {
        self.nodes
            .iter()
            .find(|node| node.record.id == id)
            .and_then(|node| node.parent)
            .map(|parent| &self.nodes[parent].record)
    }

    /// Pre-order walk honouring the search flags.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

fn mark_reachable(nodes: &[TreeNode], from: &[usize], reachable: &mut [bool]) {
    let mut stack = from.to_vec();
    while let Some(index) = stack.pop() {
        if !reachable[index] {
            reachable[index] = true;
            stack.extend(&nodes[index].children);
        }
    }
}

/// Iterator returned by [`ContentTree::depth_first`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    tree: &'a ContentTree,
    stack: Vec<usize>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.stack.pop() {
            let node = &self.tree.nodes[index];
            if node.record.flag("hidden") {
                continue;
            }
            if !node.record.flag("no_search_sub") {
                self.stack.extend(node.children.iter().rev().copied());
            }
            if !node.record.flag("no_search") {
                return Some(&node.record);
            }
        }
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
