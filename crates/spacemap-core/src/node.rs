//! File and directory node types.

use compact_str::CompactString;
use serde::Serialize;

/// A single file or directory in the tree.
///
/// `children` is `None` for files, for directories that could not be read,
/// and for directories that were never expanded (other filesystems). An
/// expanded empty directory has `Some` empty children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    name: CompactString,
    area: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Create an unexpanded node with zero area.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            area: 0,
            children: None,
        }
    }

    /// Create a leaf with a known byte size.
    pub fn leaf(name: impl Into<CompactString>, area: i64) -> Self {
        Self {
            name: name.into(),
            area,
            children: None,
        }
    }

    /// Create an expanded directory from its children.
    ///
    /// The area stays zero until the tree is aggregated.
    pub fn directory(name: impl Into<CompactString>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            area: 0,
            children: Some(children),
        }
    }

    /// Entry base name; for the root, its absolute path without trailing `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes attributed to this node.
    pub fn area(&self) -> i64 {
        self.area
    }

    /// Children, if this node is an expanded directory.
    pub fn children(&self) -> Option<&[TreeNode]> {
        self.children.as_deref()
    }

    /// Check if this node was expanded as a directory.
    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    /// Get the number of direct children (0 when not expanded).
    pub fn num_children(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    /// Get the child at `index`, if any.
    pub fn child_at(&self, index: usize) -> Option<&TreeNode> {
        self.children.as_ref().and_then(|children| children.get(index))
    }

    /// Follow a route of child indices down from this node.
    pub fn descendant(&self, route: &[usize]) -> Option<&TreeNode> {
        route
            .iter()
            .try_fold(self, |node, &index| node.child_at(index))
    }

    /// Mutable variant of [`TreeNode::descendant`].
    pub fn descendant_mut(&mut self, route: &[usize]) -> Option<&mut TreeNode> {
        let mut node = self;
        for &index in route {
            node = node.children.as_mut()?.get_mut(index)?;
        }
        Some(node)
    }

    /// Assign the byte count.
    pub fn set_area(&mut self, area: i64) {
        self.area = area;
    }

    /// Attach the children of an expanded directory.
    pub fn set_children(&mut self, children: Vec<TreeNode>) {
        self.children = Some(children);
    }

    /// Mutable access to the children, if expanded.
    pub fn children_mut(&mut self) -> Option<&mut Vec<TreeNode>> {
        self.children.as_mut()
    }

    /// Reorder children so areas are non-increasing.
    ///
    /// Equal areas keep no particular order. Calling this again on an
    /// already sorted node leaves the order as it is.
    pub fn sort_children_descending(&mut self) {
        if let Some(children) = self.children.as_mut() {
            if children.is_sorted_by(|a, b| a.area >= b.area) {
                return;
            }
            children.sort_unstable_by(|a, b| b.area.cmp(&a.area));
        }
    }

    /// Number of nodes without children in this subtree (this node included).
    pub fn leaf_count(&self) -> u64 {
        self.fold(0, |count, node| {
            if node.children.is_none() {
                count + 1
            } else {
                count
            }
        })
    }

    /// Number of expanded directories in this subtree (this node included).
    pub fn dir_count(&self) -> u64 {
        self.fold(0, |count, node| {
            if node.children.is_some() {
                count + 1
            } else {
                count
            }
        })
    }

    /// Visit every node of the subtree without recursion.
    fn fold<T>(&self, init: T, mut f: impl FnMut(T, &TreeNode) -> T) -> T {
        let mut acc = init;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            acc = f(acc, node);
            if let Some(children) = &node.children {
                stack.extend(children.iter());
            }
        }
        acc
    }
}
