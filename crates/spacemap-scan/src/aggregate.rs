//! Bottom-up size aggregation.

use spacemap_core::TreeNode;

/// Set every expanded directory's area to the sum of its children's areas.
///
/// Nodes without children keep the area they already have. Returns the
/// resulting area of `node`.
pub fn aggregate(node: &mut TreeNode) -> i64 {
    let Some(children) = node.children_mut() else {
        return node.area();
    };
    let total = children
        .iter_mut()
        .map(aggregate)
        .fold(0i64, i64::saturating_add);
    node.set_area(total);
    total
}
