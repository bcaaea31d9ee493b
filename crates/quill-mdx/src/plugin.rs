//! Tree plugins.

use crate::tree::Tree;

/// A pass over the parsed document tree, run before rendering.
///
/// Plugins run in registration order and may mutate any node.
pub trait TreePlugin: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Mutate the tree in place.
    fn run(&self, tree: &mut Tree<'_>);
}
