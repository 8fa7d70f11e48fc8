//! Unicode tree rendering via termtree.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::arena::ComponentArena;

/// Placeholder shown when asked to render a stale handle.
const EMPTY_LABEL: &str = "(empty)";

/// Conversion from arena subtrees to displayable [`termtree::Tree`] values.
pub trait DisplayTree {
    /// Renders the subtree rooted at `node`, labels only.
    fn display_tree(&self, node: Index) -> Tree<String>;

    /// Renders every root in the forest, in arena iteration order.
    fn display_forest(&self) -> Vec<Tree<String>>;
}

impl DisplayTree for ComponentArena {
    #[instrument(level = "debug", skip(self))]
    fn display_tree(&self, node: Index) -> Tree<String> {
        if let Some(root) = self.get(node) {
            let mut tree = Tree::new(root.data.to_string());

            fn push_children(arena: &ComponentArena, idx: Index, parent_tree: &mut Tree<String>) {
                if let Some(node) = arena.get(idx) {
                    for &child_idx in node.children() {
                        if let Some(child) = arena.get(child_idx) {
                            let mut child_tree = Tree::new(child.data.to_string());
                            push_children(arena, child_idx, &mut child_tree);
                            parent_tree.push(child_tree);
                        }
                    }
                }
            }

            push_children(self, node, &mut tree);
            tree
        } else {
            Tree::new(EMPTY_LABEL.to_string())
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn display_forest(&self) -> Vec<Tree<String>> {
        self.roots()
            .into_iter()
            .map(|root| self.display_tree(root))
            .collect()
    }
}
