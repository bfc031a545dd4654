use std::fmt::{Debug, Display, Formatter, Result};

use crate::{Color, NodeId, RbTree, tree::Side};

/// Renders the tree sideways, one node per line: the right subtree above its
/// parent and the left subtree below, each level indented further.
///
/// ```text
///     ┌── 21 (B)
/// ┌── 18 (B)
/// │   └── 16 (R)
/// 14 (B)
/// └── 4 (B)
/// ```
impl<K, P> Display for RbTree<K, P>
where
    K: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.root() {
            None => writeln!(f, "(empty)"),
            Some(root) => self.render(f, root, "", None),
        }
    }
}

impl<K, P> RbTree<K, P>
where
    K: Debug,
{
    fn render(&self, f: &mut Formatter<'_>, id: NodeId, prefix: &str, side: Option<Side>) -> Result {
        let Some(node) = self.node(id) else {
            return Ok(());
        };

        if let Some(right) = node.right() {
            let extension = match side {
                Some(Side::Left) => "│   ",
                _ => "    ",
            };
            self.render(f, right, &nested(prefix, side, extension), Some(Side::Right))?;
        }

        let branch = match side {
            None => "",
            Some(Side::Right) => "┌── ",
            Some(Side::Left) => "└── ",
        };
        let color = match node.color() {
            Color::Red => 'R',
            Color::Black => 'B',
        };
        writeln!(f, "{prefix}{branch}{:?} ({color})", node.key())?;

        if let Some(left) = node.left() {
            let extension = match side {
                Some(Side::Right) => "│   ",
                _ => "    ",
            };
            self.render(f, left, &nested(prefix, side, extension), Some(Side::Left))?;
        }

        Ok(())
    }
}

fn nested(prefix: &str, side: Option<Side>, extension: &str) -> String {
    match side {
        None => prefix.to_owned(),
        Some(_) => format!("{prefix}{extension}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::RbTree;

    #[test]
    fn it_renders_an_empty_tree() {
        let tree = RbTree::<u8, ()>::new();
        assert_eq!(tree.to_string(), "(empty)\n");
    }

    #[test]
    fn it_renders_right_children_above_left_children() {
        let mut tree = RbTree::new();
        for key in [2, 1, 3] {
            tree.insert_node(key, ());
        }

        assert_eq!(tree.to_string(), "┌── 3 (R)\n2 (B)\n└── 1 (R)\n");
    }

    #[test]
    fn it_indents_deeper_levels() {
        let mut tree = RbTree::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert_node(key, ());
        }

        let expected = [
            "    ┌── 7 (R)",
            "┌── 6 (B)",
            "│   └── 5 (R)",
            "4 (B)",
            "│   ┌── 3 (R)",
            "└── 2 (B)",
            "    └── 1 (R)",
            "",
        ]
        .join("\n");
        assert_eq!(tree.to_string(), expected);
    }
}
