use crate::{Color, DialogCollectionsError, NodeId, RbTree, tree::Side};

impl<K, P> RbTree<K, P>
where
    K: Ord + std::fmt::Debug,
{
    /// Checks every structural invariant of the tree and returns its black
    /// height: the number of black nodes on each path from the root down to
    /// an absent leaf.
    ///
    /// The checked invariants are:
    ///
    /// - the root is black and has no parent
    /// - no red node has a red child
    /// - every root-to-leaf path crosses the same number of black nodes
    /// - every child links back to its parent
    /// - keys are in non-decreasing order
    pub fn validate(&self) -> Result<usize, DialogCollectionsError> {
        let Some(root) = self.root() else {
            return Ok(0);
        };

        let node = self.node(root).ok_or_else(|| {
            DialogCollectionsError::Invariant(format!("root {root} is not allocated"))
        })?;
        if node.color() != Color::Black {
            return Err(DialogCollectionsError::Invariant(format!(
                "root {root} is red"
            )));
        }
        if node.parent().is_some() {
            return Err(DialogCollectionsError::Invariant(format!(
                "root {root} has a parent"
            )));
        }

        let mut visited = 0;
        let height = self.validate_subtree(root, None, None, &mut visited)?;

        if visited != self.node_count() {
            return Err(DialogCollectionsError::Invariant(format!(
                "{visited} nodes reachable but {} allocated",
                self.node_count()
            )));
        }

        Ok(height)
    }

    fn validate_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        visited: &mut usize,
    ) -> Result<usize, DialogCollectionsError> {
        let node = self.node(id).ok_or_else(|| {
            DialogCollectionsError::Invariant(format!("node {id} is not allocated"))
        })?;
        *visited += 1;

        if lower.is_some_and(|lower| node.key() < lower)
            || upper.is_some_and(|upper| node.key() > upper)
        {
            return Err(DialogCollectionsError::Invariant(format!(
                "key {:?} of node {id} is out of order",
                node.key()
            )));
        }

        let mut heights = [0; 2];
        for (index, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            let Some(child) = self.child(id, side) else {
                continue;
            };
            let child_node = self.node(child).ok_or_else(|| {
                DialogCollectionsError::Invariant(format!("child {child} is not allocated"))
            })?;

            if child_node.parent() != Some(id) {
                return Err(DialogCollectionsError::Invariant(format!(
                    "child {child} does not link back to {id}"
                )));
            }
            if node.color() == Color::Red && child_node.color() == Color::Red {
                return Err(DialogCollectionsError::Invariant(format!(
                    "red node {id} has red child {child}"
                )));
            }

            heights[index] = match side {
                Side::Left => self.validate_subtree(child, lower, Some(node.key()), visited)?,
                Side::Right => self.validate_subtree(child, Some(node.key()), upper, visited)?,
            };
        }

        if heights[0] != heights[1] {
            return Err(DialogCollectionsError::Invariant(format!(
                "black height differs below {id}: {} left, {} right",
                heights[0], heights[1]
            )));
        }

        Ok(heights[0] + usize::from(node.color() == Color::Black))
    }

    /// Like [`RbTree::validate`], and additionally requires every key to be
    /// distinct.
    pub fn validate_unique(&self) -> Result<usize, DialogCollectionsError> {
        let height = self.validate()?;

        let mut current = self.first();
        while let Some(id) = current {
            let next = self.next_node(id);
            if let Some(next) = next {
                if self.key(id) == self.key(next) {
                    return Err(DialogCollectionsError::Invariant(format!(
                        "key {:?} is stored in both {id} and {next}",
                        self.key(id)
                    )));
                }
            }
            current = next;
        }

        Ok(height)
    }
}
