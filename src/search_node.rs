use crate::minimax::Score;
use crate::{GameOutcome, Mark, Move};
use ego_tree::{NodeRef, Tree};

/// Represents a single position in a captured minimax search tree.
///
/// Built by [`MinimaxSearch::build_tree`](crate::minimax::MinimaxSearch::build_tree).
/// Scores are always from the perspective of the mark the tree was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    /// The move that led to this node's position. `None` for the root node.
    pub prev_move: Option<Move>,
    /// The mark that made `prev_move`. `None` for the root node.
    pub mark: Option<Mark>,
    /// Number of plies between the root and this node.
    pub height: usize,
    /// Minimax value of the position.
    pub score: Score,
    /// Status of the game at this node.
    pub outcome: GameOutcome,
}

impl SearchNode {
    pub(crate) fn root() -> Self {
        SearchNode {
            prev_move: None,
            mark: None,
            height: 0,
            score: 0,
            outcome: GameOutcome::InProgress,
        }
    }

    /// Whether the game ended at this node.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }
}

/// The first child of `node` that achieves the node's own score, i.e. the move the
/// search engine would pick there.
pub fn best_child<'a>(node: NodeRef<'a, SearchNode>) -> Option<NodeRef<'a, SearchNode>> {
    let score = node.value().score;
    node.children().find(|child| child.value().score == score)
}

/// The line of play expected when both sides follow the search from the root.
pub fn principal_variation(tree: &Tree<SearchNode>) -> Vec<Move> {
    let mut line = Vec::new();
    let mut node = tree.root();
    while let Some(child) = best_child(node) {
        if let Some(cell) = child.value().prev_move {
            line.push(cell);
        }
        node = child;
    }
    line
}
