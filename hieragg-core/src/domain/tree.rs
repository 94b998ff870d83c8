//! Process tree domain types
//!
//! Two representations live here:
//! - [`ProcessTree`]: the algebraic form produced by discovery
//! - [`TreeNode`]: the addressed, serializable form handed to clients,
//!   which can also hold aggregate nodes

use serde::{Deserialize, Serialize};

/// Label used for silent steps
pub const TAU_LABEL: &str = "τ";

/// Process tree operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Children execute one after another
    Sequence,
    /// Exactly one child executes
    Xor,
    /// Children interleave freely
    Parallel,
    /// First child is the body, the others are redo parts
    Loop,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Sequence => "→",
            Operator::Xor => "×",
            Operator::Parallel => "∧",
            Operator::Loop => "↺",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Sequence => write!(f, "sequence"),
            Operator::Xor => write!(f, "xor"),
            Operator::Parallel => write!(f, "parallel"),
            Operator::Loop => write!(f, "loop"),
        }
    }
}

/// A discovered process tree
///
/// `frequency` counts the events of the sub-log a node was mined from
/// (for silent steps: the traces it covers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessTree {
    Tau {
        frequency: u64,
    },
    Activity {
        label: String,
        frequency: u64,
    },
    Operator {
        operator: Operator,
        frequency: u64,
        children: Vec<ProcessTree>,
    },
}

impl ProcessTree {
    pub fn tau(frequency: u64) -> Self {
        ProcessTree::Tau { frequency }
    }

    pub fn activity(label: impl Into<String>, frequency: u64) -> Self {
        ProcessTree::Activity {
            label: label.into(),
            frequency,
        }
    }

    pub fn operator(operator: Operator, frequency: u64, children: Vec<ProcessTree>) -> Self {
        ProcessTree::Operator {
            operator,
            frequency,
            children,
        }
    }

    pub fn frequency(&self) -> u64 {
        match self {
            ProcessTree::Tau { frequency }
            | ProcessTree::Activity { frequency, .. }
            | ProcessTree::Operator { frequency, .. } => *frequency,
        }
    }

    /// Compact textual notation, e.g. `→(a, ×(b, c))`
    pub fn notation(&self) -> String {
        match self {
            ProcessTree::Tau { .. } => TAU_LABEL.to_string(),
            ProcessTree::Activity { label, .. } => label.clone(),
            ProcessTree::Operator {
                operator, children, ..
            } => {
                let inner: Vec<String> = children.iter().map(ProcessTree::notation).collect();
                format!("{}({})", operator.symbol(), inner.join(", "))
            }
        }
    }
}

/// Kind of a serialized tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Activity,
    Tau,
    Sequence,
    Xor,
    Parallel,
    Loop,
    /// A collapsed subtree produced by aggregation
    Aggregate,
}

impl From<Operator> for NodeKind {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Sequence => NodeKind::Sequence,
            Operator::Xor => NodeKind::Xor,
            Operator::Parallel => NodeKind::Parallel,
            Operator::Loop => NodeKind::Loop,
        }
    }
}

impl NodeKind {
    /// The operator this kind stands for, if any
    pub fn operator(&self) -> Option<Operator> {
        match self {
            NodeKind::Sequence => Some(Operator::Sequence),
            NodeKind::Xor => Some(Operator::Xor),
            NodeKind::Parallel => Some(Operator::Parallel),
            NodeKind::Loop => Some(Operator::Loop),
            _ => None,
        }
    }
}

/// Serializable process tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub frequency: u64,
    pub depth: usize,

    /// Activity labels absorbed by an aggregate node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Builds the addressed form of a process tree.
    ///
    /// Ids are `n0`, `n1`, … in pre-order; the root has depth 0.
    pub fn from_tree(tree: &ProcessTree) -> Self {
        let mut next_id = 0;
        Self::build(tree, 0, &mut next_id)
    }

    fn build(tree: &ProcessTree, depth: usize, next_id: &mut usize) -> Self {
        let id = format!("n{}", *next_id);
        *next_id += 1;

        match tree {
            ProcessTree::Tau { frequency } => TreeNode {
                id,
                label: TAU_LABEL.to_string(),
                kind: NodeKind::Tau,
                frequency: *frequency,
                depth,
                members: Vec::new(),
                children: Vec::new(),
            },
            ProcessTree::Activity { label, frequency } => TreeNode {
                id,
                label: label.clone(),
                kind: NodeKind::Activity,
                frequency: *frequency,
                depth,
                members: Vec::new(),
                children: Vec::new(),
            },
            ProcessTree::Operator {
                operator,
                frequency,
                children,
            } => {
                let children = children
                    .iter()
                    .map(|child| Self::build(child, depth + 1, next_id))
                    .collect();
                TreeNode {
                    id,
                    label: operator.symbol().to_string(),
                    kind: NodeKind::from(*operator),
                    frequency: *frequency,
                    depth,
                    members: Vec::new(),
                    children,
                }
            }
        }
    }

    /// Activity labels of all visible leaves below (and including) this node,
    /// in pre-order. Aggregate nodes contribute their members.
    pub fn activity_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        self.collect_labels(&mut labels);
        labels
    }

    fn collect_labels(&self, out: &mut Vec<String>) {
        match self.kind {
            NodeKind::Activity => out.push(self.label.clone()),
            NodeKind::Aggregate => out.extend(self.members.iter().cloned()),
            NodeKind::Tau => {}
            _ => {
                for child in &self.children {
                    child.collect_labels(out);
                }
            }
        }
    }

    /// Height of the tree rooted here (a leaf has height 0)
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }
}
