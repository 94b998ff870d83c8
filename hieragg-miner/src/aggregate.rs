//! Hierarchical aggregation of process trees
//!
//! Collapses operator subtrees into single aggregate nodes, either at a
//! fixed depth or wherever the frequency of a subtree falls below a
//! threshold. Aggregate ids are minted by an [`AggregationContext`] owned
//! by the caller, so separate aggregation runs never share counters.

use hieragg_core::domain::tree::{NodeKind, TAU_LABEL, TreeNode};
use hieragg_core::dto::aggregate::{AggregateQuery, Metric};

use crate::error::{EngineError, Result};

/// Members listed in full in an aggregate label
const LABEL_MEMBERS: usize = 3;

/// What to collapse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationOptions {
    /// Collapse every operator node at this depth (root = 0)
    pub level: Option<usize>,
    pub metric: Metric,
    /// Collapse operator subtrees whose metric value is below this
    pub threshold: Option<u64>,
}

impl AggregationOptions {
    pub fn at_level(level: usize) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    pub fn below_frequency(threshold: u64) -> Self {
        Self {
            threshold: Some(threshold),
            metric: Metric::Frequency,
            ..Self::default()
        }
    }

    /// True when aggregation would leave the tree unchanged
    pub fn is_noop(&self) -> bool {
        self.level.is_none() && self.threshold.is_none()
    }

    /// Rejects a level deeper than any node of `tree`
    pub fn validate(&self, tree: &TreeNode) -> Result<()> {
        match self.level {
            Some(level) if level > tree.height() => Err(EngineError::InvalidOptions(format!(
                "level {} exceeds tree height {}",
                level,
                tree.height()
            ))),
            _ => Ok(()),
        }
    }

    fn metric_value(&self, node: &TreeNode) -> u64 {
        match self.metric {
            Metric::Frequency => node.frequency,
        }
    }

    fn collapses(&self, node: &TreeNode, depth: usize) -> bool {
        if node.kind.operator().is_none() {
            return false;
        }
        let at_level = self.level == Some(depth);
        let below = self
            .threshold
            .is_some_and(|t| self.metric_value(node) < t);
        at_level || below
    }
}

impl From<AggregateQuery> for AggregationOptions {
    fn from(query: AggregateQuery) -> Self {
        Self {
            level: query.level,
            metric: query.metric,
            threshold: query.threshold,
        }
    }
}

/// Per-run aggregation state
#[derive(Debug, Default)]
pub struct AggregationContext {
    next_id: usize,
    absorbed: usize,
}

impl AggregationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the next aggregate id: `agg_1`, `agg_2`, ...
    pub fn next_aggregate_id(&mut self) -> String {
        self.next_id += 1;
        format!("agg_{}", self.next_id)
    }

    /// Number of aggregate nodes created so far
    pub fn aggregates(&self) -> usize {
        self.next_id
    }

    /// Number of original nodes folded into aggregates so far
    pub fn absorbed(&self) -> usize {
        self.absorbed
    }

    /// Clears all counters
    pub fn reset(&mut self) {
        self.next_id = 0;
        self.absorbed = 0;
    }
}

/// Label of an aggregate node, e.g. `a + b + c` or `a + b + … (5)`
pub fn aggregate_label(members: &[String]) -> String {
    if members.len() <= LABEL_MEMBERS {
        members.join(" + ")
    } else {
        format!(
            "{} + … ({})",
            members[..LABEL_MEMBERS - 1].join(" + "),
            members.len()
        )
    }
}

/// Aggregates `tree` according to `options`
pub fn aggregate_tree(
    tree: &TreeNode,
    options: &AggregationOptions,
    ctx: &mut AggregationContext,
) -> TreeNode {
    let aggregated = visit(tree, 0, options, ctx);
    tracing::debug!(
        aggregates = ctx.aggregates(),
        absorbed = ctx.absorbed(),
        "Tree aggregated"
    );
    aggregated
}

fn visit(
    node: &TreeNode,
    depth: usize,
    options: &AggregationOptions,
    ctx: &mut AggregationContext,
) -> TreeNode {
    if options.collapses(node, depth) {
        return collapse(node, depth, ctx);
    }

    TreeNode {
        id: node.id.clone(),
        label: node.label.clone(),
        kind: node.kind,
        frequency: node.frequency,
        depth,
        members: node.members.clone(),
        children: node
            .children
            .iter()
            .map(|child| visit(child, depth + 1, options, ctx))
            .collect(),
    }
}

fn collapse(node: &TreeNode, depth: usize, ctx: &mut AggregationContext) -> TreeNode {
    let mut members: Vec<String> = Vec::new();
    for label in node.activity_labels() {
        if !members.contains(&label) {
            members.push(label);
        }
    }

    ctx.absorbed += node.node_count();

    if members.is_empty() {
        return TreeNode {
            id: ctx.next_aggregate_id(),
            label: TAU_LABEL.to_string(),
            kind: NodeKind::Tau,
            frequency: node.frequency,
            depth,
            members,
            children: Vec::new(),
        };
    }

    TreeNode {
        id: ctx.next_aggregate_id(),
        label: aggregate_label(&members),
        kind: NodeKind::Aggregate,
        frequency: node.frequency,
        depth,
        members,
        children: Vec::new(),
    }
}
