//! Terminal rendering of discovered models

use colored::*;
use hieragg_core::domain::tree::{NodeKind, TreeNode};
use hieragg_core::dto::discovery::DiscoveryResponse;

/// Print a model summary followed by its tree
pub fn print_model(model: &DiscoveryResponse) {
    println!("{}", "✓ Model discovered".green().bold());
    println!("  Log ID:      {}", model.log_id.cyan());

    if let Some(stats) = &model.stats {
        println!(
            "  Log:         {} traces, {} events, {} activities, {} variants",
            stats.traces, stats.events, stats.activities, stats.variants
        );
    }

    println!(
        "  Petri net:   {} places, {} transitions, {} arcs",
        model.model.places().count(),
        model.model.transitions().count(),
        model.model.links.len()
    );
    println!(
        "  Tree:        {} nodes, height {}",
        model.tree.node_count(),
        model.tree.height()
    );
    println!();

    for line in tree_lines(&model.tree) {
        println!("{}", line);
    }
}

/// One line per tree node, indented by depth
pub fn tree_lines(tree: &TreeNode) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(tree, 0, &mut lines);
    lines
}

fn push_lines(node: &TreeNode, indent: usize, lines: &mut Vec<String>) {
    let label = match node.kind {
        NodeKind::Activity => node.label.normal(),
        NodeKind::Tau => node.label.dimmed(),
        NodeKind::Aggregate => format!("[{}]", node.label).magenta().bold(),
        _ => node.label.blue().bold(),
    };

    lines.push(format!(
        "{}{} {}",
        "  ".repeat(indent),
        label,
        format!("({})", node.frequency).dimmed()
    ));

    for child in &node.children {
        push_lines(child, indent + 1, lines);
    }
}
