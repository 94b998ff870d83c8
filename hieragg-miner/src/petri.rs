//! Process tree to Petri net translation
//!
//! Produces a workflow net with a single `source` and a single `sink`
//! place. Every tree node is translated between an entry and an exit
//! place; operators add the places and silent transitions they need.

use hieragg_core::domain::petri::{PetriLink, PetriNet, PetriNode, PetriNodeType};
use hieragg_core::domain::tree::{NodeKind, TAU_LABEL, TreeNode};

pub const SOURCE_LABEL: &str = "source";
pub const SINK_LABEL: &str = "sink";

/// Translates a process tree into a workflow net
pub fn tree_to_petri_net(tree: &TreeNode) -> PetriNet {
    let mut builder = NetBuilder::default();
    let source = builder.place(SOURCE_LABEL);
    let sink = builder.place(SINK_LABEL);
    builder.translate(tree, &source, &sink);

    tracing::debug!(
        nodes = builder.net.nodes.len(),
        links = builder.net.links.len(),
        "Petri net built"
    );

    builder.net
}

#[derive(Default)]
struct NetBuilder {
    net: PetriNet,
    places: usize,
    transitions: usize,
}

impl NetBuilder {
    fn place(&mut self, label: &str) -> String {
        let id = format!("p{}", self.places);
        self.places += 1;
        self.net.nodes.push(PetriNode {
            id: id.clone(),
            label: label.to_string(),
            node_type: PetriNodeType::Place,
            silent: false,
        });
        id
    }

    fn transition(&mut self, label: &str, silent: bool) -> String {
        let id = format!("t{}", self.transitions);
        self.transitions += 1;
        self.net.nodes.push(PetriNode {
            id: id.clone(),
            label: label.to_string(),
            node_type: PetriNodeType::Transition,
            silent,
        });
        id
    }

    fn silent(&mut self) -> String {
        self.transition(TAU_LABEL, true)
    }

    fn arc(&mut self, source: &str, target: &str) {
        self.net.links.push(PetriLink {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    /// Connects `entry -> transition -> exit`
    fn step(&mut self, transition: String, entry: &str, exit: &str) {
        self.arc(entry, &transition);
        self.arc(&transition, exit);
    }

    fn translate(&mut self, node: &TreeNode, entry: &str, exit: &str) {
        match node.kind {
            NodeKind::Activity | NodeKind::Aggregate => {
                let t = self.transition(&node.label, false);
                self.step(t, entry, exit);
            }
            NodeKind::Tau => {
                let t = self.silent();
                self.step(t, entry, exit);
            }
            _ if node.children.is_empty() => {
                let t = self.silent();
                self.step(t, entry, exit);
            }
            NodeKind::Sequence => {
                let mut current = entry.to_string();
                let last = node.children.len() - 1;
                for (i, child) in node.children.iter().enumerate() {
                    let next = if i == last {
                        exit.to_string()
                    } else {
                        self.place("")
                    };
                    self.translate(child, &current, &next);
                    current = next;
                }
            }
            NodeKind::Xor => {
                for child in &node.children {
                    self.translate(child, entry, exit);
                }
            }
            NodeKind::Parallel => {
                let split = self.silent();
                let join = self.silent();
                self.arc(entry, &split);
                self.arc(&join, exit);
                for child in &node.children {
                    let child_in = self.place("");
                    let child_out = self.place("");
                    self.arc(&split, &child_in);
                    self.translate(child, &child_in, &child_out);
                    self.arc(&child_out, &join);
                }
            }
            NodeKind::Loop => {
                // Inner places keep the entry place free of incoming arcs
                let loop_start = self.place("");
                let loop_mid = self.place("");
                let enter = self.silent();
                self.step(enter, entry, &loop_start);

                let Some((body, redo)) = node.children.split_first() else {
                    return;
                };
                self.translate(body, &loop_start, &loop_mid);
                for child in redo {
                    self.translate(child, &loop_mid, &loop_start);
                }

                let leave = self.silent();
                self.step(leave, &loop_mid, exit);
            }
        }
    }
}
