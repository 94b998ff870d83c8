//! Petri net domain types
//!
//! The wire shape matches what the viewer renders: a flat list of nodes
//! (places and transitions) and a list of directed links between them.

use serde::{Deserialize, Serialize};

/// Type of a Petri net node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetriNodeType {
    Place,
    Transition,
}

/// A place or transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetriNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: PetriNodeType,

    /// Silent transitions carry no observable activity
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub silent: bool,
}

/// Directed arc between a place and a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetriLink {
    pub source: String,
    pub target: String,
}

/// A workflow net
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetriNet {
    pub nodes: Vec<PetriNode>,
    pub links: Vec<PetriLink>,
}

impl PetriNet {
    pub fn places(&self) -> impl Iterator<Item = &PetriNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == PetriNodeType::Place)
    }

    pub fn transitions(&self) -> impl Iterator<Item = &PetriNode> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == PetriNodeType::Transition)
    }

    pub fn node(&self, id: &str) -> Option<&PetriNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Ids of the nodes reachable over one outgoing link
    pub fn successors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.links
            .iter()
            .filter(move |l| l.source == id)
            .map(|l| l.target.as_str())
    }

    /// Ids of the nodes with a link into `id`
    pub fn predecessors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.links
            .iter()
            .filter(move |l| l.target == id)
            .map(|l| l.source.as_str())
    }
}
