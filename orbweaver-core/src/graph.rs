// Graph-structure synthesis over registry snapshots

use crate::visitor::{CenterNode, VisitorRecord};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashMap;

/// Fixed strength of visitor-to-visitor mesh edges
pub const SPIRAL_STRENGTH: f64 = 0.3;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GraphNode {
    Center(CenterNode),
    Visitor(VisitorRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Radial,
    Spiral,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    pub strength: f64,
}

/// Star topology response: `{nodes, links}`
#[derive(Debug, Clone, Serialize)]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Mesh topology response: `{nodes, links, web_structure, timestamp}`
#[derive(Debug, Clone, Serialize)]
pub struct WebGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    pub web_structure: HashMap<String, Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

/// Star topology: one untyped link per visitor, center to visitor,
/// strength scaled from the engagement score.
pub fn build(center: &CenterNode, records: &[&VisitorRecord]) -> NetworkGraph {
    let mut nodes = Vec::with_capacity(records.len() + 1);
    nodes.push(GraphNode::Center(center.clone()));
    let mut links = Vec::with_capacity(records.len());

    for record in records {
        nodes.push(GraphNode::Visitor((*record).clone()));
        links.push(GraphLink {
            source: center.id.clone(),
            target: record.id.clone(),
            link_type: None,
            strength: record.engagement_score / 100.0,
        });
    }

    NetworkGraph { nodes, links }
}

/// Mesh topology: radial center links plus spiral peer links derived
/// from `web_structure`. Each node's neighbor list is emitted
/// independently, so an undirected adjacency shows up as two directed
/// links (and the random extras can make it asymmetric) — that is how
/// the front-end expects it.
pub fn build_web<R: Rng>(
    center: &CenterNode,
    records: &[&VisitorRecord],
    now: DateTime<Utc>,
    rng: &mut R,
) -> WebGraph {
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let web_structure = web_structure(&ids, rng);

    let mut nodes = Vec::with_capacity(records.len() + 1);
    nodes.push(GraphNode::Center(center.clone()));
    let mut links = Vec::new();

    for record in records {
        nodes.push(GraphNode::Visitor((*record).clone()));
        links.push(GraphLink {
            source: center.id.clone(),
            target: record.id.clone(),
            link_type: Some(LinkType::Radial),
            strength: record.engagement_score / 100.0,
        });

        if let Some(neighbors) = web_structure.get(&record.id) {
            for neighbor in neighbors {
                links.push(GraphLink {
                    source: record.id.clone(),
                    target: neighbor.clone(),
                    link_type: Some(LinkType::Spiral),
                    strength: SPIRAL_STRENGTH,
                });
            }
        }
    }

    WebGraph {
        nodes,
        links,
        web_structure,
        timestamp: now,
    }
}

/// Deterministic part of the mesh: every visitor connects to its
/// immediate predecessor and successor in insertion order. No
/// wraparound: the first visitor has no predecessor, the last no
/// successor. Fewer than two visitors produce an empty structure.
pub fn chain_neighbors(ids: &[&str]) -> HashMap<String, Vec<String>> {
    let mut structure = HashMap::new();
    if ids.len() > 1 {
        for (i, id) in ids.iter().enumerate() {
            let mut connections = Vec::new();
            if i > 0 {
                connections.push(ids[i - 1].to_string());
            }
            if i < ids.len() - 1 {
                connections.push(ids[i + 1].to_string());
            }
            structure.insert(id.to_string(), connections);
        }
    }
    structure
}

/// Full mesh adjacency: the forced chain plus, when at least three
/// visitors exist, up to two random extra peers per visitor drawn
/// without replacement from the others. Re-drawing an already-adjacent
/// peer collapses into the existing edge; the per-node list is
/// deduplicated.
pub fn web_structure<R: Rng>(ids: &[&str], rng: &mut R) -> HashMap<String, Vec<String>> {
    let mut structure = chain_neighbors(ids);

    if ids.len() > 2 {
        for id in ids {
            let others: Vec<&str> = ids.iter().copied().filter(|other| other != id).collect();
            let amount = 2.min(others.len());
            let neighbors = structure.entry(id.to_string()).or_default();
            for extra in others.choose_multiple(rng, amount) {
                if !neighbors.iter().any(|n| n == extra) {
                    neighbors.push(extra.to_string());
                }
            }
        }
    }

    structure
}
