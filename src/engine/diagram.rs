use std::collections::BTreeMap;

use serde::Deserialize;

/// A labeled node in a quorum or cluster diagram.
#[derive(Clone, Debug, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub down: bool,
}

/// A named drop target holding at most one item.
#[derive(Clone, Debug, Deserialize)]
pub struct Zone {
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Partition {
    pub id: String,
    pub label: String,
    pub replicas: Vec<Replica>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Replica {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub leader: bool,
    #[serde(default)]
    pub in_sync: bool,
}

/// One interval marker on a heartbeat timeline.
#[derive(Clone, Debug, Deserialize)]
pub struct Tick {
    pub id: String,
    pub label: String,
    pub at: u32,
    #[serde(default)]
    pub missed: bool,
}

/// The five diagram kinds, each carrying its own geometry payload.
/// The tag decides both rendering and which answer shape is legal.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum DiagramSpec {
    #[serde(rename = "kraft-quorum")]
    KraftQuorum {
        nodes: Vec<Node>,
        #[serde(default)]
        multi_select: bool,
    },
    #[serde(rename = "broker-cluster")]
    BrokerCluster {
        brokers: Vec<Node>,
        #[serde(default)]
        multi_select: bool,
    },
    #[serde(rename = "partition-replicas")]
    PartitionReplicas {
        partitions: Vec<Partition>,
        #[serde(default)]
        multi_select: bool,
    },
    #[serde(rename = "drag-topology")]
    DragTopology { items: Vec<Node>, zones: Vec<Zone> },
    #[serde(rename = "heartbeat-timeline")]
    HeartbeatTimeline {
        ticks: Vec<Tick>,
        #[serde(default)]
        multi_select: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    Click { multi_select: bool },
    Drag,
}

/// Flattened view of one selectable (or draggable) entity, independent of the
/// diagram kind. `row` groups entities that belong on the same line
/// (one row per partition, single row otherwise).
#[derive(Clone, Debug)]
pub struct EntityInfo<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub tags: Vec<&'static str>,
    pub row: usize,
}

impl DiagramSpec {
    pub fn interaction(&self) -> Interaction {
        match self {
            DiagramSpec::DragTopology { .. } => Interaction::Drag,
            DiagramSpec::KraftQuorum { multi_select, .. }
            | DiagramSpec::BrokerCluster { multi_select, .. }
            | DiagramSpec::PartitionReplicas { multi_select, .. }
            | DiagramSpec::HeartbeatTimeline { multi_select, .. } => Interaction::Click {
                multi_select: *multi_select,
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DiagramSpec::KraftQuorum { .. } => "KRaft quorum",
            DiagramSpec::BrokerCluster { .. } => "Broker cluster",
            DiagramSpec::PartitionReplicas { .. } => "Partition replicas",
            DiagramSpec::DragTopology { .. } => "Topology",
            DiagramSpec::HeartbeatTimeline { .. } => "Heartbeat timeline",
        }
    }

    pub fn entities(&self) -> Vec<EntityInfo<'_>> {
        fn node_tags(node: &Node) -> Vec<&'static str> {
            let mut tags = Vec::new();
            match node.role.as_deref() {
                Some("leader") => tags.push("leader"),
                Some("follower") => tags.push("follower"),
                _ => {}
            }
            if node.down {
                tags.push("down");
            }
            tags
        }

        match self {
            DiagramSpec::KraftQuorum { nodes, .. } | DiagramSpec::BrokerCluster { brokers: nodes, .. } => nodes
                .iter()
                .map(|n| EntityInfo {
                    id: &n.id,
                    label: &n.label,
                    tags: node_tags(n),
                    row: 0,
                })
                .collect(),
            DiagramSpec::PartitionReplicas { partitions, .. } => partitions
                .iter()
                .enumerate()
                .flat_map(|(row, p)| {
                    p.replicas.iter().map(move |r| {
                        let mut tags = Vec::new();
                        if r.leader {
                            tags.push("leader");
                        }
                        tags.push(if r.in_sync { "in-sync" } else { "lagging" });
                        EntityInfo {
                            id: &r.id,
                            label: &r.label,
                            tags,
                            row,
                        }
                    })
                })
                .collect(),
            DiagramSpec::DragTopology { items, .. } => items
                .iter()
                .map(|i| EntityInfo {
                    id: &i.id,
                    label: &i.label,
                    tags: Vec::new(),
                    row: 0,
                })
                .collect(),
            DiagramSpec::HeartbeatTimeline { ticks, .. } => {
                let mut sorted: Vec<&Tick> = ticks.iter().collect();
                sorted.sort_by_key(|t| t.at);
                sorted
                    .into_iter()
                    .map(|t| EntityInfo {
                        id: &t.id,
                        label: &t.label,
                        tags: if t.missed { vec!["missed"] } else { Vec::new() },
                        row: 0,
                    })
                    .collect()
            }
        }
    }

    pub fn entity_ids(&self) -> Vec<&str> {
        self.entities().iter().map(|e| e.id).collect()
    }

    /// Drop zones, empty for click diagrams.
    pub fn zones(&self) -> &[Zone] {
        match self {
            DiagramSpec::DragTopology { zones, .. } => zones,
            _ => &[],
        }
    }

    /// Row labels for partition groupings, used by the diagram widget.
    pub fn row_labels(&self) -> Vec<&str> {
        match self {
            DiagramSpec::PartitionReplicas { partitions, .. } => {
                partitions.iter().map(|p| p.label.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Expected answer, shape depending on the interaction:
/// one entity id, an unordered id set, or a zone-to-item mapping.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DiagramAnswer {
    Single(String),
    Set(Vec<String>),
    Placements(BTreeMap<String, String>),
}
