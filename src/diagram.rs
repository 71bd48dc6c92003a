//! Diagram model: nodes, nested clusters and directed edges.
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("unknown node #{0}")]
    UnknownNode(usize),
    #[error("unknown cluster #{0}")]
    UnknownCluster(usize),
    #[error("empty label")]
    EmptyLabel,
    #[error("invalid direction `{0}` (expected TB, BT, LR or RL)")]
    InvalidDirection(String),
    #[error("unsupported output format `{0}`")]
    InvalidFormat(String),
}

/// Graphviz `rankdir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TB => "TB",
            Direction::BT => "BT",
            Direction::LR => "LR",
            Direction::RL => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(Direction::TB),
            "BT" => Ok(Direction::BT),
            "LR" => Ok(Direction::LR),
            "RL" => Ok(Direction::RL),
            _ => Err(DiagramError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    Dot,
}

impl OutFormat {
    /// File extension, also the value passed to `dot -T`.
    pub fn extension(self) -> &'static str {
        match self {
            OutFormat::Png => "png",
            OutFormat::Jpg => "jpg",
            OutFormat::Svg => "svg",
            OutFormat::Pdf => "pdf",
            OutFormat::Dot => "dot",
        }
    }
}

impl FromStr for OutFormat {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutFormat::Png),
            "jpg" | "jpeg" => Ok(OutFormat::Jpg),
            "svg" => Ok(OutFormat::Svg),
            "pdf" => Ok(OutFormat::Pdf),
            "dot" => Ok(OutFormat::Dot),
            _ => Err(DiagramError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Icon category of a node. Drawn as a shape and fill colour since icon
/// assets are not bundled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Server,
    ComputeEngine,
    Sql,
    Filestore,
}

impl NodeKind {
    pub fn provider(self) -> &'static str {
        match self {
            NodeKind::Server => "onprem",
            NodeKind::ComputeEngine | NodeKind::Sql | NodeKind::Filestore => "gcp",
        }
    }

    pub fn service(self) -> &'static str {
        match self {
            NodeKind::Server | NodeKind::ComputeEngine => "compute",
            NodeKind::Sql => "database",
            NodeKind::Filestore => "storage",
        }
    }

    pub fn shape(self) -> &'static str {
        match self {
            NodeKind::Server => "box3d",
            NodeKind::ComputeEngine => "box",
            NodeKind::Sql => "cylinder",
            NodeKind::Filestore => "folder",
        }
    }

    pub fn fill_color(self) -> &'static str {
        match self {
            NodeKind::Server => "#DFE6E9",
            NodeKind::ComputeEngine => "#AECBFA",
            NodeKind::Sql => "#CEEAD6",
            NodeKind::Filestore => "#FDE293",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub cluster: Option<ClusterId>,
}

#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: ClusterId,
    pub label: String,
    pub parent: Option<ClusterId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone)]
pub struct DiagramAttrs {
    pub title: String,
    pub filename: Option<String>,
    pub direction: Direction,
    pub outformats: Vec<OutFormat>,
}

impl DiagramAttrs {
    pub fn new(title: impl Into<String>) -> Self {
        DiagramAttrs {
            title: title.into(),
            filename: None,
            direction: Direction::default(),
            outformats: vec![OutFormat::default()],
        }
    }

    /// Output file stem. Falls back to the lower-cased title with each run
    /// of whitespace replaced by an underscore.
    pub fn file_stem(&self) -> String {
        match &self.filename {
            Some(name) => name.clone(),
            None => self
                .title
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .to_lowercase(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagram {
    attrs: DiagramAttrs,
    clusters: Vec<Cluster>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Diagram {
    pub fn new(attrs: DiagramAttrs) -> Self {
        Diagram {
            attrs,
            clusters: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn attrs(&self) -> &DiagramAttrs {
        &self.attrs
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn add_cluster(
        &mut self,
        label: impl Into<String>,
        parent: Option<ClusterId>,
    ) -> Result<ClusterId, DiagramError> {
        let label = non_empty(label.into())?;
        if let Some(parent) = parent {
            self.cluster(parent)?;
        }
        let id = ClusterId(self.clusters.len());
        self.clusters.push(Cluster { id, label, parent });
        Ok(id)
    }

    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        kind: NodeKind,
        cluster: Option<ClusterId>,
    ) -> Result<NodeId, DiagramError> {
        let label = non_empty(label.into())?;
        if let Some(cluster) = cluster {
            self.cluster(cluster)?;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            label,
            kind,
            cluster,
        });
        Ok(id)
    }

    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), DiagramError> {
        self.node(from)?;
        self.node(to)?;
        self.edges.push(Edge { from, to });
        Ok(())
    }

    /// One edge from `from` to each target, in order.
    pub fn fan_out(&mut self, from: NodeId, targets: &[NodeId]) -> Result<(), DiagramError> {
        // Validate first so a bad target leaves no partial fan-out behind.
        self.node(from)?;
        for &to in targets {
            self.node(to)?;
        }
        self.edges
            .extend(targets.iter().map(|&to| Edge { from, to }));
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, DiagramError> {
        self.nodes.get(id.0).ok_or(DiagramError::UnknownNode(id.0))
    }

    pub fn cluster(&self, id: ClusterId) -> Result<&Cluster, DiagramError> {
        self.clusters
            .get(id.0)
            .ok_or(DiagramError::UnknownCluster(id.0))
    }

    pub fn children_of(&self, parent: Option<ClusterId>) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |c| c.parent == parent)
    }

    pub fn nodes_in(&self, cluster: Option<ClusterId>) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.cluster == cluster)
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes_in(None)
    }

    /// Number of ancestors; top-level clusters are at depth 0.
    pub fn depth(&self, id: ClusterId) -> usize {
        let mut depth = 0;
        let mut current = self.clusters.get(id.0).and_then(|c| c.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.clusters.get(parent.0).and_then(|c| c.parent);
        }
        depth
    }

    /// Labels from the outermost cluster down to `id`.
    pub fn cluster_path(&self, id: Option<ClusterId>) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(cid) = current {
            match self.clusters.get(cid.0) {
                Some(cluster) => {
                    path.push(cluster.label.clone());
                    current = cluster.parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    pub fn descriptor(&self) -> Descriptor {
        let label_of = |id: NodeId| {
            self.nodes
                .get(id.0)
                .map(|n| n.label.clone())
                .unwrap_or_default()
        };

        Descriptor {
            title: self.attrs.title.clone(),
            filename: self.attrs.file_stem(),
            direction: self.attrs.direction,
            outformats: self.attrs.outformats.clone(),
            clusters: self
                .clusters
                .iter()
                .map(|c| ClusterDescriptor {
                    label: c.label.clone(),
                    path: self.cluster_path(c.parent),
                })
                .collect(),
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeDescriptor {
                    label: n.label.clone(),
                    kind: n.kind,
                    provider: n.kind.provider(),
                    service: n.kind.service(),
                    path: self.cluster_path(n.cluster),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| (label_of(e.from), label_of(e.to)))
                .collect(),
        }
    }
}

fn non_empty(label: String) -> Result<String, DiagramError> {
    if label.trim().is_empty() {
        Err(DiagramError::EmptyLabel)
    } else {
        Ok(label)
    }
}

/// Layout-free snapshot of a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub title: String,
    pub filename: String,
    pub direction: Direction,
    pub outformats: Vec<OutFormat>,
    pub clusters: Vec<ClusterDescriptor>,
    pub nodes: Vec<NodeDescriptor>,
    pub edges: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterDescriptor {
    pub label: String,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub label: String,
    pub kind: NodeKind,
    pub provider: &'static str,
    pub service: &'static str,
    pub path: Vec<String>,
}
