/// Railway micro topology.
/// Contains:
///
///  * nodes (track ends and junctions, with coordinates),
///  * edges (track segments between two nodes),
///  * signals (placed on an edge at a distance from its start),
///  * branch classification for three-way nodes (see `classify`).
///

use serde::{Serialize, Deserialize};
use std::collections::{BTreeMap, HashSet};
use std::convert::TryFrom;
use log::*;

pub mod classify;
pub mod geometry;

pub use classify::Branches;
pub use geometry::Pt;

pub type NodeId = String;
pub type EdgeId = String;
pub type SignalId = String;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
    #[error("duplicate id {0}")]
    DuplicateId(String),
    #[error("edge {0} starts and ends in the same node")]
    SelfLoop(EdgeId),
    #[error("cannot classify branches of node {node}: {reason}")]
    Classification { node :NodeId, reason :String },
}

#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug)]
#[serde(rename_all = "lowercase")]
pub enum Side { Left, Right }

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Clone,Debug,PartialEq)]
pub struct Node {
    pub id :NodeId,
    pub name :Option<String>,
    pub geo :Pt,
    // Role slots of a three-way node. When all three are given they are used
    // as-is, otherwise the roles are classified from geometry.
    pub connected_on_head :Option<NodeId>,
    pub connected_on_left :Option<NodeId>,
    pub connected_on_right :Option<NodeId>,
    pub turnout_side :Option<Side>,
    pub maximum_speed_on_left :Option<f64>,
    pub maximum_speed_on_right :Option<f64>,
}

impl Node {
    pub fn new(id :impl Into<NodeId>, geo :Pt) -> Node {
        Node {
            id: id.into(),
            name: None,
            geo,
            connected_on_head: None,
            connected_on_left: None,
            connected_on_right: None,
            turnout_side: None,
            maximum_speed_on_left: None,
            maximum_speed_on_right: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Clone,Debug,PartialEq)]
pub struct Edge {
    pub id :EdgeId,
    pub node_a :NodeId,
    pub node_b :NodeId,
    pub name :Option<String>,
    /// Geometry between `node_a` and `node_b`, in order from A to B.
    #[serde(default)]
    pub intermediate_geo :Vec<Pt>,
}

impl Edge {
    pub fn new(id :impl Into<EdgeId>, node_a :impl Into<NodeId>, node_b :impl Into<NodeId>) -> Edge {
        Edge {
            id: id.into(),
            node_a: node_a.into(),
            node_b: node_b.into(),
            name: None,
            intermediate_geo: Vec::new(),
        }
    }

    pub fn starts_at(&self, node :&str) -> bool {
        self.node_a == node
    }
}

#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    /// Facing traffic that travels from `node_a` towards `node_b`.
    In,
    #[serde(alias = "gegen")]
    Reverse,
}

#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    #[serde(alias = "Hauptsignal")]
    Main,
    #[serde(alias = "Mehrabschnittssignal")]
    MultiSection,
    #[serde(alias = "Vorsignal")]
    Distant,
    #[serde(alias = "Sperrsignal")]
    Barrage,
    #[serde(alias = "Hauptsperrsignal")]
    MainBarrage,
    #[serde(alias = "andere")]
    Other,
}

#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
#[serde(rename_all = "snake_case")]
pub enum SignalFunction {
    #[serde(alias = "Einfahr_Signal")]
    Entry,
    #[serde(alias = "Ausfahr_Signal")]
    Exit,
    #[serde(alias = "Block_Signal")]
    Block,
    #[serde(alias = "Zwischen_Signal")]
    Intermediate,
    #[serde(alias = "andere")]
    Other,
}

#[derive(Serialize, Deserialize)]
#[derive(Clone,Debug,PartialEq)]
pub struct Signal {
    pub id :SignalId,
    pub edge :EdgeId,
    /// Distance from the edge's `node_a`.
    pub distance_edge :f64,
    pub direction :SignalDirection,
    pub name :Option<String>,
    pub kind :SignalKind,
    pub function :SignalFunction,
}

/// serde-friendly description of a topology, as read from files.
#[derive(Serialize, Deserialize)]
#[derive(Clone,Debug,Default)]
pub struct TopologyDescription {
    pub uuid :Option<String>,
    pub name :Option<String>,
    #[serde(default)]
    pub nodes :Vec<Node>,
    #[serde(default)]
    pub edges :Vec<Edge>,
    #[serde(default)]
    pub signals :Vec<Signal>,
}

#[derive(Clone,Debug)]
pub struct Topology {
    pub uuid :String,
    pub name :Option<String>,
    nodes :BTreeMap<NodeId, Node>,
    edges :BTreeMap<EdgeId, Edge>,
    signals :BTreeMap<SignalId, Signal>,
    connected :BTreeMap<NodeId, Vec<NodeId>>,
    edge_index :BTreeMap<(NodeId,NodeId), EdgeId>,
    // Nodes, edges and signals share one id space.
    ids :HashSet<String>,
}

impl Topology {
    pub fn new(uuid :impl Into<String>) -> Topology {
        Topology {
            uuid: uuid.into(),
            name: None,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            signals: BTreeMap::new(),
            connected: BTreeMap::new(),
            edge_index: BTreeMap::new(),
            ids: HashSet::new(),
        }
    }

    pub fn add_node(&mut self, node :Node) -> Result<(), TopologyError> {
        if self.ids.contains(&node.id) {
            return Err(TopologyError::DuplicateId(node.id));
        }
        self.ids.insert(node.id.clone());
        self.connected.insert(node.id.clone(), Vec::new());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    pub fn add_edge(&mut self, edge :Edge) -> Result<(), TopologyError> {
        if self.ids.contains(&edge.id) {
            return Err(TopologyError::DuplicateId(edge.id));
        }
        for n in &[&edge.node_a, &edge.node_b] {
            if !self.nodes.contains_key(*n) {
                return Err(TopologyError::UnknownNode((*n).clone()));
            }
        }
        if edge.node_a == edge.node_b {
            return Err(TopologyError::SelfLoop(edge.id));
        }

        let (a,b) = (edge.node_a.clone(), edge.node_b.clone());
        if self.edge_index.contains_key(&(a.clone(),b.clone())) {
            // Parallel edges cannot be told apart by edge_between.
            warn!("Edge {} duplicates the connection {}-{}, keeping the first edge.", edge.id, a, b);
        } else {
            self.edge_index.insert((a.clone(),b.clone()), edge.id.clone());
            self.edge_index.insert((b.clone(),a.clone()), edge.id.clone());
            self.connected.entry(a.clone()).or_insert_with(Vec::new).push(b.clone());
            self.connected.entry(b).or_insert_with(Vec::new).push(a);
        }
        self.ids.insert(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    pub fn add_signal(&mut self, signal :Signal) -> Result<(), TopologyError> {
        if self.ids.contains(&signal.id) {
            return Err(TopologyError::DuplicateId(signal.id));
        }
        if !self.edges.contains_key(&signal.edge) {
            return Err(TopologyError::UnknownEdge(signal.edge));
        }
        self.ids.insert(signal.id.clone());
        self.signals.insert(signal.id.clone(), signal);
        Ok(())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> { self.nodes.values() }
    pub fn edges(&self) -> impl Iterator<Item = &Edge> { self.edges.values() }
    pub fn signals(&self) -> impl Iterator<Item = &Signal> { self.signals.values() }

    pub fn node(&self, id :&str) -> Option<&Node> { self.nodes.get(id) }
    pub fn edge(&self, id :&str) -> Option<&Edge> { self.edges.get(id) }
    pub fn signal(&self, id :&str) -> Option<&Signal> { self.signals.get(id) }

    pub fn num_nodes(&self) -> usize { self.nodes.len() }
    pub fn num_edges(&self) -> usize { self.edges.len() }
    pub fn num_signals(&self) -> usize { self.signals.len() }

    /// Neighbouring nodes, in the order their edges were added.
    pub fn connected_nodes(&self, node :&str) -> &[NodeId] {
        self.connected.get(node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn edge_between(&self, a :&str, b :&str) -> Option<&Edge> {
        let id = self.edge_index.get(&(a.to_string(), b.to_string()))?;
        self.edges.get(id)
    }

    /// Geometry of an edge from `node_a` to `node_b`.
    pub fn edge_geometry(&self, edge :&Edge) -> Result<Vec<Pt>, TopologyError> {
        let a = self.node(&edge.node_a).ok_or_else(|| TopologyError::UnknownNode(edge.node_a.clone()))?;
        let b = self.node(&edge.node_b).ok_or_else(|| TopologyError::UnknownNode(edge.node_b.clone()))?;
        let mut pts = Vec::with_capacity(edge.intermediate_geo.len() + 2);
        pts.push(a.geo);
        pts.extend(edge.intermediate_geo.iter().cloned());
        pts.push(b.geo);
        Ok(pts)
    }

    /// Length of an edge, recomputed from its geometry on every call.
    pub fn edge_length(&self, edge_id :&str) -> Result<f64, TopologyError> {
        let edge = self.edge(edge_id).ok_or_else(|| TopologyError::UnknownEdge(edge_id.to_string()))?;
        Ok(geometry::polyline_length(&self.edge_geometry(edge)?))
    }
}

impl TryFrom<TopologyDescription> for Topology {
    type Error = TopologyError;
    fn try_from(desc :TopologyDescription) -> Result<Topology, TopologyError> {
        let uuid = desc.uuid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut topo = Topology::new(uuid);
        topo.name = desc.name;
        for n in desc.nodes { topo.add_node(n)?; }
        for e in desc.edges { topo.add_edge(e)?; }
        for s in desc.signals { topo.add_signal(s)?; }
        debug!("Topology {} with {} nodes, {} edges, {} signals.",
               topo.uuid, topo.num_nodes(), topo.num_edges(), topo.num_signals());
        Ok(topo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn line() -> Topology {
        let mut t = Topology::new("t1");
        t.add_node(Node::new("a", Pt::new(0.0, 0.0))).unwrap();
        t.add_node(Node::new("b", Pt::new(100.0, 0.0))).unwrap();
        t.add_node(Node::new("c", Pt::new(200.0, 50.0))).unwrap();
        t.add_edge(Edge::new("e1", "a", "b")).unwrap();
        let mut e2 = Edge::new("e2", "b", "c");
        e2.intermediate_geo.push(Pt::new(200.0, 0.0));
        t.add_edge(e2).unwrap();
        t
    }

    #[test]
    fn adjacency() {
        let t = line();
        assert_eq!(t.connected_nodes("b"), &["a".to_string(), "c".to_string()]);
        assert_eq!(t.connected_nodes("a").len(), 1);
        assert!(t.connected_nodes("nowhere").is_empty());
        assert_eq!(t.edge_between("b", "a").map(|e| e.id.as_str()), Some("e1"));
        assert_eq!(t.edge_between("a", "b").map(|e| e.id.as_str()), Some("e1"));
        assert!(t.edge_between("a", "c").is_none());
    }

    #[test]
    fn lengths_follow_geometry() {
        let t = line();
        assert_eq!(t.edge_length("e1"), Ok(100.0));
        assert_eq!(t.edge_length("e2"), Ok(150.0));
        assert_eq!(t.edge_length("e9"), Err(TopologyError::UnknownEdge("e9".to_string())));
    }

    #[test]
    fn rejects_inconsistent_input() {
        let mut t = line();
        assert_eq!(t.add_node(Node::new("a", Pt::new(1.0, 1.0))),
                   Err(TopologyError::DuplicateId("a".to_string())));
        assert_eq!(t.add_edge(Edge::new("e3", "a", "x")),
                   Err(TopologyError::UnknownNode("x".to_string())));
        assert_eq!(t.add_edge(Edge::new("e4", "a", "a")),
                   Err(TopologyError::SelfLoop("e4".to_string())));
        let s = Signal {
            id: "s1".to_string(), edge: "e7".to_string(), distance_edge: 1.0,
            direction: SignalDirection::In, name: None,
            kind: SignalKind::Main, function: SignalFunction::Block,
        };
        assert_eq!(t.add_signal(s.clone()), Err(TopologyError::UnknownEdge("e7".to_string())));
        assert!(t.signal("s1").is_none());
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut t = line();
        assert_eq!(t.add_edge(Edge::new("a", "a", "c")),
                   Err(TopologyError::DuplicateId("a".to_string())));
        assert_eq!(t.add_node(Node::new("e1", Pt::new(5.0, 5.0))),
                   Err(TopologyError::DuplicateId("e1".to_string())));
        let s = |id :&str| Signal {
            id: id.to_string(), edge: "e1".to_string(), distance_edge: 1.0,
            direction: SignalDirection::In, name: None,
            kind: SignalKind::Main, function: SignalFunction::Block,
        };
        assert_eq!(t.add_signal(s("b")), Err(TopologyError::DuplicateId("b".to_string())));
        assert_eq!(t.add_signal(s("s1")), Ok(()));
        assert_eq!(t.add_node(Node::new("s1", Pt::new(5.0, 5.0))),
                   Err(TopologyError::DuplicateId("s1".to_string())));
        assert_eq!((t.num_nodes(), t.num_edges(), t.num_signals()), (3, 2, 1));
    }

    #[test]
    fn rejected_edge_keeps_its_id_free() {
        let mut t = line();
        assert_eq!(t.add_edge(Edge::new("e3", "a", "x")),
                   Err(TopologyError::UnknownNode("x".to_string())));
        assert_eq!(t.add_edge(Edge::new("e3", "a", "c")), Ok(()));
    }

    #[test]
    fn description_with_shared_numbering_is_rejected() {
        let json = r#"{
            "nodes": [
                { "id": "1", "geo": { "x": 0.0, "y": 0.0 } },
                { "id": "2", "geo": { "x": 10.0, "y": 0.0 } }
            ],
            "edges": [ { "id": "1", "node_a": "1", "node_b": "2" } ]
        }"#;
        let desc :TopologyDescription = serde_json::from_str(json).unwrap();
        assert_eq!(Topology::try_from(desc).unwrap_err(), TopologyError::DuplicateId("1".to_string()));
    }

    #[test]
    fn description_from_json() {
        let json = r#"{
            "name": "Example",
            "nodes": [
                { "id": "n1", "geo": { "x": 0.0, "y": 0.0 } },
                { "id": "n2", "geo": { "x": 50.0, "y": 0.0 }, "turnout_side": "left" }
            ],
            "edges": [ { "id": "e1", "node_a": "n1", "node_b": "n2" } ],
            "signals": [
                { "id": "s1", "edge": "e1", "distance_edge": 10.0, "direction": "gegen",
                  "kind": "Vorsignal", "function": "Ausfahr_Signal" }
            ]
        }"#;
        let desc :TopologyDescription = serde_json::from_str(json).unwrap();
        let t = Topology::try_from(desc).unwrap();
        assert_eq!(t.name.as_deref(), Some("Example"));
        assert_eq!(t.node("n2").unwrap().turnout_side, Some(Side::Left));
        let s = t.signal("s1").unwrap();
        assert_eq!(s.direction, SignalDirection::Reverse);
        assert_eq!(s.kind, SignalKind::Distant);
        assert_eq!(s.function, SignalFunction::Exit);
    }

    #[test]
    fn description_from_ron() {
        let text = r#"(
            uuid: Some("fixed"),
            name: None,
            nodes: [
                (id: "n1", name: None, geo: (x: 0.0, y: 0.0), connected_on_head: None,
                 connected_on_left: None, connected_on_right: None, turnout_side: None,
                 maximum_speed_on_left: None, maximum_speed_on_right: None),
                (id: "n2", name: Some("end"), geo: (x: 3.0, y: 4.0), connected_on_head: None,
                 connected_on_left: None, connected_on_right: None, turnout_side: Some(right),
                 maximum_speed_on_left: None, maximum_speed_on_right: Some(60.0)),
            ],
            edges: [ (id: "e1", node_a: "n1", node_b: "n2", name: None) ],
        )"#;
        let desc :TopologyDescription = ron::de::from_str(text).unwrap();
        let t = Topology::try_from(desc).unwrap();
        assert_eq!(t.uuid, "fixed");
        assert_eq!(t.edge_length("e1"), Ok(5.0));
        assert_eq!(t.node("n2").unwrap().maximum_speed_on_right, Some(60.0));
    }
}
