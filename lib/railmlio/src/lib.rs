//! Export of railway micro topologies to railML 3.
//!
//! [`export`] maps a [`topology::Topology`] to a [`RailML`] document, which
//! [`write_railml`] serializes.

pub mod model;
pub mod ids;
pub mod relations;
pub mod switches;
pub mod signals;
pub mod topo;
pub mod xml;

pub use model::{RailML, SchemaVersion};
pub use ids::IdMode;
pub use topo::{convert_topology, convert_topology as export, ExportError, ExportOptions, Strictness};
pub use xml::{write_railml, write_railml_to_file, WriteError};

#[cfg(test)]
pub(crate) mod testdata {
    use topology::*;

    fn signal(id :&str, edge :&str, distance :f64, direction :SignalDirection,
              kind :SignalKind, function :SignalFunction) -> Signal {
        Signal {
            id: id.to_string(), edge: edge.to_string(), distance_edge: distance,
            direction, name: None, kind, function,
        }
    }

    /// Switch `sw` with head `h` to the west and branches `l` (north-east)
    /// and `r` (south-east). e1 runs into the switch, e2 and e3 out of it.
    pub fn y_switch_with(f :impl FnOnce(&mut Node)) -> Topology {
        let mut t = Topology::new("0f9c1a52-5e5b-4f7e-9a43-8d2c7b1e6a10");
        t.name = Some("Y".to_string());
        let mut sw = Node::new("sw", Pt::new(0.0, 0.0));
        sw.turnout_side = Some(Side::Left);
        sw.maximum_speed_on_left = Some(40.0);
        f(&mut sw);
        t.add_node(sw).unwrap();
        t.add_node(Node::new("h", Pt::new(-100.0, 0.0))).unwrap();
        t.add_node(Node::new("l", Pt::new(100.0, 20.0))).unwrap();
        t.add_node(Node::new("r", Pt::new(100.0, -20.0))).unwrap();
        t.add_edge(Edge::new("e1", "h", "sw")).unwrap();
        t.add_edge(Edge::new("e2", "sw", "l")).unwrap();
        t.add_edge(Edge::new("e3", "sw", "r")).unwrap();

        t.add_signal(signal("s1", "e1", 30.0, SignalDirection::In,
                            SignalKind::Main, SignalFunction::Block)).unwrap();
        let mut s2 = signal("s2", "e2", 50.0, SignalDirection::Reverse,
                            SignalKind::Distant, SignalFunction::Exit);
        s2.name = Some("N2".to_string());
        t.add_signal(s2).unwrap();
        t
    }

    pub fn y_switch() -> Topology {
        y_switch_with(|_| {})
    }

    /// The Y with the left branch continued from `l` to `t`.
    pub fn y_switch_with_tail() -> Topology {
        let mut t = y_switch();
        t.add_node(Node::new("t", Pt::new(200.0, 20.0))).unwrap();
        t.add_edge(Edge::new("e4", "l", "t")).unwrap();
        t
    }

    /// Three edges at 120 degrees: no neighbour can be the head.
    pub fn ambiguous_junction() -> Topology {
        let mut t = Topology::new("ambiguous");
        t.add_node(Node::new("j", Pt::new(0.0, 0.0))).unwrap();
        t.add_node(Node::new("a", Pt::new(1.0, 0.0))).unwrap();
        t.add_node(Node::new("b", Pt::new(-0.5, 0.866))).unwrap();
        t.add_node(Node::new("c", Pt::new(-0.5, -0.866))).unwrap();
        t.add_edge(Edge::new("ja", "j", "a")).unwrap();
        t.add_edge(Edge::new("jb", "j", "b")).unwrap();
        t.add_edge(Edge::new("jc", "j", "c")).unwrap();
        t
    }

    /// Two switches joined by e3, which is the right branch of `sa` and the
    /// head of `sb`. e5 runs into `sb` from its right branch node.
    pub fn two_switches() -> Topology {
        let mut t = Topology::new("two");
        t.add_node(Node::new("h", Pt::new(-100.0, 0.0))).unwrap();
        t.add_node(Node::new("sa", Pt::new(0.0, 0.0))).unwrap();
        t.add_node(Node::new("l", Pt::new(100.0, 30.0))).unwrap();
        t.add_node(Node::new("sb", Pt::new(100.0, 0.0))).unwrap();
        t.add_node(Node::new("x", Pt::new(200.0, 0.0))).unwrap();
        t.add_node(Node::new("y", Pt::new(200.0, -30.0))).unwrap();
        t.add_edge(Edge::new("e1", "h", "sa")).unwrap();
        t.add_edge(Edge::new("e2", "sa", "l")).unwrap();
        t.add_edge(Edge::new("e3", "sa", "sb")).unwrap();
        t.add_edge(Edge::new("e4", "sb", "x")).unwrap();
        t.add_edge(Edge::new("e5", "y", "sb")).unwrap();
        t
    }

    /// A signal on an edge whose end nodes coincide.
    pub fn signal_on_point_edge() -> Topology {
        let mut t = Topology::new("point");
        t.add_node(Node::new("a", Pt::new(10.0, 10.0))).unwrap();
        t.add_node(Node::new("b", Pt::new(10.0, 10.0))).unwrap();
        t.add_edge(Edge::new("ab", "a", "b")).unwrap();
        t.add_signal(signal("nowhere", "ab", 0.0, SignalDirection::In,
                            SignalKind::Main, SignalFunction::Exit)).unwrap();
        t
    }

    /// A signal placed 150 along a 100 long edge.
    pub fn signal_past_end() -> Topology {
        let mut t = Topology::new("far");
        t.add_node(Node::new("a", Pt::new(0.0, 0.0))).unwrap();
        t.add_node(Node::new("b", Pt::new(100.0, 0.0))).unwrap();
        t.add_edge(Edge::new("ab", "a", "b")).unwrap();
        t.add_signal(signal("far", "ab", 150.0, SignalDirection::In,
                            SignalKind::Main, SignalFunction::Entry)).unwrap();
        t
    }
}
