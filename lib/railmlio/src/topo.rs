use serde::{Serialize, Deserialize};
use log::*;
use topology::{Edge, Node, NodeId, Signal, SignalId, Topology, TopologyError};

use crate::ids::*;
use crate::model::*;
use crate::model::Level;
use crate::relations::*;
use crate::signals;
use crate::switches;

//
// Conversion from a micro topology to a railML document.
//
// One pass: net elements for every edge, signals, then relations and
// switches per node. Relations are pushed only after the elements they
// reference, and a switch only after its relations.
//

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("switch {node}: no edge between the switch and {other}")]
    MissingEdge { node :NodeId, other :NodeId },
    #[error("switch {node}: cannot resolve head/left/right ({reason})")]
    Classification { node :NodeId, reason :String },
    #[error("signal {signal}: relative position {pos} is outside [0,1]")]
    InvalidSignalPosition { signal :SignalId, pos :f64 },
    #[error(transparent)]
    Topology(TopologyError),
}

impl From<TopologyError> for ExportError {
    fn from(e :TopologyError) -> Self {
        match e {
            TopologyError::Classification { node, reason } => ExportError::Classification { node, reason },
            e => ExportError::Topology(e),
        }
    }
}

/// What happens when a single switch or signal cannot be converted.
#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Abort the whole conversion.
    Strict,
    /// Log a warning and leave the element out. Finite out-of-range signal
    /// positions are written as computed.
    Lenient,
}

impl Default for Strictness {
    fn default() -> Self { Strictness::Strict }
}

#[derive(Serialize, Deserialize)]
#[derive(Clone,Debug,Default,PartialEq)]
#[serde(default)]
pub struct ExportOptions {
    pub version :SchemaVersion,
    pub strictness :Strictness,
    pub ids :IdMode,
}

pub const NETWORK_ID :&str = "nw01";
pub const LEVEL_ID :&str = "lv01";
pub const ASSETS_ID :&str = "af01";

struct Conversion<'t> {
    topo :&'t Topology,
    options :ExportOptions,
    ids :IdAllocator,
    branches :BranchCache,
    net_elements :Vec<NetElement>,
    net_relations :Vec<NetRelation>,
    resources :Vec<IdRef>,
    functional :FunctionalInfrastructure,
    assets :AssetsForInterlocking,
}

pub fn convert_topology(topo :&Topology, options :&ExportOptions) -> Result<RailML, ExportError> {
    info!("Converting topology {} to railML {}.", topo.uuid, options.version.as_str());
    let mut conv = Conversion {
        topo,
        options: options.clone(),
        ids: IdAllocator::new(options.ids),
        branches: BranchCache::new(),
        net_elements: Vec::new(),
        net_relations: Vec::new(),
        resources: Vec::new(),
        functional: Default::default(),
        assets: Default::default(),
    };

    for edge in topo.edges() {
        conv.net_element(edge);
    }

    if options.version.has_functional_infrastructure() {
        for signal in topo.signals() {
            let r = conv.signal(signal);
            conv.tolerate(r)?;
        }
    }

    for node in topo.nodes() {
        match topo.connected_nodes(&node.id).len() {
            3 => {
                let r = conv.switch(node);
                conv.tolerate(r)?;
            },
            2 if !options.version.has_functional_infrastructure() => {
                let r = conv.continuation(node);
                conv.tolerate(r)?;
            },
            _ => {},
        }
    }

    let doc = conv.finish();
    info!("Wrote {} net elements, {} net relations, {} switches, {} signals.",
          doc.infrastructure.topology.net_elements.len(),
          doc.infrastructure.topology.net_relations.len(),
          doc.infrastructure.functional.as_ref().map(|f| f.switches.len()).unwrap_or(0),
          doc.infrastructure.functional.as_ref().map(|f| f.signals.len()).unwrap_or(0));
    Ok(doc)
}

impl<'t> Conversion<'t> {
    fn tolerate(&self, result :Result<(), ExportError>) -> Result<(), ExportError> {
        match (result, self.options.strictness) {
            (Err(e), Strictness::Lenient) => {
                warn!("Leaving out element: {}", e);
                Ok(())
            },
            (r, _) => r,
        }
    }

    fn add_relation(&mut self, relation :NetRelation) {
        self.resources.push(relation.id.clone());
        self.net_relations.push(relation);
    }

    fn net_element(&mut self, edge :&Edge) {
        let positioning = AssociatedPositioningSystem {
            id: self.ids.next("aps"),
            intrinsic_coordinates: vec![
                IntrinsicCoordinate { id: self.ids.next("ic"), intrinsic_coord: AB::A.intrinsic() },
                IntrinsicCoordinate { id: self.ids.next("ic"), intrinsic_coord: AB::B.intrinsic() },
            ],
        };
        self.net_elements.push(NetElement { id: edge.id.clone(), positioning });
        self.resources.push(edge.id.clone());

        if self.options.version.has_functional_infrastructure() {
            self.functional.tracks.push(Track {
                id: track_id(&edge.id),
                r#type: "mainTrack".to_string(),
            });
        }
    }

    fn switch(&mut self, node :&Node) -> Result<(), ExportError> {
        let branches = self.branches.ensure_classified(self.topo, node)?;
        let edges = switch_edges(self.topo, &node.id, &branches)?;
        let relations = switch_relations(&edges, &node.id);
        debug!("Switch {}: head {} left {} right {}", node.id, edges.head.id, edges.left.id, edges.right.id);

        if self.options.version.has_functional_infrastructure() {
            let spot = switches::spot_location(&node.id, edges.head, self.ids.next("sloc"));
            let switch_is = switches::switch_is(node, &relations, spot);
            let switch_il = switches::switch_il(node, &edges);
            for r in relations.into_vec() { self.add_relation(r); }
            self.functional.switches.push(switch_is);
            self.assets.switches.push(switch_il);
        } else {
            for r in relations.into_vec() { self.add_relation(r); }
        }
        Ok(())
    }

    /// Plain joint between two edges, only written for 3.1 documents.
    fn continuation(&mut self, node :&Node) -> Result<(), ExportError> {
        let edges = self.topo.connected_nodes(&node.id).iter()
            .map(|other| self.topo.edge_between(&node.id, other)
                 .ok_or_else(|| ExportError::MissingEdge { node: node.id.clone(), other: other.clone() }))
            .collect::<Result<Vec<_>,_>>()?;
        let r = relation(edges[0], edges[1], &node.id, Navigability::Both);
        self.add_relation(r);
        Ok(())
    }

    fn signal(&mut self, signal :&Signal) -> Result<(), ExportError> {
        let pos = signals::relative_position(self.topo, signal)?;
        let pos = signals::check_position(signal, pos, self.options.strictness)?;
        let spot = SpotLocation {
            id: self.ids.next("sloc"),
            net_element_ref: signal.edge.clone(),
            pos,
            application_direction: signals::application_direction(signal.direction),
        };
        self.functional.signals.push(signals::signal_is(signal, spot));
        self.assets.signals.push(SignalIL {
            id: self.ids.next("sil"),
            function: signals::signal_function(signal.kind, signal.function),
            refers_to: signal.id.clone(),
        });
        Ok(())
    }

    fn finish(self) -> RailML {
        let version = self.options.version;
        let id = self.topo.name.clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.topo.uuid.clone());

        let topology = NetTopology {
            net_elements: self.net_elements,
            net_relations: self.net_relations,
            network: Network {
                id: NETWORK_ID.to_string(),
                level: Level {
                    id: LEVEL_ID.to_string(),
                    description_level: "Micro".to_string(),
                    network_resources: self.resources,
                },
            },
        };

        if version.has_functional_infrastructure() {
            RailML {
                version,
                infrastructure: Infrastructure { id, topology, functional: Some(self.functional) },
                interlocking: Some(Interlocking {
                    assets: AssetsForInterlocking { id: ASSETS_ID.to_string(), ..self.assets },
                }),
            }
        } else {
            RailML {
                version,
                infrastructure: Infrastructure { id, topology, functional: None },
                interlocking: None,
            }
        }
    }
}
