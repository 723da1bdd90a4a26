use ordered_float::OrderedFloat;
use log::*;

use crate::geometry::*;
use crate::{Edge, NodeId, Topology, TopologyError};

/// Roles of the three neighbours of a switch node.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Branches {
    pub head :NodeId,
    pub left :NodeId,
    pub right :NodeId,
}

impl Topology {
    /// Direction in which the edge leaves `node`, taken from the first
    /// geometry point after the node.
    pub fn leaving_direction(&self, edge :&Edge, node :&str) -> Result<Vc, TopologyError> {
        let mut pts = self.edge_geometry(edge)?;
        if !edge.starts_at(node) { pts.reverse(); }
        Ok(pt_sub(pts[1], pts[0]))
    }

    /// Role slots given on the node itself, if all three are set.
    pub fn preset_branches(&self, node_id :&str) -> Option<Branches> {
        let node = self.node(node_id)?;
        match (&node.connected_on_head, &node.connected_on_left, &node.connected_on_right) {
            (Some(h), Some(l), Some(r)) => Some(Branches { head: h.clone(), left: l.clone(), right: r.clone() }),
            _ => None,
        }
    }

    /// Decide which neighbour of a three-way node is the head and which are
    /// the left and right branches, from the node's geometry.
    ///
    /// The head is the only neighbour for which both other edges point away
    /// from it. Seen in the direction of travel from the head through the
    /// node, the branch turning more counter-clockwise is the left one.
    pub fn classify_branches(&self, node_id :&str) -> Result<Branches, TopologyError> {
        let err = |reason :String| TopologyError::Classification {
            node: node_id.to_string(), reason };

        if self.node(node_id).is_none() {
            return Err(TopologyError::UnknownNode(node_id.to_string()));
        }
        let neighbours = self.connected_nodes(node_id);
        if neighbours.len() != 3 {
            return Err(err(format!("expected 3 connected nodes, found {}", neighbours.len())));
        }

        let mut dirs :Vec<(&NodeId, Vc)> = Vec::with_capacity(3);
        for other in neighbours {
            let edge = self.edge_between(node_id, other)
                .ok_or_else(|| err(format!("no edge towards {}", other)))?;
            let v = normalize(self.leaving_direction(edge, node_id)?)
                .ok_or_else(|| err(format!("edge {} has no direction at the node", edge.id)))?;
            dirs.push((other, v));
        }

        let heads = (0..3).filter(|&h| {
            (0..3).filter(|&i| i != h).all(|i| dot(dirs[h].1, dirs[i].1) < 0.0)
        }).collect::<Vec<_>>();
        let h = match heads.as_slice() {
            &[h] => h,
            &[] => return Err(err("no neighbour lies opposite the other two".to_string())),
            _ => return Err(err("more than one neighbour could be the head".to_string())),
        };

        let travel = scale(dirs[h].1, -1.0);
        let mut diverging = (0..3).filter(|&i| i != h)
            .map(|i| (i, signed_angle(travel, dirs[i].1)))
            .collect::<Vec<_>>();
        diverging.sort_by_key(|&(_,angle)| OrderedFloat(angle));
        if (diverging[1].1 - diverging[0].1).abs() < EPS {
            return Err(err("diverging branches are coincident".to_string()));
        }

        let branches = Branches {
            head: dirs[h].0.clone(),
            left: dirs[diverging[1].0].0.clone(),
            right: dirs[diverging[0].0].0.clone(),
        };
        debug!("Classified node {}: {:?}", node_id, branches);
        Ok(branches)
    }
}
