use std::collections::HashMap;
use log::*;
use topology::{Branches, Edge, Node, NodeId, Topology};

use crate::ids::relation_id;
use crate::model::*;
use crate::topo::ExportError;

/// Head/left/right roles per switch node, resolved once per node and reused
/// by every later lookup.
#[derive(Debug, Default)]
pub struct BranchCache {
    roles :HashMap<NodeId, Branches>,
}

impl BranchCache {
    pub fn new() -> Self { Default::default() }

    /// Roles of a three-way node: the node's own role slots when all three
    /// are set, otherwise the topology's geometric classification.
    pub fn ensure_classified(&mut self, topo :&Topology, node :&Node) -> Result<Branches, ExportError> {
        if let Some(b) = self.roles.get(&node.id) {
            return Ok(b.clone());
        }

        let branches = match topo.preset_branches(&node.id) {
            Some(b) => {
                if b.head == b.left || b.head == b.right || b.left == b.right {
                    return Err(ExportError::Classification {
                        node: node.id.clone(),
                        reason: "role slots name the same neighbour twice".to_string(),
                    });
                }
                b
            },
            None => {
                debug!("Node {} has no preset roles, classifying from geometry.", node.id);
                topo.classify_branches(&node.id)?
            },
        };

        self.roles.insert(node.id.clone(), branches.clone());
        Ok(branches)
    }

    pub fn len(&self) -> usize { self.roles.len() }
}

/// The three edges meeting at a switch node, by role.
#[derive(Debug, Copy, Clone)]
pub struct SwitchEdges<'t> {
    pub head :&'t Edge,
    pub left :&'t Edge,
    pub right :&'t Edge,
}

pub fn switch_edges<'t>(topo :&'t Topology, node :&str, b :&Branches) -> Result<SwitchEdges<'t>, ExportError> {
    let edge = |other :&NodeId| topo.edge_between(node, other)
        .ok_or_else(|| ExportError::MissingEdge { node: node.to_string(), other: other.clone() });
    Ok(SwitchEdges {
        head: edge(&b.head)?,
        left: edge(&b.left)?,
        right: edge(&b.right)?,
    })
}

/// Which end of the edge touches the node.
pub fn end_at(edge :&Edge, node :&str) -> AB {
    if edge.starts_at(node) { AB::A } else { AB::B }
}

/// Relation between two edges meeting in `node`. `first` becomes element A.
pub fn relation(first :&Edge, second :&Edge, node :&str, navigability :Navigability) -> NetRelation {
    NetRelation {
        id: relation_id(&first.id, &second.id),
        element_a: first.id.clone(),
        element_b: second.id.clone(),
        position_on_a: end_at(first, node),
        position_on_b: end_at(second, node),
        navigability,
    }
}

#[derive(Debug, Clone)]
pub struct SwitchRelations {
    pub head_left :NetRelation,
    pub head_right :NetRelation,
    /// Trains cannot pass directly between the two diverging branches.
    pub left_right :NetRelation,
}

impl SwitchRelations {
    pub fn into_vec(self) -> Vec<NetRelation> {
        vec![self.head_left, self.head_right, self.left_right]
    }
}

pub fn switch_relations(edges :&SwitchEdges, node :&str) -> SwitchRelations {
    SwitchRelations {
        head_left: relation(edges.head, edges.left, node, Navigability::Both),
        head_right: relation(edges.head, edges.right, node, Navigability::Both),
        left_right: relation(edges.left, edges.right, node, Navigability::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::*;

    #[test]
    fn switch_relation_structure() {
        let t = y_switch();
        let mut cache = BranchCache::new();
        let node = t.node("sw").unwrap();
        let b = cache.ensure_classified(&t, node).unwrap();
        let edges = switch_edges(&t, "sw", &b).unwrap();
        assert_eq!((edges.head.id.as_str(), edges.left.id.as_str(), edges.right.id.as_str()),
                   ("e1", "e2", "e3"));

        let r = switch_relations(&edges, "sw");
        assert_eq!(r.head_left.id, "nr_e1_e2");
        assert_eq!(r.head_left.navigability, Navigability::Both);
        assert_eq!(r.head_right.id, "nr_e1_e3");
        assert_eq!(r.head_right.navigability, Navigability::Both);
        assert_eq!(r.left_right.id, "nr_e2_e3");
        assert_eq!(r.left_right.navigability, Navigability::None);

        // e1 ends in the switch, e2 and e3 start there.
        assert_eq!((r.head_left.position_on_a, r.head_left.position_on_b), (AB::B, AB::A));
        assert_eq!((r.left_right.position_on_a, r.left_right.position_on_b), (AB::A, AB::A));
    }

    #[test]
    fn positions_follow_edge_orientation() {
        let mut e = Edge::new("x", "sw", "other");
        assert_eq!(end_at(&e, "sw"), AB::A);
        e = Edge::new("x", "other", "sw");
        assert_eq!(end_at(&e, "sw"), AB::B);
    }

    #[test]
    fn roles_are_memoized() {
        let t = y_switch();
        let mut cache = BranchCache::new();
        let node = t.node("sw").unwrap();
        let first = cache.ensure_classified(&t, node).unwrap();
        let second = cache.ensure_classified(&t, node).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn preset_roles_win_over_geometry() {
        let mut t = y_switch_with(|n| {
            n.connected_on_head = Some("h".into());
            n.connected_on_left = Some("r".into());
            n.connected_on_right = Some("l".into());
        });
        let b = BranchCache::new().ensure_classified(&t, t.node("sw").unwrap()).unwrap();
        assert_eq!((b.left.as_str(), b.right.as_str()), ("r", "l"));

        t = y_switch_with(|n| {
            n.connected_on_head = Some("h".into());
            n.connected_on_left = Some("h".into());
            n.connected_on_right = Some("l".into());
        });
        let err = BranchCache::new().ensure_classified(&t, t.node("sw").unwrap()).unwrap_err();
        assert!(matches!(err, ExportError::Classification { .. }));
    }

    #[test]
    fn preset_naming_a_stranger_is_a_missing_edge() {
        let t = y_switch_with(|n| {
            n.connected_on_head = Some("h".into());
            n.connected_on_left = Some("l".into());
            n.connected_on_right = Some("elsewhere".into());
        });
        let b = BranchCache::new().ensure_classified(&t, t.node("sw").unwrap()).unwrap();
        match switch_edges(&t, "sw", &b) {
            Err(ExportError::MissingEdge { node, other }) => {
                assert_eq!(node, "sw");
                assert_eq!(other, "elsewhere");
            },
            x => panic!("expected a missing edge, got {:?}", x.map(|_| ())),
        }
    }
}
