use topology::Node;

use crate::ids::*;
use crate::model::*;
use crate::relations::*;

/// Continuing and branching course from the side the turnout diverges to.
pub fn courses(turnout_side :Option<Side>) -> (Option<Side>, Option<Side>) {
    match turnout_side {
        Some(side) => (Some(side.opposite()), Some(side)),
        None => (None, None),
    }
}

/// Branch of a switch over the given relation. The topology has a single
/// maximum speed per branch, used for both directions.
pub fn branch(relation :&NetRelation, speed :Option<f64>) -> SwitchBranch {
    SwitchBranch {
        net_relation_ref: relation.id.clone(),
        branching_speed: speed,
        joining_speed: speed,
    }
}

/// The switch sits at the end of its head edge that touches the node.
pub fn spot_location(node :&str, head :&topology::Edge, id :Id) -> SpotLocation {
    SpotLocation {
        id,
        net_element_ref: head.id.clone(),
        pos: end_at(head, node).intrinsic(),
        application_direction: ApplicationDirection::Normal,
    }
}

pub fn switch_is(node :&Node, relations :&SwitchRelations, spot :SpotLocation) -> SwitchIS {
    let (continue_course, branch_course) = courses(node.turnout_side);
    let name = node.name.as_ref().filter(|n| !n.is_empty()).unwrap_or(&node.id);
    SwitchIS {
        id: node.id.clone(),
        r#type: "ordinarySwitch".to_string(),
        continue_course,
        branch_course,
        name: Name::en(name.as_str()),
        left_branch: branch(&relations.head_left, node.maximum_speed_on_left),
        right_branch: branch(&relations.head_right, node.maximum_speed_on_right),
        spot_location: spot,
        location_reference: Default::default(),
    }
}

/// Interlocking record of the switch. Refers to the branch tracks, not to
/// the relations.
pub fn switch_il(node :&Node, edges :&SwitchEdges) -> SwitchIL {
    SwitchIL {
        id: switch_il_id(&node.id),
        refers_to: node.id.clone(),
        branch_left: track_id(&edges.left.id),
        branch_right: track_id(&edges.right.id),
    }
}
