use serde::{Serialize, Deserialize};
use std::str::FromStr;

pub use topology::Side;

//
// railML 3 infrastructure and interlocking, as far as the micro topology
// export needs it. Optional fields are left out of the written document.
//

pub type Id = String;
pub type IdRef = String;

#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum SchemaVersion {
    #[serde(rename = "3.1")]
    V31,
    #[serde(rename = "3.2")]
    V32,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V31 => "3.1",
            SchemaVersion::V32 => "3.2",
        }
    }

    pub fn namespace(&self) -> String {
        format!("https://www.railml.org/schemas/{}", self.as_str())
    }

    pub fn schema_location(&self) -> String {
        format!("{} https://www.railml.org/schemas/{}/railml3.xsd", self.namespace(), self.as_str())
    }

    /// 3.1 documents only carry the net topology.
    pub fn has_functional_infrastructure(&self) -> bool {
        *self == SchemaVersion::V32
    }
}

impl Default for SchemaVersion {
    fn default() -> Self { SchemaVersion::V32 }
}

impl FromStr for SchemaVersion {
    type Err = String;
    fn from_str(s :&str) -> Result<Self, String> {
        match s {
            "3.1" => Ok(SchemaVersion::V31),
            "3.2" => Ok(SchemaVersion::V32),
            _ => Err(format!("unsupported railML version {:?} (expected 3.1 or 3.2)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RailML {
    pub version :SchemaVersion,
    pub infrastructure :Infrastructure,
    pub interlocking :Option<Interlocking>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Infrastructure {
    pub id :Id,
    pub topology :NetTopology,
    pub functional :Option<FunctionalInfrastructure>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetTopology {
    pub net_elements :Vec<NetElement>,
    pub net_relations :Vec<NetRelation>,
    pub network :Network,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetElement {
    pub id :Id,
    pub positioning :AssociatedPositioningSystem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssociatedPositioningSystem {
    pub id :Id,
    pub intrinsic_coordinates :Vec<IntrinsicCoordinate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntrinsicCoordinate {
    pub id :Id,
    pub intrinsic_coord :f64,
}

/// End of a net element: A is where the edge starts (intrinsic coordinate
/// 0), B where it ends (1).
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug)]
pub enum AB { A, B }

impl AB {
    pub fn intrinsic(&self) -> f64 {
        match self {
            AB::A => 0.0,
            AB::B => 1.0,
        }
    }
}

#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum Navigability {
    Both,
    None,
}

impl Navigability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Navigability::Both => "Both",
            Navigability::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetRelation {
    pub id :Id,
    pub element_a :IdRef,
    pub element_b :IdRef,
    pub position_on_a :AB,
    pub position_on_b :AB,
    pub navigability :Navigability,
}

impl NetRelation {
    pub fn touches(&self, element :&str) -> bool {
        self.element_a == element || self.element_b == element
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub id :Id,
    pub level :Level,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub id :Id,
    pub description_level :String,
    pub network_resources :Vec<IdRef>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionalInfrastructure {
    pub switches :Vec<SwitchIS>,
    pub signals :Vec<SignalIS>,
    pub tracks :Vec<Track>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub name :String,
    pub language :String,
}

impl Name {
    pub fn en(name :impl Into<String>) -> Name {
        Name { name: name.into(), language: "en".to_string() }
    }
}

#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum ApplicationDirection {
    Normal,
    Reverse,
}

impl ApplicationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationDirection::Normal => "normal",
            ApplicationDirection::Reverse => "reverse",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLocation {
    pub id :Id,
    pub net_element_ref :IdRef,
    pub pos :f64,
    pub application_direction :ApplicationDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationReference {
    pub reference_point :String,
    pub tangent_length :f64,
}

impl Default for LocationReference {
    fn default() -> Self {
        LocationReference {
            reference_point: "switchCenter".to_string(),
            tangent_length: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchBranch {
    pub net_relation_ref :IdRef,
    pub branching_speed :Option<f64>,
    pub joining_speed :Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchIS {
    pub id :Id,
    pub r#type :String,
    pub continue_course :Option<Side>,
    pub branch_course :Option<Side>,
    pub name :Name,
    pub left_branch :SwitchBranch,
    pub right_branch :SwitchBranch,
    pub spot_location :SpotLocation,
    pub location_reference :LocationReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalIS {
    pub id :Id,
    pub is_switchable :bool,
    pub spot_location :SpotLocation,
    pub name :Option<Name>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id :Id,
    pub r#type :String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interlocking {
    pub assets :AssetsForInterlocking,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetsForInterlocking {
    pub id :Id,
    pub signals :Vec<SignalIL>,
    pub switches :Vec<SwitchIL>,
}

#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum SignalFunctionIL {
    Distant,
    Barrage,
    Exit,
    Entry,
    Block,
}

impl SignalFunctionIL {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalFunctionIL::Distant => "distant",
            SignalFunctionIL::Barrage => "barrage",
            SignalFunctionIL::Exit => "exit",
            SignalFunctionIL::Entry => "entry",
            SignalFunctionIL::Block => "block",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalIL {
    pub id :Id,
    pub function :Option<SignalFunctionIL>,
    pub refers_to :IdRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchIL {
    pub id :Id,
    pub refers_to :IdRef,
    pub branch_left :IdRef,
    pub branch_right :IdRef,
}

impl RailML {
    pub fn net_element(&self, id :&str) -> Option<&NetElement> {
        self.infrastructure.topology.net_elements.iter().find(|e| e.id == id)
    }

    pub fn net_relation(&self, id :&str) -> Option<&NetRelation> {
        self.infrastructure.topology.net_relations.iter().find(|r| r.id == id)
    }

    pub fn switch_is(&self, id :&str) -> Option<&SwitchIS> {
        self.infrastructure.functional.as_ref()?.switches.iter().find(|s| s.id == id)
    }

    pub fn signal_is(&self, id :&str) -> Option<&SignalIS> {
        self.infrastructure.functional.as_ref()?.signals.iter().find(|s| s.id == id)
    }

    pub fn signal_il_for(&self, signal_is :&str) -> Option<&SignalIL> {
        self.interlocking.as_ref()?.assets.signals.iter().find(|s| s.refers_to == signal_is)
    }

    pub fn switch_il_for(&self, switch_is :&str) -> Option<&SwitchIL> {
        self.interlocking.as_ref()?.assets.switches.iter().find(|s| s.refers_to == switch_is)
    }
}
