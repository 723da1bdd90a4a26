use serde::{Serialize, Deserialize};
use crate::model::Id;

/// How identifiers are made for elements that have no identity in the
/// topology (positioning systems, coordinates, spot locations, interlocking
/// signal records).
#[derive(Serialize, Deserialize)]
#[derive(Copy,Clone,PartialEq,Eq,Debug)]
#[serde(rename_all = "lowercase")]
pub enum IdMode {
    /// Random v4 uuids.
    Uuid,
    /// Prefixed running numbers, reproducible between runs.
    Sequential,
}

impl Default for IdMode {
    fn default() -> Self { IdMode::Uuid }
}

#[derive(Debug)]
pub struct IdAllocator {
    mode :IdMode,
    counter :usize,
}

impl IdAllocator {
    pub fn new(mode :IdMode) -> Self {
        IdAllocator { mode, counter: 0 }
    }

    /// A fresh id. The counter is shared between prefixes, so sequential
    /// ids are unique even without the prefix.
    pub fn next(&mut self, prefix :&str) -> Id {
        self.counter += 1;
        match self.mode {
            IdMode::Uuid => uuid::Uuid::new_v4().to_string(),
            IdMode::Sequential => format!("{}_{:04}", prefix, self.counter),
        }
    }

    pub fn issued(&self) -> usize { self.counter }
}

//
// Ids derived from topology identities.
//

/// Relation ids are order sensitive: (a,b) and (b,a) are different relations.
pub fn relation_id(first :&str, second :&str) -> Id {
    format!("nr_{}_{}", first, second)
}

pub fn track_id(edge :&str) -> Id {
    format!("trc_{}", edge)
}

pub fn switch_il_id(node :&str) -> Id {
    format!("pt_{}", node)
}
