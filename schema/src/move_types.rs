use crate::element_types::ElementType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Fully resolved move data as delivered by a roster source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: ElementType,
    pub category: MoveCategory,
    /// 0 for pure-status moves.
    #[serde(default)]
    pub power: u16,
    /// `None` never misses.
    #[serde(default)]
    pub accuracy: Option<u8>,
    pub max_pp: u8,
}

impl MoveData {
    pub fn new(
        name: &str,
        move_type: ElementType,
        category: MoveCategory,
        power: u16,
        accuracy: Option<u8>,
        max_pp: u8,
    ) -> Self {
        Self {
            name: name.to_string(),
            move_type,
            category,
            power,
            accuracy,
            max_pp,
        }
    }

    /// Lowercase name with `-` and `_` folded into spaces, so "Will-O-Wisp",
    /// "will_o_wisp" and "will o wisp" compare equal.
    pub fn normalized_name(&self) -> String {
        normalize_move_name(&self.name)
    }
}

pub fn normalize_move_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
