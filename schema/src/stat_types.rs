use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    Hp,
    Attack,
    Defense,
    #[strum(serialize = "Special Attack")]
    SpecialAttack,
    #[strum(serialize = "Special Defense")]
    SpecialDefense,
    Speed,
}

/// Read value for a stat that the roster source left out.
pub const DEFAULT_STAT_VALUE: u16 = 50;
