// Creature Battler Schema - Shared type definitions
// Element types, move and stat shapes shared between the engine and the
// roster sources that feed it.

pub use element_types::*;
pub use move_types::*;
pub use stat_types::*;

pub mod element_types;
pub mod move_types;
pub mod stat_types;
