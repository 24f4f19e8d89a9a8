pub mod ai;
pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod damage;
pub mod engine;
pub mod runner;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
