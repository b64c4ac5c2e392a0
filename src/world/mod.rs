// Entity simulation on a toroidal grid

mod entity;
mod simulation;
mod weighted;

pub use entity::{Entity, Heading, Turn};
pub use simulation::World;
pub use weighted::{SelectionError, WeightedTable};

#[cfg(test)]
mod tests;
