pub mod difficulty;
pub mod grid;
pub mod rules;
pub mod tile;
pub mod topology;
