pub mod brute_force;
pub mod grid;
