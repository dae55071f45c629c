pub mod credit;
pub mod roster;
