pub mod cards;
pub mod map;
