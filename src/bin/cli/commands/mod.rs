pub mod calc;
pub mod roster;
pub mod sweep;
