pub mod alog;
pub mod caps;
pub mod clock;
pub mod drops;
pub mod pet;
pub mod roster;
pub mod skills;
pub mod telos;
pub mod xp;
