pub mod invite;
pub mod roster;
