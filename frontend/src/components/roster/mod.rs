//! Roster enrollment UI: bulk CSV import and single-student invites.

pub mod import;
pub mod invite;
