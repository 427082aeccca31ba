pub mod groups;
pub mod meetings;
pub mod membership;
pub mod mentees;
pub mod users;

pub(crate) mod guard;
