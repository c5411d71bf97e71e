pub mod prelude;

pub mod club_tags;
pub mod clubs;
pub mod favorites;
pub mod tags;
pub mod users;
