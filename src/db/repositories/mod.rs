pub mod club;
pub mod favorite;
pub mod tag;
pub mod user;
