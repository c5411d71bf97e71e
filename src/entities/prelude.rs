pub use super::club_tags::Entity as ClubTags;
pub use super::clubs::Entity as Clubs;
pub use super::favorites::Entity as Favorites;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
