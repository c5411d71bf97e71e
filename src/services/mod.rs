pub mod club_service;
pub use club_service::{ClubDetails, ClubError, ClubPatch, ClubService, CreateClubRequest};

pub mod club_service_impl;
pub use club_service_impl::SeaOrmClubService;

pub mod user_service;
pub use user_service::{CreateUserRequest, UserError, UserProfile, UserService};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;

pub mod tag_service;
pub use tag_service::{TagError, TagService, TagWithCount};

pub mod tag_service_impl;
pub use tag_service_impl::SeaOrmTagService;

/// Distinguishes a fresh insert from a benign "already existed" no-op.
/// Both carry the row the caller ends up with.
#[derive(Debug, Clone)]
pub enum CreateOutcome<T> {
    Created(T),
    AlreadyExists(T),
}

impl<T> CreateOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::AlreadyExists(value) => value,
        }
    }

    pub const fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
