use serde::Serialize;

pub mod content;
pub mod favorite;
pub mod user;
pub mod watch;

pub use content::{
    Comment, ContentEntity, NewComment, NewReview, NewShow, NewTag, Review, Show, Tag,
};
pub use favorite::{Favorite, FavoriteRow, FavoriteTarget, TargetKind};
pub use user::{NewUser, SignupRequest, User, UserProfile};
pub use watch::{WatchEntry, WatchRow, WatchState};

/// Numeric identifier shared by every stored entity
pub type EntityId = i64;

/// Everything one user has collected: favorites plus both watch lists
#[derive(Debug, Clone, Serialize)]
pub struct UserLibrary {
    pub user_name: String,
    pub favorites: Vec<Favorite>,
    pub watch_later: Vec<WatchEntry>,
    pub continue_watching: Vec<WatchEntry>,
}
