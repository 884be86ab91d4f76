//! Database repositories.

pub mod cafe;
pub mod friendship;
pub mod message;
pub mod notification;
pub mod review;
pub mod review_like;
pub mod user;

pub use cafe::CafeRepository;
pub use friendship::{FriendshipRepository, canonical_pair};
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use review::{ReviewPatch, ReviewRepository};
pub use review_like::ReviewLikeRepository;
pub use user::UserRepository;
