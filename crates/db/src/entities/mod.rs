//! Database entities.

pub mod cafe;
pub mod friendship;
pub mod message;
pub mod notification;
pub mod review;
pub mod review_like;
pub mod user;

pub use cafe::Entity as Cafe;
pub use friendship::Entity as Friendship;
pub use message::Entity as Message;
pub use notification::Entity as Notification;
pub use review::Entity as Review;
pub use review_like::Entity as ReviewLike;
pub use user::Entity as User;
