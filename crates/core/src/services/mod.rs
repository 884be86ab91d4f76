//! Business-logic services.

pub mod cafe;
pub mod friend;
pub mod jobs;
pub mod messaging;
pub mod notification;
pub mod review;
pub mod user;

pub use cafe::CafeService;
pub use friend::FriendService;
pub use jobs::{Notifier, start_notification_worker};
pub use messaging::{ConversationSummary, MessagingService};
pub use notification::NotificationService;
pub use review::{
    CreateReviewInput, Liker, ReviewService, ReviewWithAuthor, ReviewWithCafe, UpdateReviewInput,
};
pub use user::{RegisterInput, UpdateProfileInput, UserService};
