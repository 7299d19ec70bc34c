//! Resource lifecycle services
//!
//! Each operation that targets an existing favourite or note resolves and
//! authorizes ownership through [`crate::ownership::OwnershipResolver`] before
//! touching the store.

pub mod favourites;
pub mod notes;
pub mod users;

pub use favourites::FavouriteService;
pub use notes::NoteService;
pub use users::UserService;
