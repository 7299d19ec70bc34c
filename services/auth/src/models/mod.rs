//! Authentication service models

pub mod user;

pub use user::{AuthResponse, LoginRequest, NewUser, RegisterRequest, User, UserResponse};
