pub mod auth;
pub mod home;
pub mod roles;
pub mod user_roles;
pub mod users;
