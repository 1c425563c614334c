pub mod archived;
pub mod auth;
pub mod board;
pub mod notification;
pub mod task;
