pub mod notification;
pub mod requests;
