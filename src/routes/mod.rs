//! API route modules

pub mod annotations;
pub mod assist;
pub mod bookmarks;
pub mod documents;
pub mod users;
