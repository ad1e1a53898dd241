//! HTTP request handlers, grouped by resource.

pub mod admin;
pub mod auth;
pub mod comment;
pub mod dashboard;
pub mod project;
pub mod task;
