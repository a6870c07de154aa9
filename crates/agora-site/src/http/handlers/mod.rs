//! HTTP request handlers for the site.

pub mod chat_ws;
pub mod docs;
pub mod home;
pub mod sitemap;
