//! HTTP request handlers for the webproj API.

pub mod crs;
pub mod health;
pub mod landing;
pub mod trans;
