//! Catalog data models shared across Marquee crates.
//!
//! The shapes here follow the TMDB list endpoints (`now_playing`,
//! `trending`, `upcoming`) closely enough to deserialize their first page
//! directly, while exposing the handful of fields the screen actually
//! renders through typed accessors.
#![allow(missing_docs)]

pub mod ids;
pub mod image;
pub mod movie;

pub use ids::MovieId;
pub use image::{BackdropSize, ImageSize, PosterSize, image_url};
pub use movie::{DateRange, Movie, MoviePage};
