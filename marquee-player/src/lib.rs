//! Terminal front end for the Marquee movie catalog screen.
//!
//! [`TmdbClient`] feeds the screen's three sections from the TMDB API and
//! [`render::render`] prints whatever [`marquee_core::ScreenView`] the screen
//! currently projects.

pub mod cli;
pub mod logging;
pub mod render;
pub mod tmdb;

pub use render::{RenderOptions, render};
pub use tmdb::TmdbClient;
