//! Plain-text rendering of a [`ScreenView`].

use std::fmt::Write;

use marquee_config::FeedConfig;
use marquee_core::display::{
    DateFormat, OVERVIEW_MAX_CHARS, TITLE_MAX_CHARS, format_rating,
    format_release_date, truncate_with_ellipsis,
};
use marquee_core::{FeedRow, ScreenView, Section};
use marquee_model::{ImageSize, Movie, image_url};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub title_max_chars: usize,
    pub overview_max_chars: usize,
    pub date_format: DateFormat,
    /// CDN base for poster and backdrop URLs; images are omitted when unset.
    pub image_base_url: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title_max_chars: TITLE_MAX_CHARS,
            overview_max_chars: OVERVIEW_MAX_CHARS,
            date_format: DateFormat::default(),
            image_base_url: None,
        }
    }
}

impl RenderOptions {
    pub fn from_feed(feed: &FeedConfig) -> Self {
        Self {
            title_max_chars: feed.title_max_chars,
            overview_max_chars: feed.overview_max_chars,
            date_format: feed.date_format,
            image_base_url: None,
        }
    }

    pub fn with_images(mut self, base: impl Into<String>) -> Self {
        self.image_base_url = Some(base.into());
        self
    }

    fn image(&self, size: ImageSize, path: Option<&str>) -> Option<String> {
        let base = self.image_base_url.as_deref()?;
        image_url(base, size, path?)
    }
}

/// Render the whole screen to a string, one line per visual element.
pub fn render(view: &ScreenView, options: &RenderOptions) -> String {
    let mut out = String::new();

    let (rows, refreshing) = match view {
        ScreenView::Loading => {
            out.push_str("Loading...\n");
            return out;
        }
        ScreenView::Ready { rows, refreshing } => (rows, *refreshing),
    };

    if refreshing {
        out.push_str("(refreshing...)\n");
    }
    if rows.is_empty() {
        out.push_str("Nothing to show.\n");
        return out;
    }

    let mut list_started = false;
    for row in rows {
        match row {
            FeedRow::Carousel(movies) => {
                heading(&mut out, Section::NowPlaying);
                for (index, movie) in movies.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "  [{}/{}] {}",
                        index + 1,
                        movies.len(),
                        title(movie, options)
                    );
                    if let Some(url) = options.image(ImageSize::backdrop(), movie.backdrop_path()) {
                        let _ = writeln!(out, "        {url}");
                    }
                }
            }
            FeedRow::Rail(movies) => {
                heading(&mut out, Section::Trending);
                let titles: Vec<String> =
                    movies.iter().map(|movie| title(movie, options)).collect();
                let _ = writeln!(out, "  {}", titles.join(" | "));
            }
            FeedRow::ListItem(movie) => {
                if !list_started {
                    heading(&mut out, Section::Upcoming);
                    list_started = true;
                }
                list_item(&mut out, movie, options);
            }
        }
    }

    out
}

fn heading(out: &mut String, section: Section) {
    let _ = writeln!(out, "== {} ==", section.title());
}

fn title(movie: &Movie, options: &RenderOptions) -> String {
    truncate_with_ellipsis(movie.display_title(), options.title_max_chars)
}

fn list_item(out: &mut String, movie: &Movie, options: &RenderOptions) {
    let mut line = format!("  * {}", title(movie, options));
    if let Some(date) = movie.release_date() {
        let _ = write!(line, "  {}", format_release_date(date, options.date_format));
    }
    if let Some(rating) = format_rating(movie.rating()) {
        let _ = write!(line, "  {rating}");
    }
    out.push_str(&line);
    out.push('\n');

    if let Some(overview) = movie.overview() {
        let _ = writeln!(
            out,
            "    {}",
            truncate_with_ellipsis(overview, options.overview_max_chars)
        );
    }
    if let Some(url) = options.image(ImageSize::poster(), movie.poster_path()) {
        let _ = writeln!(out, "    {url}");
    }
}
