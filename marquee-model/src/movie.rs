use serde::{Deserialize, Serialize};

use crate::ids::MovieId;

/// One catalog entry as returned by the TMDB movie list endpoints.
///
/// Only `id` and `original_title` are guaranteed; everything the renderer
/// treats as optional is optional here too, and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub original_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub adult: bool,
}

impl Movie {
    /// Minimal entry with only the required fields set.
    pub fn new(id: impl Into<MovieId>, original_title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_title: original_title.into(),
            title: None,
            overview: None,
            vote_average: None,
            vote_count: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            original_language: None,
            genre_ids: Vec::new(),
            popularity: None,
            adult: false,
        }
    }

    /// Title shown on cards. The screen always uses the original title.
    pub fn display_title(&self) -> &str {
        &self.original_title
    }

    /// Secondary text, with an empty overview treated as absent.
    pub fn overview(&self) -> Option<&str> {
        self.overview.as_deref().filter(|text| !text.is_empty())
    }

    /// Rating out of ten; a zero average means "not rated yet".
    pub fn rating(&self) -> Option<f32> {
        self.vote_average.filter(|avg| *avg > 0.0)
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref().filter(|path| !path.is_empty())
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        self.backdrop_path.as_deref().filter(|path| !path.is_empty())
    }

    pub fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref().filter(|date| !date.is_empty())
    }
}

/// Release window reported by `now_playing` and `upcoming`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub minimum: String,
    pub maximum: String,
}

/// First page of a movie collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default = "first_page")]
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateRange>,
}

fn first_page() -> u32 {
    1
}

impl MoviePage {
    /// A single page holding `results`.
    pub fn from_results(results: Vec<Movie>) -> Self {
        let total = results.len() as u32;
        Self {
            page: 1,
            results,
            total_pages: 1,
            total_results: total,
            dates: None,
        }
    }

    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tmdb_list_payload() {
        let raw = r#"{
            "dates": {"maximum": "2024-02-01", "minimum": "2023-12-20"},
            "page": 1,
            "results": [{
                "adult": false,
                "backdrop_path": "/bd.jpg",
                "genre_ids": [28, 12],
                "id": 872585,
                "original_language": "en",
                "original_title": "Oppenheimer",
                "overview": "The story of J. Robert Oppenheimer.",
                "popularity": 412.3,
                "poster_path": "/p.jpg",
                "release_date": "2023-07-19",
                "title": "Oppenheimer",
                "video": false,
                "vote_average": 8.1,
                "vote_count": 6034
            }],
            "total_pages": 87,
            "total_results": 1736
        }"#;

        let page: MoviePage = serde_json::from_str(raw).expect("valid page");
        assert_eq!(page.total_pages, 87);
        assert_eq!(page.dates.as_ref().map(|d| d.maximum.as_str()), Some("2024-02-01"));

        let movie = &page.results[0];
        assert_eq!(movie.id, MovieId(872585));
        assert_eq!(movie.display_title(), "Oppenheimer");
        assert_eq!(movie.rating(), Some(8.1));
        assert_eq!(movie.genre_ids, vec![28, 12]);
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let raw = r#"{"results": [{"id": 7, "original_title": "Untitled", "poster_path": null}]}"#;
        let page: MoviePage = serde_json::from_str(raw).expect("valid page");
        assert_eq!(page.page, 1);

        let movie = &page.results[0];
        assert_eq!(movie.poster_path(), None);
        assert_eq!(movie.release_date(), None);
        assert_eq!(movie.rating(), None);
    }

    #[test]
    fn empty_overview_and_zero_rating_read_as_absent() {
        let mut movie = Movie::new(1, "Quiet");
        movie.overview = Some(String::new());
        movie.vote_average = Some(0.0);
        assert_eq!(movie.overview(), None);
        assert_eq!(movie.rating(), None);
    }
}
