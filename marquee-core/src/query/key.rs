use std::fmt;
use std::sync::Arc;

/// Opaque cache key made of ordered string segments.
///
/// Keys are compared segment by segment, so `movies/nowPlaying` and
/// `movies/upcoming` share the `movies` prefix and can be refreshed together.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Arc<[String]>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when every segment of `prefix` matches the leading segments of
    /// this key. The empty key is a prefix of every key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl fmt::Debug for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QueryKey").field(&self.0).finish()
    }
}

impl From<&str> for QueryKey {
    fn from(value: &str) -> Self {
        QueryKey::new([value])
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(value: [&str; N]) -> Self {
        QueryKey::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::QueryKey;

    #[test]
    fn prefix_matches_leading_segments_only() {
        let key = QueryKey::from(["movies", "nowPlaying"]);
        assert!(key.starts_with(&QueryKey::from("movies")));
        assert!(key.starts_with(&key));
        assert!(key.starts_with(&QueryKey::new(Vec::<String>::new())));
        assert!(!key.starts_with(&QueryKey::from("nowPlaying")));
        assert!(!key.starts_with(&QueryKey::from(["movies", "nowPlaying", "1"])));
    }

    #[test]
    fn displays_as_path() {
        let key = QueryKey::from(["movies", "trending"]);
        assert_eq!(key.to_string(), "movies/trending");
    }

    #[test]
    fn segment_boundaries_matter() {
        let joined = QueryKey::from("movies/trending");
        let split = QueryKey::from(["movies", "trending"]);
        assert_ne!(joined, split);
        assert!(!joined.starts_with(&QueryKey::from("movies")));
    }
}
