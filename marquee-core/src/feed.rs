//! Feed assembly: turn section snapshots into the ordered row list the
//! renderer walks.

/// Discriminant of a [`FeedRow`], for renderers that dispatch on kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Carousel,
    Rail,
    ListItem,
}

/// One renderable unit of the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRow<I> {
    /// Horizontally paged slides, always first when present.
    Carousel(Vec<I>),
    /// Horizontally scrolling cards, after the carousel.
    Rail(Vec<I>),
    /// One entry of the vertical list.
    ListItem(I),
}

impl<I> FeedRow<I> {
    pub fn kind(&self) -> RowKind {
        match self {
            FeedRow::Carousel(_) => RowKind::Carousel,
            FeedRow::Rail(_) => RowKind::Rail,
            FeedRow::ListItem(_) => RowKind::ListItem,
        }
    }

    /// Number of items carried by the row.
    pub fn len(&self) -> usize {
        match self {
            FeedRow::Carousel(items) | FeedRow::Rail(items) => items.len(),
            FeedRow::ListItem(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the row list from the three section collections.
///
/// The list collection is the backbone: without it nothing is rendered and
/// the result is empty. Carousel and rail are header rows; each is emitted
/// at most once, in that order, and only when it has items. List items
/// follow in source order.
pub fn assemble_feed<I: Clone>(
    carousel: Option<&[I]>,
    rail: Option<&[I]>,
    list: Option<&[I]>,
) -> Vec<FeedRow<I>> {
    let Some(list) = list else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(list.len() + 2);
    if let Some(items) = carousel
        && !items.is_empty()
    {
        rows.push(FeedRow::Carousel(items.to_vec()));
    }
    if let Some(items) = rail
        && !items.is_empty()
    {
        rows.push(FeedRow::Rail(items.to_vec()));
    }
    rows.extend(list.iter().cloned().map(FeedRow::ListItem));
    rows
}
