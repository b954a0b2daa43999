mod support;

use std::sync::Arc;

use futures::FutureExt;
use marquee_core::{FeedRow, MoviesScreen, RowKind, ScreenView, Section};
use support::{FakeCatalog, offline, page};

fn kinds(view: &ScreenView) -> Vec<RowKind> {
    view.rows().iter().map(FeedRow::kind).collect()
}

fn script_defaults(catalog: &FakeCatalog) {
    catalog
        .now_playing
        .push_ok(page(&[(1, "Dune: Part Two"), (2, "Civil War")]));
    catalog.trending.push_ok(page(&[(3, "Inside Out 2")]));
    catalog
        .upcoming
        .push_ok(page(&[(4, "Alien: Romulus"), (5, "Joker: Folie à Deux")]));
}

#[tokio::test]
async fn mount_renders_carousel_rail_then_list() {
    let catalog = FakeCatalog::open();
    script_defaults(&catalog);
    let screen = MoviesScreen::new(catalog.clone());
    assert!(screen.view().is_loading());

    screen.mount().await;

    let view = screen.view();
    assert_eq!(
        kinds(&view),
        vec![
            RowKind::Carousel,
            RowKind::Rail,
            RowKind::ListItem,
            RowKind::ListItem
        ]
    );
    let FeedRow::ListItem(first) = &view.rows()[2] else {
        panic!("expected a list item, got {:?}", view.rows()[2]);
    };
    assert_eq!(first.display_title(), "Alien: Romulus");
    assert!(!view.is_refreshing());
}

#[tokio::test]
async fn stays_loading_while_any_section_is_pending() {
    let catalog = FakeCatalog::gated();
    script_defaults(&catalog);
    let screen = MoviesScreen::new(catalog.clone());

    let mount = screen.mount();
    catalog.now_playing.release(1);
    catalog.trending.release(1);
    screen
        .coordinator()
        .ensure_fetched(&Section::Trending.key())
        .await
        .unwrap();
    screen
        .coordinator()
        .ensure_fetched(&Section::NowPlaying.key())
        .await
        .unwrap();

    assert!(screen.loading());
    assert_eq!(screen.view(), ScreenView::Loading);

    catalog.upcoming.release(1);
    mount.await;
    assert!(!screen.view().is_loading());
}

#[tokio::test]
async fn mounting_twice_fetches_each_section_once() {
    let catalog = FakeCatalog::gated();
    script_defaults(&catalog);
    let screen = MoviesScreen::new(catalog.clone());

    let first = screen.mount();
    let second = screen.mount();
    catalog.release_all();
    futures::join!(first, second);

    assert_eq!(catalog.now_playing.calls(), 1);
    assert_eq!(catalog.trending.calls(), 1);
    assert_eq!(catalog.upcoming.calls(), 1);
}

#[tokio::test]
async fn failed_rail_is_omitted_without_blocking_the_screen() {
    let catalog = FakeCatalog::open();
    catalog.now_playing.push_ok(page(&[(1, "Dune: Part Two")]));
    catalog.trending.push_err(offline());
    catalog.upcoming.push_ok(page(&[(4, "Alien: Romulus")]));
    let screen = MoviesScreen::new(catalog.clone());

    screen.mount().await;

    let view = screen.view();
    assert!(!screen.loading());
    assert_eq!(kinds(&view), vec![RowKind::Carousel, RowKind::ListItem]);
    assert_eq!(screen.error(Section::Trending), Some(offline()));
}

#[tokio::test]
async fn failed_list_renders_no_rows() {
    let catalog = FakeCatalog::open();
    catalog.now_playing.push_ok(page(&[(1, "Dune: Part Two")]));
    catalog.trending.push_ok(page(&[(3, "Inside Out 2")]));
    catalog.upcoming.push_err(offline());
    let screen = MoviesScreen::new(catalog.clone());

    screen.mount().await;

    let view = screen.view();
    assert!(!view.is_loading());
    assert!(view.rows().is_empty());
}

#[tokio::test]
async fn refresh_keeps_rows_visible_and_flags_refreshing() {
    let catalog = FakeCatalog::gated();
    script_defaults(&catalog);
    catalog.now_playing.push_ok(page(&[(6, "Furiosa")]));
    catalog.trending.push_ok(page(&[(7, "Twisters")]));
    catalog.upcoming.push_ok(page(&[(8, "Wicked")]));
    let screen = MoviesScreen::new(catalog.clone());
    catalog.release_all();
    screen.mount().await;
    let before = screen.view();

    let refresh = screen.refresh();
    let during = screen.view();
    assert!(during.is_refreshing());
    assert_eq!(during.rows(), before.rows());

    catalog.release_all();
    let report = refresh.await;
    assert!(report.all_succeeded());

    let after = screen.view();
    assert!(!after.is_refreshing());
    assert_eq!(kinds(&after), vec![RowKind::Carousel, RowKind::Rail, RowKind::ListItem]);
    let FeedRow::ListItem(movie) = &after.rows()[2] else {
        panic!("expected a list item");
    };
    assert_eq!(movie.display_title(), "Wicked");
}

#[tokio::test]
async fn refresh_retries_a_failed_section() {
    let catalog = FakeCatalog::open();
    catalog.now_playing.push_ok(page(&[(1, "Dune: Part Two")]));
    catalog.trending.push_err(offline());
    catalog.upcoming.push_ok(page(&[(4, "Alien: Romulus")]));
    let screen = MoviesScreen::new(catalog.clone());
    screen.mount().await;

    catalog.now_playing.push_ok(page(&[(1, "Dune: Part Two")]));
    catalog.trending.push_ok(page(&[(3, "Inside Out 2")]));
    catalog.upcoming.push_ok(page(&[(4, "Alien: Romulus")]));
    screen.refresh().await;

    assert_eq!(
        kinds(&screen.view()),
        vec![RowKind::Carousel, RowKind::Rail, RowKind::ListItem]
    );
    assert!(screen.error(Section::Trending).is_none());
}

#[tokio::test]
async fn unmount_drops_the_sections() {
    let catalog = FakeCatalog::open();
    script_defaults(&catalog);
    let screen = MoviesScreen::new(catalog.clone());
    screen.mount().await;
    let coordinator = screen.coordinator().clone();

    screen.unmount();

    assert!(coordinator.is_empty());
}

#[tokio::test]
async fn sections_share_a_coordinator_across_screens() {
    let catalog = FakeCatalog::open();
    script_defaults(&catalog);
    let first = MoviesScreen::new(catalog.clone());
    first.mount().await;

    let second = MoviesScreen::with_coordinator(
        Arc::clone(&catalog) as Arc<dyn marquee_core::MovieCatalog>,
        first.coordinator().clone(),
    );
    second.mount().await;

    assert_eq!(second.view(), first.view());
    assert_eq!(catalog.upcoming.calls(), 1);
}

#[tokio::test]
async fn mount_during_refresh_does_not_wait_for_it() {
    let catalog = FakeCatalog::gated();
    script_defaults(&catalog);
    let screen = MoviesScreen::new(catalog.clone());
    catalog.release_all();
    screen.mount().await;

    let refresh = screen.refresh();
    assert!(screen.mount().now_or_never().is_some());
    assert!(screen.view().is_refreshing());

    catalog.release_all();
    refresh.await;
}

#[tokio::test]
async fn remount_while_loading_reuses_the_pending_fetches() {
    let catalog = FakeCatalog::gated();
    script_defaults(&catalog);
    let first = MoviesScreen::new(catalog.clone());
    let coordinator = first.coordinator().clone();
    let abandoned = first.mount();
    first.unmount();

    let second = MoviesScreen::with_coordinator(
        Arc::clone(&catalog) as Arc<dyn marquee_core::MovieCatalog>,
        coordinator,
    );
    let mount = second.mount();
    catalog.release_all();
    futures::join!(abandoned, mount);

    assert_eq!(catalog.now_playing.calls(), 1);
    assert_eq!(catalog.trending.calls(), 1);
    assert_eq!(catalog.upcoming.calls(), 1);
    assert_eq!(kinds(&second.view()).len(), 4);
}
