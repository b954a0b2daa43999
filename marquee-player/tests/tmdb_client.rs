use std::time::Duration;

use marquee_config::{TmdbConfig, TmdbCredentials, TrendingWindow};
use marquee_core::{MovieCatalog, TransportError};
use marquee_player::TmdbClient;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn config(server: &MockServer, credentials: Option<TmdbCredentials>) -> TmdbConfig {
    config_for(&server.uri(), credentials)
}

fn config_for(origin: &str, credentials: Option<TmdbCredentials>) -> TmdbConfig {
    TmdbConfig {
        base_url: Url::parse(&format!("{origin}/3")).unwrap(),
        image_base_url: Url::parse("https://image.tmdb.org/t/p").unwrap(),
        credentials,
        language: "ko-KR".to_string(),
        region: None,
        timeout: Duration::from_secs(5),
    }
}

fn page_body() -> serde_json::Value {
    json!({
        "page": 1,
        "results": [
            {
                "id": 693134,
                "original_title": "Dune: Part Two",
                "title": "듄: 파트 2",
                "overview": "Paul Atreides unites with Chani.",
                "vote_average": 8.2,
                "poster_path": "/8b8R8l88Qje9dn9OE8PY05Nxl1X.jpg",
                "release_date": "2024-02-27"
            }
        ],
        "total_pages": 10,
        "total_results": 200,
        "dates": { "minimum": "2024-03-01", "maximum": "2024-04-12" }
    })
}

#[tokio::test]
async fn fetches_upcoming_with_api_key() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/upcoming"))
        .and(query_param("api_key", "secret"))
        .and(query_param("language", "ko-KR"))
        .and(query_param("page", "1"))
        .and(query_param_is_missing("region"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = TmdbClient::new(
        &config(&server, Some(TmdbCredentials::ApiKey("secret".into()))),
        TrendingWindow::Week,
    )
    .unwrap();
    let page = client.upcoming().await.unwrap();

    assert_eq!(page.results().len(), 1);
    assert_eq!(page.results()[0].display_title(), "Dune: Part Two");
    assert_eq!(page.total_pages, 10);
    assert!(page.dates.is_some());
}

#[tokio::test]
async fn fetches_trending_window_with_bearer_token_and_region() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/trending/movie/day"))
        .and(header("authorization", "Bearer token"))
        .and(query_param("region", "KR"))
        .and(query_param_is_missing("api_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut tmdb = config(&server, Some(TmdbCredentials::AccessToken("token".into())));
    tmdb.region = Some("KR".into());
    let client = TmdbClient::new(&tmdb, TrendingWindow::Day).unwrap();

    assert!(client.trending().await.is_ok());
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/now_playing"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key.",
            "success": false
        })))
        .mount(&server)
        .await;

    let client = TmdbClient::new(&config(&server, None), TrendingWindow::Week).unwrap();
    let err = client.now_playing().await.unwrap_err();

    assert_eq!(
        err,
        TransportError::Status {
            status: 401,
            message: "Invalid API key: You must be granted a valid key.".into(),
        }
    );
}

#[tokio::test]
async fn malformed_json_maps_to_decode_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/upcoming"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"results\": ["))
        .mount(&server)
        .await;

    let client = TmdbClient::new(&config(&server, None), TrendingWindow::Week).unwrap();

    assert!(matches!(
        client.upcoming().await,
        Err(TransportError::Decode(_))
    ));
}

#[tokio::test]
async fn connection_failure_maps_to_network_error() {
    let Ok(listener) = std::net::TcpListener::bind("127.0.0.1:0") else {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    };
    let origin = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let tmdb = config_for(&origin, Some(TmdbCredentials::ApiKey("secret".into())));
    let client = TmdbClient::new(&tmdb, TrendingWindow::Week).unwrap();
    let err = client.upcoming().await.unwrap_err();

    let TransportError::Network(message) = &err else {
        panic!("expected a network error, got {err:?}");
    };
    assert!(!message.contains("secret"));
}
