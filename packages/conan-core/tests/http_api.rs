//! End-to-end tests: a mocked Beefweb player behind the real engine and
//! HTTP server.

use std::net::SocketAddr;
use std::time::Duration;

use conan_core::{bootstrap_services, serve, AppState, BootstrappedServices, Config};
use serde_json::json;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn columns(artist: &str, title: &str, album: &str) -> Vec<String> {
    [artist, title, album, "4:00", "1/10", "10", "/music/a.flac"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

async fn mock_player() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "player": {
                "activeItem": {
                    "playlistId": "p1",
                    "playlistIndex": 0,
                    "index": 0,
                    "position": 1.0,
                    "duration": 240.0,
                    "columns": columns("Artist", "Song", "Album")
                },
                "playbackState": "playing",
                "volume": { "type": "db", "min": -100.0, "max": 0.0, "value": 0.0, "isMuted": false }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/playlists/p1/items/\d+:2$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playlistItems": {
                "offset": 0,
                "totalCount": 2,
                "items": [
                    { "columns": columns("Artist", "Song", "Album") },
                    { "columns": columns("Other", "Next Song", "Album") }
                ]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/artwork/p1/0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"png-bytes".to_vec()),
        )
        .mount(&server)
        .await;
    server
}

async fn start(player: &MockServer) -> (BootstrappedServices, SocketAddr) {
    let config = Config {
        api_url: format!("{}/api", player.uri()),
        poll_interval_ms: 20,
        request_timeout_ms: 1000,
        bind_port: 0,
    };
    let services = bootstrap_services(&config, tokio::runtime::Handle::current()).unwrap();
    services.start_background_tasks();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(&services);
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });
    (services, addr)
}

#[tokio::test]
async fn serves_page_and_health() {
    let player = mock_player().await;
    let (services, addr) = start(&player).await;
    let http = reqwest::Client::new();

    let page = http
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("id=\"PlaybackState\""));
    assert!(page.contains("/ws"));

    let health: serde_json::Value = http
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["client"], false);

    services.shutdown().await;
}

#[tokio::test]
async fn artwork_becomes_available_after_first_tick() {
    let player = mock_player().await;
    let (services, addr) = start(&player).await;
    let http = reqwest::Client::new();
    let url = format!("http://{}/artwork", addr);

    let mut served = None;
    for _ in 0..100 {
        let res = http.get(&url).send().await.unwrap();
        if res.status() == reqwest::StatusCode::OK {
            served = Some(res);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let res = served.expect("artwork never became available");
    assert_eq!(res.headers()["content-type"], "image/png");
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"png-bytes");

    services.shutdown().await;
}

#[tokio::test]
async fn control_routes_forward_to_player() {
    let player = mock_player().await;
    Mock::given(method("POST"))
        .and(path("/api/player/pause/toggle"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&player)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/player/next"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&player)
        .await;

    let (services, addr) = start(&player).await;
    let http = reqwest::Client::new();

    for route in ["toggle", "next"] {
        let res = http
            .post(format!("http://{}/api/player/{}", addr, route))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::ACCEPTED);
    }

    // Intents are dispatched asynchronously
    let mut forwarded = 0;
    for _ in 0..100 {
        let requests = player.received_requests().await.unwrap_or_default();
        forwarded = requests
            .iter()
            .filter(|r| r.method.as_str() == "POST")
            .count();
        if forwarded == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(forwarded, 2);

    services.shutdown().await;
}

#[tokio::test]
async fn control_routes_report_stopped_engine() {
    let player = mock_player().await;
    let (services, addr) = start(&player).await;
    services.shutdown().await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/api/player/stop", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "service_unavailable");
}
