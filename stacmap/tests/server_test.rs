//! Handler tests against a loopback fake catalog.

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, test, web};
use pretty_assertions::assert_eq;
use serde_json::Value;
use stacmap::config::{CatalogConfig, Config, ServerState};
use stacmap::srv::router;

async fn upstream_collections() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "collections": [
            {
                "id": "demo",
                "title": "Vegetation layer",
                "description": "Vegetation footprints",
                "extent": {
                    "spatial": {"bbox": [[-139.0, 48.0, -114.0, 60.0]]},
                    "temporal": {"interval": [["2019-01-01T00:00:00Z", null]]}
                },
                "links": [{"rel": "items", "href": "ignored"}]
            },
            {"id": "bare"}
        ],
        "links": []
    }))
}

async fn upstream_collection(path: web::Path<String>) -> HttpResponse {
    if path.as_str() == "demo" {
        HttpResponse::Ok().json(serde_json::json!({
            "id": "demo",
            "title": "Vegetation layer",
            "extent": {"spatial": {"bbox": [[-139.0, 48.0, -114.0, 60.0]]}},
            "license": "OGL-BC"
        }))
    } else {
        HttpResponse::NotFound().finish()
    }
}

async fn upstream_items(path: web::Path<String>) -> HttpResponse {
    if path.as_str() != "demo" {
        return HttpResponse::NotFound().finish();
    }
    let feature = |id: &str, datetime: &str, west: f64| {
        serde_json::json!({
            "type": "Feature",
            "id": id,
            "collection": "demo",
            "bbox": [west, 50.0, west + 2.0, 52.0],
            "properties": {"datetime": datetime, "title": format!("Scene {id}")},
            "links": [{"rel": "self", "href": format!("https://x/items/{id}")}]
        })
    };
    HttpResponse::Ok().json(serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            feature("s1", "2021-06-01T10:00:00Z", -130.0),
            feature("s2", "2021-06-15T10:00:00Z", -127.0),
            feature("s3", "2021-07-01T10:00:00Z", -120.0),
        ],
        "links": []
    }))
}

/// Starts the fake catalog on a random loopback port, returns server state
/// pointed at it.
fn upstream_state() -> ServerState {
    let server = HttpServer::new(|| {
        App::new()
            .route("/collections", web::get().to(upstream_collections))
            .route("/collections/{id}", web::get().to(upstream_collection))
            .route("/collections/{id}/items", web::get().to(upstream_items))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind loopback");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    let config = Config {
        catalog: CatalogConfig {
            url: Some(format!("http://{addr}/")),
            ..CatalogConfig::default()
        },
        ..Config::default()
    };
    config.resolve().expect("resolve state")
}

macro_rules! viewer_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new($state))
                .configure(router),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_health_and_index() {
    let app = viewer_app!(upstream_state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(String::from_utf8_lossy(&body).contains("stacmap server is running"));
}

#[actix_rt::test]
async fn test_collection_cards() {
    let app = viewer_app!(upstream_state());

    let json: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/collections").to_request(),
    )
    .await;

    let cards = json["collections"].as_array().expect("cards");
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["id"], "demo");
    assert_eq!(cards[0]["title"], "Vegetation layer");
    assert_eq!(cards[0]["temporal_start"], "2019-01-01T00:00:00Z");
    assert_eq!(cards[0]["map_path"], "/api/map?collectionID=demo");
    // optional fields of the bare collection are omitted, not null
    assert!(cards[1].get("title").is_none());
}

#[actix_rt::test]
async fn test_single_collection_passthrough() {
    let app = viewer_app!(upstream_state());

    let json: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/collections/demo")
            .to_request(),
    )
    .await;
    assert_eq!(json["title"], "Vegetation layer");
    // fields outside the model survive the round trip
    assert_eq!(json["license"], "OGL-BC");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/collections/missing")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_aggregated_item_feed() {
    let app = viewer_app!(upstream_state());

    let json: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/collections/demo/items?limit=10")
            .to_request(),
    )
    .await;

    assert_eq!(json["type"], "FeatureCollection");
    assert_eq!(json["numberReturned"], 3);
    let ids: Vec<&str> = json["features"]
        .as_array()
        .expect("features")
        .iter()
        .map(|f| f["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, ["s1", "s2", "s3"]);
}

#[actix_rt::test]
async fn test_item_feed_rejects_bad_dates() {
    let app = viewer_app!(upstream_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/collections/demo/items?start_date=junk")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_map_placeholder_without_collection() {
    let app = viewer_app!(upstream_state());

    let json: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/map").to_request())
            .await;

    assert_eq!(json["label"], "STAC Browser");
    assert_eq!(json["features"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["viewport"]["max_bounds"], serde_json::json!([-150.0, 40.0, -100.0, 65.0]));
}

#[actix_rt::test]
async fn test_map_bootstrap() {
    let app = viewer_app!(upstream_state());

    let json: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/map?collectionID=demo")
            .to_request(),
    )
    .await;

    assert_eq!(json["label"], "Vegetation layer");
    assert_eq!(
        json["viewport"]["home"],
        serde_json::json!([-139.0, 48.0, -114.0, 60.0])
    );

    let features = json["features"].as_array().expect("features");
    assert_eq!(features.len(), 3);
    for feature in features {
        assert_eq!(feature["style"], "default");
        assert_eq!(feature["interactive"], true);
    }
    assert_eq!(json["palette"]["selected"]["fillColor"], "#FF0000");
}

#[actix_rt::test]
async fn test_map_bootstrap_with_date_filter() {
    let app = viewer_app!(upstream_state());

    let json: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/map?collectionID=demo&start_date=2021-06-01&end_date=2021-06-30")
            .to_request(),
    )
    .await;

    let styles: Vec<(&str, &str)> = json["features"]
        .as_array()
        .expect("features")
        .iter()
        .map(|f| {
            (
                f["feature"]["id"].as_str().expect("id"),
                f["style"].as_str().expect("style"),
            )
        })
        .collect();
    assert_eq!(
        styles,
        [("s1", "default"), ("s2", "default"), ("s3", "disabled")]
    );
}

#[actix_rt::test]
async fn test_map_degrades_when_upstream_fails() {
    let app = viewer_app!(upstream_state());

    let json: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/map?collectionID=missing")
            .to_request(),
    )
    .await;

    // the page stays usable: base viewport, no geometries
    assert_eq!(json["label"], "missing");
    assert!(json.get("collection").is_none());
    assert_eq!(json["features"].as_array().map(Vec::len), Some(0));
}
