//! Integration tests for the chromaglobe server
//!
//! These tests drive the full router in-process against a temporary asset
//! root and verify the responses end-to-end.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use chromaglobe::colormaps::VariableCategory;
use chromaglobe::geolines::{FeatureType, Resolution};
use common::assertions::{assert_approx_eq, assert_hex_color, assert_on_sphere};
use common::http::{get_bytes, get_json, post_json, post_raw, router};
use common::test_data::{
    write_coastlines_110m, write_geographic_lines, write_mismatched_lakes_50m, AssetRoot,
};

fn floats(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_heartbeat() {
    let root = AssetRoot::new();
    let (app, _) = router(root.config());

    let (status, body) = get_json(&app, "/heartbeat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["server_id"].as_str().unwrap().len() >= 32);
    assert!(body["colormaps"]["palette_count"].as_u64().unwrap() > 0);
    assert_eq!(body["layers"]["cached"], 0);
}

#[tokio::test]
async fn test_colorbar_for_dataset() {
    let root = AssetRoot::new();
    let (app, _) = router(root.config());

    let (status, body) = get_json(&app, "/colorbar?dataset=NOAA%20SST%20Monthly").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "sea_surface_temp");

    let ticks = body["ticks"].as_array().unwrap();
    assert_eq!(ticks.len(), 7);
    assert_approx_eq(ticks[0]["value"].as_f64().unwrap(), -2.0, None);
    assert_approx_eq(ticks[6]["value"].as_f64().unwrap(), 35.0, None);
    assert_eq!(ticks[0]["label"], "-2.00");
    assert_eq!(ticks[6]["label"], "35.0");
    for tick in ticks {
        assert_hex_color(tick["color"].as_str().unwrap());
    }

    // Quantized: two stops per band
    assert_eq!(body["scale"]["quantized"], true);
    assert_eq!(body["scale"]["colors"].as_array().unwrap().len(), 101);
    assert_eq!(body["gradient"]["stops"].as_array().unwrap().len(), 202);
    let css = body["gradient"]["css"].as_str().unwrap();
    assert!(css.starts_with("linear-gradient(to right, #"));
    assert!(css.ends_with("100.00%)"));
}

#[tokio::test]
async fn test_colorbar_tick_edge_cases() {
    let root = AssetRoot::new();
    let (app, _) = router(root.config());

    let (_, body) = get_json(&app, "/colorbar?category=wind&ticks=0").await;
    assert!(body["ticks"].as_array().unwrap().is_empty());

    let (_, body) = get_json(&app, "/colorbar?category=wind&ticks=1").await;
    let ticks = body["ticks"].as_array().unwrap();
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0]["value"].as_f64().unwrap(), 0.0);

    // Continuous: one stop per color
    assert_eq!(body["scale"]["quantized"], false);
    assert_eq!(body["gradient"]["stops"].as_array().unwrap().len(), 64);

    let (status, body) = get_json(&app, "/colorbar?category=volcanic").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("category"));
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_colorbar_png() {
    let root = AssetRoot::new();
    let (app, _) = router(root.config());

    let (status, bytes) = get_bytes(&app, "/colorbar.png?category=pressure&width=40&height=5").await;
    assert_eq!(status, StatusCode::OK);

    let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (40, 5));
    // Every row is identical
    assert_eq!(img.get_pixel(3, 0), img.get_pixel(3, 4));

    let (status, _) = get_bytes(&app, "/colorbar.png?width=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_colormap_resolution() {
    let root = AssetRoot::new();
    let (app, _) = router(root.config());

    let (status, body) = get_json(&app, "/colormap?name=thermal").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], "cmocean|thermal");
    assert_eq!(body["colors"].as_array().unwrap().len(), 64);

    let (_, spaced) = get_json(&app, "/colormap?name=CMOCEAN%20THERMAL").await;
    assert_eq!(spaced["matched"], "cmocean|thermal");
    assert_eq!(spaced["colors"], body["colors"]);

    // Curated override is returned as-is
    let (_, body) = get_json(&app, "/colormap?name=NCL%7CBlueWhiteOrangeRed").await;
    let colors = body["colors"].as_array().unwrap();
    assert_eq!(colors.len(), 9);
    assert_eq!(colors[0], "#08306b");
    assert_eq!(colors[8], "#7f2704");

    let (_, body) = get_json(&app, "/colormap?name=dataset-default").await;
    assert_eq!(body["colors"].as_array().unwrap().len(), 5);

    // Unknown names fall back to the viridis-like default
    let (status, body) = get_json(&app, "/colormap?name=no-such-map&stops=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["matched"].is_null());
    assert_eq!(body["colors"].as_array().unwrap().len(), 3);
    assert_eq!(body["colors"][0], "#440154");

    let (status, _) = get_json(&app, "/colormap").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_catalog_file() {
    let root = AssetRoot::new();
    let catalog = root.write(
        "/catalog.json",
        json!([
            {"FullName": "Custom|mine", "Values": ["#000000", {"Hex": "#ffffff"}]},
            {"FullName": "Broken", "Values": [42]},
            "not an entry"
        ])
        .to_string()
        .as_bytes(),
    );
    let mut config = root.config();
    config.assets.catalog_file = Some(catalog);
    let (app, state) = router(config);

    let (_, body) = get_json(&app, "/colormap?name=mine").await;
    assert_eq!(body["matched"], "Custom|mine");
    let colors = body["colors"].as_array().unwrap();
    assert_eq!(colors.len(), 64);
    assert_eq!(colors[0], "#000000");
    assert_eq!(colors[63], "#ffffff");

    // Built-ins stay resolvable
    let (_, body) = get_json(&app, "/colormap?name=coolwarm").await;
    assert_eq!(body["matched"], "coolwarm");

    // Registry palettes missing from this catalog fall back to built-in ramps
    let scale = state.registry.get_scale(VariableCategory::Humidity);
    assert_eq!(scale.colors.len(), 64);
}

#[tokio::test]
async fn test_color_mapping_endpoint() {
    let root = AssetRoot::new();
    let (app, state) = router(root.config());
    let scale = state.registry.get_scale(VariableCategory::Temperature);

    let (status, body) =
        get_json(&app, "/color?category=temperature&values=-1000,1000,nan,-inf").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scale"], scale.name.as_str());

    let first = scale.colors[0].to_hex();
    let last = scale.colors[scale.colors.len() - 1].to_hex();
    assert_eq!(body["colors"], json!([first, last, first, first]));
    assert_eq!(body["values"], json!([-1000.0, 1000.0, null, null]));

    // Edge clipping: the lowest 2% of the domain all share the first band
    let (_, body) = get_json(&app, "/color?category=temperature&values=-40,-38.5").await;
    assert_eq!(body["colors"][0], body["colors"][1]);

    let (status, _) = get_json(&app, "/color?values=1,abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_geolines_coastlines() {
    let root = AssetRoot::new();
    write_coastlines_110m(&root);
    let (app, state) = router(root.config());

    let (status, body) =
        get_json(&app, "/geolines?feature=coastlines&resolution=low&radius=1").await;
    assert_eq!(status, StatusCode::OK);

    // Polylines of 2 and 3 points give 1 + 2 edges
    assert_eq!(body["edge_count"], 3);
    let positions = floats(&body["positions"]);
    assert_eq!(positions.len(), 18);
    assert_on_sphere(&positions, 1.0, None);

    let colors = floats(&body["colors"]);
    assert_eq!(colors.len(), 18);
    assert!(colors.iter().all(|&c| c == 1.0));
    assert!(body.get("line_distances").is_none());

    assert_eq!(body["material"]["kind"], "solid");
    assert_eq!(body["material"]["depth_test"], true);
    assert_eq!(body["material"]["depth_write"], false);

    assert_eq!(state.geolines.len(), 1);
    assert_eq!(state.geolines.available_count(), 1);
}

#[tokio::test]
async fn test_geolines_dashed_geographic_ignores_resolution() {
    let root = AssetRoot::new();
    write_geographic_lines(&root);
    let (app, _) = router(root.config());

    let (status, body) = get_json(
        &app,
        "/geolines?feature=geographic&resolution=high&dashed=true&color=%23ff0000&radius=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["edge_count"], 4);
    assert!(body.get("colors").is_none());

    let material = &body["material"];
    assert_eq!(material["kind"], "dashed");
    assert_eq!(material["color"], "#ff0000");
    assert_eq!(material["dash_size"].as_f64().unwrap(), 2.0);
    assert_eq!(material["gap_size"].as_f64().unwrap(), 1.0);

    // Distances restart at zero and grow along the polyline
    let distances = floats(&body["line_distances"]);
    assert_eq!(distances.len(), 8);
    assert_eq!(distances[0], 0.0);
    assert!(distances.windows(2).all(|w| w[1] >= w[0]));

    // Equator at y = 0
    let positions = floats(&body["positions"]);
    assert!(positions.chunks(3).all(|p| p[1].abs() < 1e-4));
}

#[tokio::test]
async fn test_geolines_unavailable_layers() {
    let root = AssetRoot::new();
    write_mismatched_lakes_50m(&root);
    let (app, state) = router(root.config());

    // Missing file
    let (status, body) = get_json(&app, "/geolines?feature=rivers&resolution=low").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("rivers:low"));

    // Switched off
    let (status, _) = get_json(&app, "/geolines?feature=coastlines&resolution=none").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Lon/Lat length mismatch
    let (status, _) = get_json(&app, "/geolines?feature=lakes&resolution=medium").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(state.geolines.len(), 3);
    assert_eq!(state.geolines.available_count(), 0);

    let (status, _) = get_json(&app, "/geolines?feature=volcanoes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get_json(&app, "/geolines").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_geolines_cached_until_invalidated() {
    let root = AssetRoot::new();
    let (app, state) = router(root.config());

    // A failed load is remembered even after the file appears
    let (status, _) = get_json(&app, "/geolines?feature=coastlines").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    write_coastlines_110m(&root);
    let (status, _) = get_json(&app, "/geolines?feature=coastlines").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(state
        .geolines
        .invalidate(FeatureType::Coastlines, Resolution::Low));
    let (status, _) = get_json(&app, "/geolines?feature=coastlines").await;
    assert_eq!(status, StatusCode::OK);

    // A successful load survives the file going away
    std::fs::remove_dir_all(root.path().join("assets")).unwrap();
    let (status, body) = get_json(&app, "/geolines?feature=coastlines").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["edge_count"], 3);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_load() {
    let root = AssetRoot::new();
    write_coastlines_110m(&root);
    let (app, state) = router(root.config());

    let requests = (0..8).map(|_| get_json(&app, "/geolines?feature=coastlines&radius=5"));
    let responses = futures::future::join_all(requests).await;

    assert!(responses.iter().all(|(status, _)| *status == StatusCode::OK));
    assert!(responses.windows(2).all(|w| w[0].1 == w[1].1));
    assert_eq!(state.geolines.len(), 1);
}

#[tokio::test]
async fn test_geojson_post() {
    let root = AssetRoot::new();
    let (app, _) = router(root.config());

    let document = json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [90, 0], [180, 0]]}},
            {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 10], [10, 10], [10, 20], [0, 10]]]}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]
    });

    let (status, body) = post_json(&app, "/geojson?radius=3&color=00ff00", &document).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["edge_count"], 5);
    assert_on_sphere(&floats(&body["positions"]), 3.0, None);

    let colors = floats(&body["colors"]);
    assert_eq!(&colors[0..3], &[0.0, 1.0, 0.0]);

    let (status, _) = post_json(&app, "/geojson?color=nope", &document).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_parameters_return_json_errors() {
    let root = AssetRoot::new();
    write_coastlines_110m(&root);
    let (app, _) = router(root.config());

    for uri in [
        "/colorbar?ticks=abc",
        "/colorbar.png?width=-3",
        "/colormap?name=thermal&stops=many",
        "/geolines?feature=coastlines&dashed=yes",
        "/geolines?feature=coastlines&radius=big",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid parameter: query"), "{}", uri);
        assert!(body["request_id"].is_string(), "{}", uri);
    }

    let (status, body) = post_raw(&app, "/geojson", "application/json", "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid parameter: body"));
    assert!(body["request_id"].is_string());

    let (status, body) = post_raw(&app, "/geojson?dashed=maybe", "application/json", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid parameter: query"));
}
