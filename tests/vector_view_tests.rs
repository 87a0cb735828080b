mod common;

use common::{init_logging, RecordingPlugin, SlowClient, StubClient, SCENARIO};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tmsview::{
    constants::DEFAULT_STYLED_LAYER,
    views::vector::{BASE_LAYER_ID, OVERLAY_LAYER_ID},
    FetchState, LatLng, LayerTrait, VectorMapView, VectorTileLayer, ViewState, ViewerConfig,
};

fn view_with(plugin: Arc<RecordingPlugin>) -> VectorMapView {
    init_logging();
    VectorMapView::new(ViewerConfig::default(), plugin)
}

#[tokio::test]
async fn test_scenario_builds_map_and_overlay() {
    let plugin = Arc::new(RecordingPlugin::default());
    let client = StubClient::ok(SCENARIO);
    let mut view = view_with(plugin.clone());

    view.mount(client.clone()).unwrap();
    view.finish_fetch().await;

    assert_eq!(
        client.requests.lock().unwrap().as_slice(),
        &["http://127.0.0.1:8000/tileserver/merged_boundary.mbtiles/vector-tiles".to_string()]
    );

    let created = plugin.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].url, "http://x/{z}/{x}/{y}.pbf");
    assert_eq!((created[0].min_zoom, created[0].max_zoom), (6, 14));
    assert_eq!(created[0].attribution, "");
    assert!(created[0].styles.rule_for(DEFAULT_STYLED_LAYER).is_some());

    let ViewState::Map(map) = view.render() else {
        panic!("expected the map to render");
    };
    assert_eq!(map.initial_view(), (LatLng::new(6.15, -2.15), 6.0));
    assert_eq!(
        map.fitted_bounds().map(|b| b.to_corner_pairs()),
        Some([[6.1, -2.2], [6.2, -2.1]])
    );

    let overlay = map.get_layer_as::<VectorTileLayer>(OVERLAY_LAYER_ID).unwrap();
    assert_eq!(overlay.name(), "Vector Tiles");
    assert!(overlay.is_visible());
    assert_eq!(map.layers_control().active_base(), Some(BASE_LAYER_ID));
    assert!(map.layers_control().is_overlay_enabled(OVERLAY_LAYER_ID));
    assert!(view.overlay_error().is_none());

    let order: Vec<&str> = map.active_layers().iter().map(|l| l.id()).collect();
    assert_eq!(order, vec![BASE_LAYER_ID, OVERLAY_LAYER_ID]);
}

#[tokio::test]
async fn test_http_failure_renders_error_without_map() {
    let plugin = Arc::new(RecordingPlugin::default());
    let mut view = view_with(plugin.clone());

    view.mount(StubClient::status(404)).unwrap();
    view.finish_fetch().await;

    assert_eq!(
        view.state(),
        &FetchState::Failed("HTTP error! Status: 404".to_string())
    );
    assert!(matches!(view.render(), ViewState::Error("HTTP error! Status: 404")));
    assert!(view.map().is_none());
    assert_eq!(plugin.attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_undecodable_body_is_a_failure() {
    let mut view = view_with(Arc::new(RecordingPlugin::default()));
    view.mount(StubClient::ok("<html>not json</html>")).unwrap();
    view.finish_fetch().await;

    assert!(matches!(view.render(), ViewState::Error(_)));
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_empty_tiles_renders_map_without_overlay() {
    let plugin = Arc::new(RecordingPlugin::default());
    let mut view = view_with(plugin.clone());

    view.mount(StubClient::ok(r#"{"tiles": [], "minzoom": 3}"#)).unwrap();
    view.finish_fetch().await;

    let ViewState::Map(map) = view.render() else {
        panic!("expected the map to render");
    };
    assert!(map.get_layer(OVERLAY_LAYER_ID).is_none());
    assert!(map.get_layer(BASE_LAYER_ID).is_some());
    assert!(map.fitted_bounds().is_none());
    assert_eq!(plugin.attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_raster_template_on_raster_dataset_gets_no_overlay() {
    let plugin = Arc::new(RecordingPlugin::default());
    let config = ViewerConfig {
        vector_dataset: "orthophoto.tiff".to_string(),
        ..Default::default()
    };
    let mut view = VectorMapView::new(config, plugin.clone());

    view.mount(StubClient::ok(r#"{"tiles": ["http://x/{z}/{x}/{y}.png"]}"#))
        .unwrap();
    view.finish_fetch().await;

    assert!(matches!(view.render(), ViewState::Map(_)));
    assert!(plugin.created().is_empty());
}

#[tokio::test]
async fn test_malformed_bounds_skip_fitting() {
    let mut view = view_with(Arc::new(RecordingPlugin::default()));
    view.mount(StubClient::ok(
        r#"{"tiles": ["http://x/{z}/{x}/{y}.mvt"], "bounds": [1, 2, 3], "center": [10, 20], "minzoom": 4}"#,
    ))
    .unwrap();
    view.finish_fetch().await;

    let map = view.map().unwrap();
    assert!(map.fitted_bounds().is_none());
    assert_eq!(map.viewport.center, LatLng::new(20.0, 10.0));
    assert_eq!(map.viewport.zoom, 4.0);
}

#[tokio::test]
async fn test_construction_failure_is_stored_and_map_still_renders() {
    let plugin = RecordingPlugin::failing("vector tile support not installed");
    let mut view = view_with(plugin.clone());

    view.mount(StubClient::ok(SCENARIO)).unwrap();
    view.finish_fetch().await;

    assert!(matches!(view.render(), ViewState::Map(_)));
    assert_eq!(
        view.overlay_error().map(|e| e.to_string()),
        Some("failed to construct vector tile layer: vector tile support not installed".to_string())
    );
    assert_eq!(plugin.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_overlay_constructed_once_across_frames() {
    let plugin = Arc::new(RecordingPlugin::default());
    let client = StubClient::ok(SCENARIO);
    let mut view = view_with(plugin.clone());

    view.mount(client.clone()).unwrap();
    view.finish_fetch().await;
    for _ in 0..5 {
        view.poll();
        view.mount(client.clone()).unwrap();
        if let Some(map) = view.map_mut() {
            map.update_layers().unwrap();
        }
    }

    assert_eq!(plugin.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn test_poll_picks_up_result() {
    let mut view = view_with(Arc::new(RecordingPlugin::default()));
    view.mount(StubClient::ok(SCENARIO)).unwrap();
    assert!(matches!(view.render(), ViewState::Loading));

    let mut changed = false;
    for _ in 0..200 {
        if view.poll() {
            changed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert!(changed);
    assert!(matches!(view.render(), ViewState::Map(_)));
    assert!(view.tilejson().is_some());
}

#[tokio::test]
async fn test_unmount_cancels_in_flight_fetch() {
    let client = SlowClient::new(Duration::from_millis(300));
    let mut view = view_with(Arc::new(RecordingPlugin::default()));

    view.mount(client.clone()).unwrap();
    // let the task start and park in its sleep
    tokio::time::sleep(Duration::from_millis(50)).await;
    view.unmount();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(client.dropped.load(Ordering::SeqCst));
    assert!(!client.completed.load(Ordering::SeqCst));
    assert!(!view.poll());
    assert!(matches!(view.render(), ViewState::Empty));
}

#[tokio::test]
async fn test_dropping_view_cancels_fetch() {
    let client = SlowClient::new(Duration::from_millis(300));
    let view_client = client.clone();
    {
        let mut view = view_with(Arc::new(RecordingPlugin::default()));
        view.mount(view_client).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(client.dropped.load(Ordering::SeqCst));
    assert!(!client.completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_remount_after_unmount_fetches_again() {
    let plugin = Arc::new(RecordingPlugin::default());
    let client = StubClient::ok(SCENARIO);
    let mut view = view_with(plugin.clone());

    view.mount(client.clone()).unwrap();
    view.finish_fetch().await;
    view.unmount();
    view.mount(client.clone()).unwrap();
    view.finish_fetch().await;

    assert_eq!(client.request_count(), 2);
    assert_eq!(plugin.created().len(), 2);
}
