use layerview::{
    layers::sync::LayerSynchronizer, LayerDescriptor, LayerRegistry, LayerStack, MapError,
    MapSurface, Point, PopupState, ViewerSession, WmsLayer,
};
use serde_json::json;

fn session() -> ViewerSession {
    ViewerSession::new(LayerRegistry::default())
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

fn selected(session: &ViewerSession) -> Vec<String> {
    sorted(
        session
            .selection()
            .selected_ids()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

#[test]
fn test_nothing_is_attached_initially() {
    let session = session();
    let mut stack = LayerStack::new();

    let report = session.sync(&mut stack);
    assert!(report.is_noop());
    assert!(stack.is_empty());
    assert!(session.selection().selected_ids().is_empty());
}

#[test]
fn test_toggling_gov_attaches_its_wms_layer() {
    let mut session = session();
    let mut stack = LayerStack::new();

    let report = session.toggle_layer("gov", &mut stack).unwrap();
    assert_eq!(report.attached, vec!["gov"]);

    let layer = stack.get_layer("gov").unwrap();
    assert_eq!(layer.source().remote_name(), "gov");
    assert_eq!(layer.source().endpoint().as_str(), "http://10.100.100.106:8051/geoserver/gov/wms");

    let report = session.toggle_layer("gov", &mut stack).unwrap();
    assert_eq!(report.detached, vec!["gov"]);
    assert!(stack.is_empty());
}

#[test]
fn test_surface_matches_selection_after_every_toggle() {
    let mut session = session();
    let mut stack = LayerStack::new();
    let toggles = [
        "gov", "sec", "ssec", "gov", "totalM", "roadsUpdate", "sec", "country", "totalM", "gov",
    ];

    for id in toggles {
        session.toggle_layer(id, &mut stack).unwrap();
        assert_eq!(sorted(stack.attached_ids()), selected(&session), "after toggling {}", id);
    }
}

#[test]
fn test_sync_is_idempotent() {
    let mut session = session();
    let mut stack = LayerStack::new();
    session.toggle_layer("sec", &mut stack).unwrap();
    session.toggle_layer("waterbodyPoly", &mut stack).unwrap();
    let before = stack.attached_ids();

    let report = session.sync(&mut stack);
    assert!(report.is_noop());
    assert_eq!(stack.attached_ids(), before);
}

/// Surface that accepts any attach, duplicates included, so only the
/// synchronizer's own checks keep the stack clean.
#[derive(Default)]
struct PermissiveSurface {
    layers: Vec<WmsLayer>,
}

impl PermissiveSurface {
    fn count(&self, id: &str) -> usize {
        self.layers.iter().filter(|layer| layer.id() == id).count()
    }
}

impl MapSurface for PermissiveSurface {
    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id() == id)
    }

    fn attached_ids(&self) -> Vec<String> {
        self.layers.iter().map(|layer| layer.id().to_string()).collect()
    }

    fn attach(&mut self, layer: WmsLayer) -> layerview::Result<()> {
        self.layers.push(layer);
        Ok(())
    }

    fn detach(&mut self, id: &str) -> layerview::Result<Option<WmsLayer>> {
        Ok(self
            .layers
            .iter()
            .position(|layer| layer.id() == id)
            .map(|index| self.layers.remove(index)))
    }
}

#[test]
fn test_off_on_toggling_attaches_gov_once() {
    let mut session = session();
    let mut surface = PermissiveSurface::default();

    for expected in [1, 0, 1, 0, 1] {
        let report = session.toggle_layer("gov", &mut surface).unwrap();
        assert!(report.failed.is_empty(), "{:?}", report.failed);
        assert_eq!(surface.count("gov"), expected);
    }
    assert_eq!(surface.attached_ids(), vec!["gov"]);
}

#[test]
fn test_repeated_syncs_never_duplicate_layers() {
    let mut session = session();
    let mut surface = PermissiveSurface::default();
    session.toggle_layer("gov", &mut surface).unwrap();
    session.toggle_layer("sec", &mut surface).unwrap();

    for _ in 0..5 {
        let report = session.sync(&mut surface);
        assert!(report.is_noop(), "{:?}", report);
    }

    assert_eq!(surface.count("gov"), 1);
    assert_eq!(surface.count("sec"), 1);
    assert_eq!(surface.attached_ids(), vec!["gov", "sec"]);
}

#[test]
fn test_layers_attached_elsewhere_are_reconciled() {
    let session = session();
    let mut stack = LayerStack::new();
    let registry = LayerRegistry::default();

    // attached behind the session's back; none of them are selected
    stack
        .attach(WmsLayer::from_descriptor(registry.get("gov").unwrap()).unwrap())
        .unwrap();
    let stray = LayerDescriptor::new("scratch", "", "http://localhost/wms", "scratch");
    stack.attach(WmsLayer::from_descriptor(&stray).unwrap()).unwrap();

    let report = session.sync(&mut stack);
    assert_eq!(sorted(report.detached), vec!["gov", "scratch"]);
    assert!(stack.is_empty());
}

fn flaky_factory(descriptor: &LayerDescriptor) -> layerview::Result<WmsLayer> {
    if descriptor.id == "sec" {
        return Err(MapError::Layer("sec is unreachable".to_string()));
    }
    WmsLayer::from_descriptor(descriptor)
}

#[test]
fn test_attach_failure_does_not_block_other_layers() {
    let mut session = ViewerSession::with_synchronizer(
        LayerRegistry::default(),
        LayerSynchronizer::with_factory(flaky_factory),
    );
    let mut stack = LayerStack::new();

    let report = session.toggle_layer("sec", &mut stack).unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "sec");
    assert!(stack.is_empty());

    // still selected, so the next reconciliation retries it and carries on
    let report = session.toggle_layer("gov", &mut stack).unwrap();
    assert_eq!(report.attached, vec!["gov"]);
    assert_eq!(report.failed.len(), 1);
    assert!(session.selection().is_selected("sec"));
}

#[test]
fn test_unknown_layer_is_rejected_without_side_effects() {
    let mut session = session();
    let mut stack = LayerStack::new();

    let err = session.toggle_layer("atlantis", &mut stack).unwrap_err();
    assert!(matches!(err, MapError::UnknownLayer(id) if id == "atlantis"));
    assert!(session.selection().selected_ids().is_empty());
    assert!(stack.is_empty());
}

#[test]
fn test_last_click_wins() {
    let mut session = session();
    let first = session.click(Point::new(100.0, 100.0));
    let second = session.click(Point::new(200.0, 200.0));

    let late = serde_json::from_value(json!({ "seragid": "second" })).unwrap();
    assert!(session.complete_fetch(second.token, Ok(Some(late))));

    let stale = serde_json::from_value(json!({ "seragid": "first" })).unwrap();
    assert!(!session.complete_fetch(first.token, Ok(Some(stale))));

    let state = session.popup_state();
    assert_eq!(state.anchor(), Some(Point::new(200.0, 200.0)));
    assert_eq!(
        state.record().and_then(|r| r.display_value("seragid")),
        Some("second".to_string())
    );
}

#[test]
fn test_empty_lookup_shows_empty_popup_at_click() {
    let mut session = session();
    let ticket = session.click(Point::new(3_477_000.0, 3_510_000.0));
    session.complete_fetch(ticket.token, Ok(None));

    assert!(matches!(
        session.popup_state(),
        PopupState::ShownEmpty { anchor, .. } if *anchor == Point::new(3_477_000.0, 3_510_000.0)
    ));
}

#[test]
fn test_closing_hides_and_ignores_late_result() {
    let mut session = session();
    let ticket = session.click(Point::new(1.0, 1.0));
    session.close_popup();
    assert!(!session.complete_fetch(ticket.token, Ok(None)));
    assert_eq!(session.popup_state(), &PopupState::Hidden);
}
