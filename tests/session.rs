use std::fs;

use desk_wm::actor::input::{PointerEvent, PointerTarget, ResizeEdges};
use desk_wm::actor::reactor::{Reactor, Record};
use desk_wm::common::config::Config;
use desk_wm::layout_engine::snap::SnapEdge;
use desk_wm::model::store::{FileStore, LayoutStore, MemoryStore};
use desk_wm::model::{Arrangement, LifecycleState, PlacementState, WindowId};
use desk_wm::sys::geometry::{Rect, Size};
use pretty_assertions::assert_eq;

fn session(store: Box<dyn LayoutStore>) -> Reactor {
    Reactor::new(Config::default(), Size::new(1200.0, 800.0), store, Record::disabled())
}

fn frame(reactor: &Reactor, id: WindowId) -> Rect { reactor.registry().get(id).unwrap().frame }

fn z_order(reactor: &Reactor, id: WindowId) -> u64 { reactor.registry().get(id).unwrap().z_order }

fn drag_header(reactor: &mut Reactor, id: WindowId, from: (f64, f64), to: (f64, f64)) {
    reactor.pointer(PointerEvent::down(PointerTarget::Header(id), from.0, from.1, 0));
    reactor.pointer(PointerEvent::moved(to.0, to.1, 100));
    reactor.pointer(PointerEvent::up(to.0, to.1, 200));
}

#[test]
fn grid_tiles_the_area_without_overlap() {
    for n in 1..=10usize {
        let mut reactor = session(Box::new(MemoryStore::new()));
        let ids: Vec<WindowId> =
            (0..n).map(|i| reactor.open_window(format!("w{i}"), "panel")).collect();
        reactor.apply_template("grid");

        let cols = (n as f64).sqrt().ceil() as usize;
        let frames: Vec<Rect> = ids.iter().map(|&id| frame(&reactor, id)).collect();
        let mut xs: Vec<f64> = frames.iter().map(|r| r.x).collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        assert_eq!(xs.len(), cols, "{n} windows");

        for (i, a) in frames.iter().enumerate() {
            assert!(reactor.registry().bounds().inset(-1e-6).contains(a));
            for b in &frames[i + 1..] {
                assert!(!a.overlaps(b), "{n} windows: {a:?} overlaps {b:?}");
            }
        }
        assert_eq!(frames[0].x, 8.0);
        let right = frames.iter().map(|r| r.max_x()).fold(0.0, f64::max);
        assert!((right - 1192.0).abs() < 1e-9, "{n} windows end at {right}");
    }
}

#[test]
fn three_window_grid_matches_the_worked_example() {
    let mut reactor = session(Box::new(MemoryStore::new()));
    let ids: Vec<WindowId> = ["a", "b", "c"].iter().map(|t| reactor.open_window(*t, *t)).collect();
    reactor.apply_template("grid");

    assert_eq!(frame(&reactor, ids[0]), Rect::new(8.0, 8.0, 588.0, 388.0));
    assert_eq!(frame(&reactor, ids[1]), Rect::new(604.0, 8.0, 588.0, 388.0));
    assert_eq!(frame(&reactor, ids[2]), Rect::new(8.0, 404.0, 588.0, 388.0));
}

#[test]
fn every_template_is_idempotent() {
    let mut reactor = session(Box::new(MemoryStore::new()));
    for title in ["a", "b", "c", "d", "e"] {
        reactor.open_window(title, title);
    }
    for name in ["grid", "cascade", "vertical", "horizontal", "masterStack", "mosaic", "focus"] {
        reactor.apply_template(name);
        let first = reactor.query_windows();
        reactor.apply_template(name);
        assert_eq!(reactor.query_windows(), first, "{name}");
    }
}

#[test]
fn focus_raises_strictly_and_unminimizes() {
    let mut reactor = session(Box::new(MemoryStore::new()));
    let a = reactor.open_window("a", "a");
    let b = reactor.open_window("b", "b");
    let c = reactor.open_window("c", "c");

    reactor.focus_window(a);
    assert!(z_order(&reactor, a) > z_order(&reactor, b));
    assert!(z_order(&reactor, a) > z_order(&reactor, c));

    let top = z_order(&reactor, a);
    reactor.focus_window(a);
    assert_eq!(z_order(&reactor, a), top);

    reactor.minimize_window(a);
    reactor.focus_window(a);
    assert_eq!(z_order(&reactor, a), top);
    assert_eq!(reactor.registry().get(a).unwrap().lifecycle, LifecycleState::Normal);
}

#[test]
fn left_snap_ignores_the_pre_drag_size() {
    let mut reactor = session(Box::new(MemoryStore::new()));
    let a = reactor.open_window("a", "a");
    let b = reactor.open_window("b", "b");

    let handle = PointerTarget::ResizeHandle(b, ResizeEdges::RIGHT | ResizeEdges::BOTTOM);
    reactor.pointer(PointerEvent::down(handle, 678.0, 518.0, 0));
    reactor.pointer(PointerEvent::moved(438.0, 338.0, 10));
    reactor.pointer(PointerEvent::up(438.0, 338.0, 20));
    assert_eq!(frame(&reactor, b), Rect::new(38.0, 38.0, 400.0, 300.0));

    drag_header(&mut reactor, a, (100.0, 20.0), (50.0, 200.0));
    drag_header(&mut reactor, b, (100.0, 50.0), (40.0, 300.0));

    let half = Rect::new(8.0, 8.0, (1200.0 - 3.0 * 8.0) / 2.0, 784.0);
    assert_eq!(frame(&reactor, a), half);
    assert_eq!(frame(&reactor, b), half);
}

#[test]
fn top_left_corner_snaps_to_a_quarter() {
    let mut reactor = session(Box::new(MemoryStore::new()));
    let a = reactor.open_window("a", "a");
    drag_header(&mut reactor, a, (100.0, 20.0), (95.0, 15.0));
    assert_eq!(frame(&reactor, a), Rect::new(8.0, 8.0, 592.0, 392.0));
    assert_eq!(
        reactor.registry().get(a).unwrap().placement,
        PlacementState::Snapped(SnapEdge::TopLeft)
    );
}

#[test]
fn closed_window_leaves_its_group_and_ignores_focus() {
    let mut reactor = session(Box::new(MemoryStore::new()));
    let a = reactor.open_window("a", "a");
    let b = reactor.open_window("b", "b");
    let c = reactor.open_window("c", "c");
    let group = reactor.create_group(&[a, b, c], Arrangement::Stack).unwrap();

    reactor.close_window(b);
    assert_eq!(reactor.groups().get(group).unwrap().members, vec![a, c]);
    assert!(reactor.registry().get(b).is_none());

    let active = reactor.registry().active();
    reactor.focus_window(b);
    assert_eq!(reactor.registry().active(), active);
    reactor.close_window(b);
    assert_eq!(reactor.registry().len(), 2);
}

#[test]
fn arranging_a_group_leaves_other_windows_alone() {
    let mut reactor = session(Box::new(MemoryStore::new()));
    let a = reactor.open_window("a", "a");
    let b = reactor.open_window("b", "b");
    let outsider = reactor.open_window("c", "c");
    let before = frame(&reactor, outsider);

    let group = reactor.create_group(&[a, b], Arrangement::Tiles).unwrap();
    reactor.set_group_arrangement(group, Arrangement::Stack);
    reactor.set_group_arrangement(group, Arrangement::Tabs);
    assert_eq!(frame(&reactor, outsider), before);
}

#[test]
fn named_layouts_survive_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let saved = {
        let mut reactor = session(Box::new(FileStore::new(dir.path())));
        let editor = reactor.open_window("editor", "editor");
        let term = reactor.open_window("terminal", "terminal");
        reactor.apply_template("grid");
        reactor.float();
        drag_header(&mut reactor, term, (300.0, 20.0), (500.0, 300.0));
        reactor.save_named_layout("coding");
        (frame(&reactor, editor), frame(&reactor, term))
    };

    let mut reactor = session(Box::new(FileStore::new(dir.path())));
    let editor = reactor.open_window("editor", "editor");
    let term = reactor.open_window("terminal", "terminal");
    assert!(reactor.preferences().custom_layouts.contains_key("coding"));

    reactor.load_named_layout("coding");
    assert_eq!((frame(&reactor, editor), frame(&reactor, term)), saved);
}

#[test]
fn corrupted_preferences_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("desk.layout.json"), "{ not json").unwrap();

    let mut reactor = session(Box::new(FileStore::new(dir.path())));
    assert!(!reactor.is_tiling());
    assert!(reactor.preferences().snap_enabled);
    assert_eq!(reactor.preferences().snap_threshold, 20.0);

    reactor.apply_template("horizontal");
    let stored = fs::read_to_string(dir.path().join("desk.layout.json")).unwrap();
    assert!(stored.contains("\"activeTemplate\":\"horizontal\""), "{stored}");
}
