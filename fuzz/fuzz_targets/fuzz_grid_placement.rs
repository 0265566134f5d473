#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilegrid_core::geometry::{Point, Size};
use tilegrid_layout::{
    DashboardPanel, GridConfig, InteractionController, NullCapture, PressPart,
    TileConstraints, TileGeometry, TileId, TileInputEvent,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Add { id: u8, x: i8, y: i8, w: i8, h: i8 },
    Remove { id: u8 },
    SetGeometry { id: u8, x: i8, y: i8, w: i8, h: i8 },
    SetGrid { columns: u8, rows: u8 },
    Arrange { width: u16, height: u16 },
    Press { id: u8, resize: bool, pointer: u8, x: i16, y: i16 },
    Move { pointer: u8, x: i16, y: i16 },
    Release { pointer: u8, x: i16, y: i16 },
    CaptureLost { pointer: u8 },
}

fn tile(id: u8) -> Option<TileId> {
    TileId::new(u64::from(id)).ok()
}

fn geometry(x: i8, y: i8, w: i8, h: i8) -> TileGeometry {
    TileGeometry::new(i32::from(x), i32::from(y), i32::from(w), i32::from(h))
}

fn point(x: i16, y: i16) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

fuzz_target!(|ops: Vec<Op>| {
    let mut panel = DashboardPanel::new(GridConfig::default());
    let mut controller = InteractionController::new();
    let mut capture = NullCapture;
    let mut last_transition = 0u64;

    for op in ops.into_iter().take(256) {
        match op {
            Op::Add { id, x, y, w, h } => {
                if let Some(id) = tile(id) {
                    let _ = panel.add_tile(id, geometry(x, y, w, h), TileConstraints::default());
                }
            }
            Op::Remove { id } => {
                if let Some(id) = tile(id) {
                    let _ = controller.remove_tile(&mut panel, &mut capture, id);
                }
            }
            Op::SetGeometry { id, x, y, w, h } => {
                if let Some(id) = tile(id) {
                    let _ = panel.set_geometry(id, geometry(x, y, w, h));
                }
            }
            Op::SetGrid { columns, rows } => {
                panel.set_grid(u16::from(columns % 24), u16::from(rows % 24));
            }
            Op::Arrange { width, height } => {
                let outcome = panel.arrange(Size::new(f64::from(width), f64::from(height)));
                let dims = panel.dims();
                let placed: Vec<_> = outcome
                    .tiles
                    .iter()
                    .filter_map(|t| t.cell.map(|cell| (t.tile, cell)))
                    .collect();
                for (i, (id, a)) in placed.iter().enumerate() {
                    assert!(dims.contains(a), "{id} out of bounds: {a:?}");
                    assert_eq!(panel.committed(*id), Some(*a), "commit diverged for {id}");
                    for (_, b) in &placed[i + 1..] {
                        assert!(!a.intersects(b), "overlap: {a:?} {b:?}");
                    }
                }
                assert!(!panel.needs_arrange());
            }
            Op::Press { id, resize, pointer, x, y } => {
                if let Some(id) = tile(id) {
                    let part = if resize {
                        PressPart::ResizeHandle
                    } else {
                        PressPart::Body
                    };
                    let event =
                        TileInputEvent::press(id, part, u32::from(pointer % 4), point(x, y));
                    let t = controller.apply_event(&mut panel, &mut capture, &event);
                    assert!(t.transition_id > last_transition);
                    last_transition = t.transition_id;
                }
            }
            Op::Move { pointer, x, y } => {
                let event = TileInputEvent::moved(u32::from(pointer % 4), point(x, y));
                let t = controller.apply_event(&mut panel, &mut capture, &event);
                assert!(t.transition_id > last_transition);
                last_transition = t.transition_id;
            }
            Op::Release { pointer, x, y } => {
                let event = TileInputEvent::released(u32::from(pointer % 4), point(x, y));
                let t = controller.apply_event(&mut panel, &mut capture, &event);
                assert!(t.transition_id > last_transition);
                last_transition = t.transition_id;
            }
            Op::CaptureLost { pointer } => {
                let event = TileInputEvent::capture_lost(u32::from(pointer % 4));
                let t = controller.apply_event(&mut panel, &mut capture, &event);
                assert!(t.transition_id > last_transition);
                last_transition = t.transition_id;
            }
        }
        assert!(controller.active_sessions() <= panel.len());
    }
});
