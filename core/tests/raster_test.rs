use sbrkout_core::core::component::Component;
use sbrkout_core::device::raster::{RasterGenerator, RasterPosition, RasterTiming};

const TIMING: RasterTiming = RasterTiming {
    h_total: 384,
    h_active: 256,
    h_sync_start: 280,
    h_sync_end: 312,
    v_total: 262,
    v_active: 224,
    v_sync_start: 240,
    v_sync_end: 244,
};

#[test]
fn test_position_after_n_ticks() {
    let mut raster = RasterGenerator::new(TIMING);
    for n in 1..=(TIMING.ticks_per_frame() * 2 + 1000) {
        raster.advance_tick();
        if n % 997 == 0 {
            let expected = RasterPosition {
                h: (n % 384) as u16,
                v: ((n / 384) % 262) as u16,
            };
            assert_eq!(raster.position(), expected, "after {n} ticks");
        }
    }
}

#[test]
fn test_one_vblank_edge_per_frame() {
    let mut raster = RasterGenerator::new(TIMING);
    let mut edges = Vec::new();
    for n in 1..=(TIMING.ticks_per_frame() * 3) {
        if raster.tick() {
            edges.push(n);
            assert_eq!(raster.position(), RasterPosition { h: 0, v: 224 });
        }
    }
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[1] - edges[0], TIMING.ticks_per_frame());
    assert_eq!(edges[0], 224 * 384);
}

#[test]
fn test_frame_start_and_line_start() {
    let mut raster = RasterGenerator::new(TIMING);
    let mut lines = 0;
    let mut frames = 0;
    for _ in 0..TIMING.ticks_per_frame() {
        let events = raster.advance_tick();
        if events.line_start {
            lines += 1;
            assert_eq!(raster.position().h, 0);
        }
        if events.frame_start {
            frames += 1;
            assert_eq!(raster.position(), RasterPosition { h: 0, v: 0 });
        }
    }
    assert_eq!(lines, 262);
    assert_eq!(frames, 1);
}

#[test]
fn test_hsync_period_and_width() {
    let mut raster = RasterGenerator::new(TIMING);
    let mut rising = Vec::new();
    let mut width = 0;
    let mut prev = raster.sync().h_sync;
    // Stay clear of vertical sync
    for n in 1..=(384 * 10) {
        raster.advance_tick();
        let h_sync = raster.sync().h_sync;
        if h_sync {
            width += 1;
        }
        if h_sync && !prev {
            rising.push(n);
        }
        prev = h_sync;
    }
    assert_eq!(rising.len(), 10);
    assert!(rising.windows(2).all(|w| w[1] - w[0] == 384));
    assert_eq!(width, 32 * 10);
    assert_eq!(rising[0], 280);
}

#[test]
fn test_vsync_lines() {
    let mut raster = RasterGenerator::new(TIMING);
    let mut vsync_lines = 0;
    for _ in 0..TIMING.ticks_per_frame() {
        let events = raster.advance_tick();
        if events.line_start && raster.sync().v_sync {
            vsync_lines += 1;
            let v = raster.position().v;
            assert!((240..244).contains(&v), "vsync on line {v}");
        }
    }
    assert_eq!(vsync_lines, 4);
}

#[test]
fn test_blanking_and_composite_signals() {
    let pos = |h, v| RasterPosition { h, v };

    let s = TIMING.signals(pos(255, 223));
    assert!(!s.h_blank && !s.v_blank && !s.composite_blank);

    let s = TIMING.signals(pos(256, 0));
    assert!(s.h_blank && s.composite_blank && !s.v_blank);

    let s = TIMING.signals(pos(0, 224));
    assert!(s.v_blank && s.composite_blank);

    // XOR composite: hsync alone is high, hsync during vsync is low
    assert!(TIMING.signals(pos(290, 10)).composite_sync);
    assert!(TIMING.signals(pos(0, 241)).composite_sync);
    assert!(!TIMING.signals(pos(290, 241)).composite_sync);
    assert!(!TIMING.signals(pos(0, 10)).composite_sync);
}

#[test]
fn test_reset_returns_to_origin() {
    let mut raster = RasterGenerator::new(TIMING);
    for _ in 0..12345 {
        raster.advance_tick();
    }
    raster.reset();
    assert_eq!(raster.position(), RasterPosition::default());
    assert!(raster.in_active_window());
    assert_eq!(raster.timing(), &TIMING);
}
