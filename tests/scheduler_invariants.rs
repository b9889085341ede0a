//! Scheduler invariants checked after every queued action
use image_cloud::scheduler::Phase;
use image_cloud::{
    CloudConfig, ImageRef, MosaicError, PixelRect, PlacementStrategy, Renderer, TilingScheduler,
    VirtualClock,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Show(usize, PixelRect),
    Hide(usize),
}

/// Renderer that remembers what is on screen and checks that no two images
/// ever share pixels
#[derive(Default)]
struct RecordingRenderer {
    next: usize,
    on_screen: HashMap<usize, PixelRect>,
    events: Vec<Event>,
}

impl Renderer for RecordingRenderer {
    type Handle = usize;

    fn show_image(&mut self, rect: PixelRect, _image: &ImageRef) -> usize {
        for other in self.on_screen.values() {
            assert!(!rect.overlaps(other), "{} overlaps {}", rect, other);
        }
        self.next += 1;
        self.on_screen.insert(self.next, rect);
        self.events.push(Event::Show(self.next, rect));
        self.next
    }

    fn hide_image(&mut self, handle: usize) {
        assert!(
            self.on_screen.remove(&handle).is_some(),
            "hid unknown image {}",
            handle
        );
        self.events.push(Event::Hide(handle));
    }
}

fn seeded_config(seed: u64) -> CloudConfig {
    let mut config = CloudConfig::default();
    config.layout.seed = Some(seed);
    config
}

fn images() -> Vec<ImageRef> {
    vec![
        ImageRef::new("a.jpg"),
        ImageRef::new("b.jpg").with_dimensions(640, 480),
        ImageRef::new("c.jpg").with_dimensions(300, 900),
    ]
}

fn scheduler(config: &CloudConfig) -> TilingScheduler<RecordingRenderer, VirtualClock> {
    TilingScheduler::with_clock(config, images(), RecordingRenderer::default(), VirtualClock::new())
        .expect("valid scheduler")
}

/// Step until `cycles` cycles completed, checking occupancy after every action
fn run_cycles(scheduler: &mut TilingScheduler<RecordingRenderer, VirtualClock>, cycles: u64) {
    let mut guard = 0;
    while scheduler.stats().cycles_completed < cycles {
        assert_eq!(scheduler.run_steps(1), 1);
        scheduler
            .verify_occupancy()
            .unwrap_or_else(|err| panic!("after action {}: {}", guard, err));
        guard += 1;
        assert!(guard < 10_000, "cycles never completed");
    }
}

#[test]
fn test_occupancy_matches_visible_blocks_over_many_cycles() {
    for seed in 0..8 {
        let mut scheduler = scheduler(&seeded_config(seed));
        run_cycles(&mut scheduler, 4);

        let stats = scheduler.stats();
        assert_eq!(
            stats.images_shown - stats.images_hidden,
            scheduler.renderer().on_screen.len() as u64
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn visible_blocks_never_overlap_on_any_grid(
        rows in 1usize..9,
        cols in 1usize..9,
        seed in any::<u64>(),
        first in any::<bool>(),
    ) {
        let mut config = seeded_config(seed);
        config.grid.rows = rows;
        config.grid.cols = cols;
        if first {
            config.layout.placement = PlacementStrategy::First;
        }
        let mut scheduler = scheduler(&config);
        run_cycles(&mut scheduler, 3);
        prop_assert!(scheduler.field().occupancy().is_full());
        prop_assert_eq!(scheduler.stats().cycles_completed, 3);
    }
}

#[test]
fn test_first_cycle_fills_the_grid() {
    let mut scheduler = scheduler(&seeded_config(11));
    run_cycles(&mut scheduler, 1);

    let state = scheduler.state();
    assert_eq!(state.phase, Phase::Generating);
    assert_eq!(state.cycle, 1);
    assert!(!state.incoming.any_hidden());
    assert!(state.outgoing.is_empty());
    assert!(scheduler.field().occupancy().is_full());

    let stats = scheduler.stats();
    assert_eq!(stats.images_hidden, 0);
    assert_eq!(stats.images_shown, state.incoming.len() as u64);
}

#[test]
fn test_every_outgoing_block_is_hidden_by_cycle_end() {
    let mut scheduler = scheduler(&seeded_config(5));
    run_cycles(&mut scheduler, 3);

    let stats = scheduler.stats();
    let on_screen = scheduler.renderer().on_screen.len() as u64;
    // Only the latest tiling is still shown
    assert_eq!(on_screen, scheduler.state().incoming.len() as u64);
    assert_eq!(stats.images_shown - stats.images_hidden, on_screen);

    let hides = scheduler
        .renderer()
        .events
        .iter()
        .filter(|event| matches!(event, Event::Hide(_)))
        .count() as u64;
    assert_eq!(hides, stats.images_hidden);
}

#[test]
fn test_actions_are_paced_by_image_delay() {
    let mut config = seeded_config(3);
    config.timing.image_delay_ms = 250;
    let mut scheduler = scheduler(&config);
    run_cycles(&mut scheduler, 2);

    let delay = Duration::from_millis(250);
    let waits = scheduler.clock().waits();
    assert!(waits.iter().all(|wait| wait.is_zero() || *wait == delay));

    // Exactly one image delay per add and per remove; blocked adds are not paced
    let stats = scheduler.stats();
    let paced = waits.iter().filter(|wait| **wait == delay).count() as u64;
    assert_eq!(paced, stats.images_shown + stats.images_hidden);
}

#[test]
fn test_first_placement_strategy_keeps_invariants() {
    let mut config = seeded_config(21);
    config.layout.placement = PlacementStrategy::First;
    let mut scheduler = scheduler(&config);
    run_cycles(&mut scheduler, 3);
    assert!(scheduler.verify_occupancy().is_ok());
}

#[test]
fn test_single_cell_grid_cycles() {
    let mut config = seeded_config(1);
    config.grid.rows = 1;
    config.grid.cols = 1;
    let mut scheduler = scheduler(&config);
    run_cycles(&mut scheduler, 3);

    assert_eq!(scheduler.stats().images_shown, 3);
    assert_eq!(scheduler.stats().images_hidden, 2);
    assert_eq!(scheduler.renderer().on_screen.len(), 1);
}

#[test]
fn test_non_square_grid_cycles() {
    let mut config = seeded_config(8);
    config.grid.rows = 3;
    config.grid.cols = 9;
    config.display.width = 600.0;
    config.display.height = 200.0;
    let mut scheduler = scheduler(&config);
    run_cycles(&mut scheduler, 3);
    assert!(scheduler.field().occupancy().is_full());
}

#[test]
fn test_cleared_run_flag_stops_run() {
    let running = Arc::new(AtomicBool::new(false));
    let mut scheduler = scheduler(&seeded_config(2)).with_run_flag(running);
    assert_eq!(scheduler.run(), 0);
    assert_eq!(scheduler.stats().images_shown, 0);
}

#[test]
fn test_empty_image_list_is_rejected() {
    let result = TilingScheduler::with_clock(
        &CloudConfig::default(),
        Vec::new(),
        RecordingRenderer::default(),
        VirtualClock::new(),
    );
    assert!(matches!(result, Err(MosaicError::ImageList(_))));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = CloudConfig::default();
    config.grid.cols = 0;
    let result =
        TilingScheduler::with_clock(&config, images(), RecordingRenderer::default(), VirtualClock::new());
    assert!(matches!(result, Err(MosaicError::ConfigError(_))));
}
