// Tiling scheduler - endless generate / transition cycle over the display field

use crate::config::{CloudConfig, PlacementStrategy};
use crate::display::{format_occupancy, format_tiling};
use crate::errors::{MosaicError, MosaicResult};
use crate::grid::{BlockLayoutGenerator, CellGrid, GridField, OccupancyGrid, Tiling};
use crate::images::{choose_random, ImageRef};
use crate::render::Renderer;
use crate::scheduler::placement::next_addable_block;
use crate::scheduler::queue::{Clock, SequentialQueue, ThreadClock};
use log::{debug, error, info, log_enabled, Level};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// About to generate the next incoming tiling
    Generating,
    /// Swapping the outgoing tiling for the incoming one block by block
    Transitioning,
}

/// Tilings being torn down and built up, owned by one scheduler
#[derive(Debug, Clone)]
pub struct CycleState<H> {
    pub outgoing: Tiling<H>,
    pub incoming: Tiling<H>,
    pub phase: Phase,
    /// Number of cycles started so far
    pub cycle: u64,
}

impl<H> Default for CycleState<H> {
    fn default() -> Self {
        Self {
            outgoing: Tiling::default(),
            incoming: Tiling::default(),
            phase: Phase::Generating,
            cycle: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub cycles_completed: u64,
    pub images_shown: u64,
    pub images_hidden: u64,
}

/// Everything the queued actions operate on
pub struct Stage<R: Renderer> {
    field: GridField,
    generator: BlockLayoutGenerator,
    state: CycleState<R::Handle>,
    renderer: R,
    images: Vec<ImageRef>,
    rng: StdRng,
    placement: PlacementStrategy,
    image_delay: Duration,
    stats: SchedulerStats,
}

impl<R: Renderer> Stage<R> {
    /// Enter a new cycle: the finished incoming tiling becomes the outgoing
    /// one and a fresh tiling is generated.
    fn begin_cycle(&mut self) {
        let incoming: Tiling<R::Handle> = self.generator.generate(&mut self.rng);
        if let Err(err) = incoming.check_partition(self.generator.config()) {
            // The generator only ever produces partitions; anything else is a bug
            error!("❌ {}", err);
            panic!("layout generator produced an invalid tiling: {}", err);
        }

        self.state.outgoing = std::mem::replace(&mut self.state.incoming, incoming);
        self.state.phase = Phase::Transitioning;
        self.state.cycle += 1;

        info!(
            "🎲 Cycle {}: {} incoming blocks, {} outgoing still visible",
            self.state.cycle,
            self.state.incoming.len(),
            self.state.outgoing.visible_count()
        );
        if log_enabled!(Level::Debug) {
            debug!(
                "\n{}",
                format_tiling(&self.state.incoming, self.generator.config())
            );
        }
    }

    /// Hide the first visible outgoing block, if any
    fn remove_first_visible(&mut self) -> bool {
        let Some(index) = self.state.outgoing.first_visible() else {
            return false;
        };
        let Some(block) = self.state.outgoing.block_mut(index) else {
            return false;
        };

        let rect = block.rect();
        self.field.clear(&rect);
        if let Some(handle) = block.hide() {
            self.renderer.hide_image(handle);
        }
        self.stats.images_hidden += 1;
        debug!("➖ Removed outgoing block {} {}", index, rect);
        true
    }

    fn has_addable_block(&self) -> bool {
        next_addable_block(self.placement, self.state.incoming.blocks(), &self.field).is_some()
    }

    /// Show the next addable incoming block, if any. The occupancy check
    /// happens here, right before the cells are occupied.
    fn add_next_block(&mut self) -> bool {
        let Some(index) =
            next_addable_block(self.placement, self.state.incoming.blocks(), &self.field)
        else {
            debug!("⏳ No addable block yet");
            return false;
        };

        let rect = self.state.incoming.blocks()[index].rect();
        let pixels = match self.field.pixel_rect(&rect) {
            Ok(pixels) => pixels,
            Err(err) => {
                error!("❌ Block {} has no pixel rect: {}", rect, err);
                return false;
            }
        };
        let Some(image) = choose_random(&self.images, &mut self.rng) else {
            error!("❌ No images to show");
            return false;
        };

        self.field.occupy(&rect);
        let handle = self.renderer.show_image(pixels, image);
        if let Some(block) = self.state.incoming.block_mut(index) {
            block.show(handle);
        }
        self.stats.images_shown += 1;
        debug!("➕ Added incoming block {} {} ({})", index, rect, image.url);
        true
    }

    /// Incoming tiling fully visible: it becomes the tiling to tear down next
    fn complete_cycle(&mut self) {
        self.state.outgoing = Tiling::default();
        self.state.phase = Phase::Generating;
        self.stats.cycles_completed += 1;

        info!(
            "🔄 Cycle {} complete: {} shown, {} hidden so far",
            self.state.cycle, self.stats.images_shown, self.stats.images_hidden
        );
        if log_enabled!(Level::Debug) {
            debug!("\n{}", format_occupancy(&self.field));
        }
    }

    /// Recompute occupancy from the visible blocks of both tilings and
    /// compare it with the field. Fails on overlap or mismatch.
    pub fn verify_occupancy(&self) -> MosaicResult<()> {
        let mut expected = OccupancyGrid::new(*self.field.config());
        let visible = self
            .state
            .outgoing
            .blocks()
            .iter()
            .chain(self.state.incoming.blocks())
            .filter(|block| block.is_visible());

        for block in visible {
            let rect = block.rect();
            if !expected.is_free(&rect) {
                return Err(MosaicError::Partition(format!(
                    "visible block {} overlaps another visible block",
                    rect
                )));
            }
            expected.occupy(&rect);
        }

        if &expected != self.field.occupancy() {
            return Err(MosaicError::Partition(
                "field occupancy differs from the visible blocks".into(),
            ));
        }
        Ok(())
    }

    pub fn state(&self) -> &CycleState<R::Handle> {
        &self.state
    }

    pub fn field(&self) -> &GridField {
        &self.field
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

fn generate_step<R, K>(stage: &mut Stage<R>, queue: &mut SequentialQueue<Stage<R>, K>)
where
    R: Renderer + 'static,
    K: Clock + 'static,
{
    stage.begin_cycle();
    queue.enqueue(Duration::ZERO, transition_step::<R, K>);
}

/// One remove/add round: hide one outgoing block, then show one incoming
/// block, each after the image delay.
fn transition_step<R, K>(stage: &mut Stage<R>, queue: &mut SequentialQueue<Stage<R>, K>)
where
    R: Renderer + 'static,
    K: Clock + 'static,
{
    if stage.state.outgoing.any_visible() {
        queue.enqueue(stage.image_delay, |stage: &mut Stage<R>, queue| {
            stage.remove_first_visible();
            add_step(stage, queue);
        });
    } else {
        add_step(stage, queue);
    }
}

/// Queue the paced add only when a block fits; otherwise go straight on to
/// the next removal.
fn add_step<R, K>(stage: &mut Stage<R>, queue: &mut SequentialQueue<Stage<R>, K>)
where
    R: Renderer + 'static,
    K: Clock + 'static,
{
    // With nothing left to remove an add must eventually fit; keep pacing
    // instead of spinning on zero-delay steps.
    if stage.has_addable_block() || !stage.state.outgoing.any_visible() {
        queue.enqueue(stage.image_delay, |stage: &mut Stage<R>, queue| {
            stage.add_next_block();
            finish_step(stage, queue);
        });
    } else {
        debug!("⏳ No addable block yet");
        finish_step(stage, queue);
    }
}

fn finish_step<R, K>(stage: &mut Stage<R>, queue: &mut SequentialQueue<Stage<R>, K>)
where
    R: Renderer + 'static,
    K: Clock + 'static,
{
    if stage.state.incoming.any_hidden() {
        queue.enqueue(Duration::ZERO, transition_step::<R, K>);
    } else {
        stage.complete_cycle();
        queue.enqueue(Duration::ZERO, generate_step::<R, K>);
    }
}

/// Drives the image cloud: generates tilings and transitions between them
/// forever, one paced action at a time.
pub struct TilingScheduler<R: Renderer, K: Clock = ThreadClock> {
    stage: Stage<R>,
    queue: SequentialQueue<Stage<R>, K>,
}

impl<R: Renderer + 'static> TilingScheduler<R, ThreadClock> {
    pub fn new(config: &CloudConfig, images: Vec<ImageRef>, renderer: R) -> MosaicResult<Self> {
        Self::with_clock(config, images, renderer, ThreadClock)
    }
}

impl<R, K> TilingScheduler<R, K>
where
    R: Renderer + 'static,
    K: Clock + 'static,
{
    pub fn with_clock(
        config: &CloudConfig,
        images: Vec<ImageRef>,
        renderer: R,
        clock: K,
    ) -> MosaicResult<Self> {
        config.validate()?;
        if images.is_empty() {
            return Err(MosaicError::ImageList("image list is empty".into()));
        }

        let rng = match config.layout.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let stage = Stage {
            field: GridField::new(config.grid, &config.display),
            generator: BlockLayoutGenerator::new(config.grid, config.growth_iterations()),
            state: CycleState::default(),
            renderer,
            images,
            rng,
            placement: config.layout.placement,
            image_delay: config.image_delay(),
            stats: SchedulerStats::default(),
        };

        info!(
            "✅ Image cloud ready: {}x{} grid, {} images, {}ms between images",
            config.grid.rows,
            config.grid.cols,
            stage.images.len(),
            config.timing.image_delay_ms
        );

        Ok(Self {
            stage,
            queue: SequentialQueue::with_clock(clock),
        })
    }

    /// Stop running once `running` is cleared
    pub fn with_run_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.queue.set_run_flag(running);
        self
    }

    /// Queue the first cycle if nothing is queued yet
    pub fn start(&mut self) {
        if self.queue.is_empty() {
            self.queue.enqueue(Duration::ZERO, generate_step::<R, K>);
        }
    }

    /// Run the cycle until the run flag is cleared. Without a run flag this
    /// never returns.
    pub fn run(&mut self) -> usize {
        self.start();
        self.queue.drain(&mut self.stage)
    }

    /// Run at most `actions` queued actions
    pub fn run_steps(&mut self, actions: usize) -> usize {
        self.start();
        self.queue.drain_at_most(&mut self.stage, actions)
    }

    pub fn stage(&self) -> &Stage<R> {
        &self.stage
    }

    pub fn state(&self) -> &CycleState<R::Handle> {
        self.stage.state()
    }

    pub fn field(&self) -> &GridField {
        self.stage.field()
    }

    pub fn renderer(&self) -> &R {
        self.stage.renderer()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stage.stats()
    }

    pub fn clock(&self) -> &K {
        self.queue.clock()
    }

    pub fn clock_mut(&mut self) -> &mut K {
        self.queue.clock_mut()
    }

    pub fn verify_occupancy(&self) -> MosaicResult<()> {
        self.stage.verify_occupancy()
    }
}
