// Terminal renderer - draws the cloud with ratatui on a crossterm backend
//
// The renderer and the frame pacer share one canvas. The renderer only
// records tiles and their fades; the pacer repaints the canvas while the
// scheduler waits between actions, which is what makes the fades visible.

use crate::errors::MosaicResult;
use crate::grid::PixelRect;
use crate::images::ImageRef;
use crate::render::animation::{EasingType, Fade, FadeDirection};
use crate::render::fit::{aspect_fit, FitAxis};
use crate::render::Renderer;
use crate::scheduler::Clock;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::warn;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block as Panel, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::collections::BTreeMap;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

const FRAME_DURATION: Duration = Duration::from_millis(1000 / 30);

const PALETTE: [(u8, u8, u8); 6] = [
    (231, 111, 81),
    (244, 162, 97),
    (233, 196, 106),
    (42, 157, 143),
    (38, 70, 83),
    (131, 56, 236),
];

/// One image on the canvas
#[derive(Debug, Clone)]
pub struct Tile {
    pub label: String,
    pub rect: PixelRect,
    pub fit: FitAxis,
    pub fade: Fade,
    pub color: (u8, u8, u8),
}

/// Everything currently drawn, in pixel coordinates of the display box
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f64,
    height: f64,
    tiles: BTreeMap<u64, Tile>,
    next_handle: u64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            tiles: BTreeMap::new(),
            next_handle: 1,
        }
    }

    pub fn insert(&mut self, tile: Tile) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.tiles.insert(handle, tile);
        handle
    }

    /// Start fading a tile out; it is removed by `prune` once invisible
    pub fn fade_out(&mut self, handle: u64, duration: Duration, easing: EasingType) {
        match self.tiles.get_mut(&handle) {
            Some(tile) => tile.fade = Fade::fade_out(duration).with_easing(easing),
            None => warn!("⚠️ Fade out requested for unknown tile #{}", handle),
        }
    }

    /// Drop tiles whose fade-out has finished. Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|_, tile| {
            !(tile.fade.direction == FadeDirection::Out && tile.fade.is_completed_at(now))
        });
        before - self.tiles.len()
    }

    pub fn tiles(&self) -> &BTreeMap<u64, Tile> {
        &self.tiles
    }

    /// Map a pixel rectangle of the box onto terminal cells inside `area`
    pub fn to_cells(&self, rect: &PixelRect, area: Rect) -> Rect {
        let scale_x = area.width as f64 / self.width;
        let scale_y = area.height as f64 / self.height;

        let left = (rect.left * scale_x).round().clamp(0.0, area.width as f64) as u16;
        let top = (rect.top * scale_y).round().clamp(0.0, area.height as f64) as u16;
        let right = (rect.right * scale_x).round().clamp(0.0, area.width as f64) as u16;
        let bottom = (rect.bottom * scale_y).round().clamp(0.0, area.height as f64) as u16;

        let width = right.saturating_sub(left).max(1).min(area.width.saturating_sub(left));
        let height = bottom.saturating_sub(top).max(1).min(area.height.saturating_sub(top));
        Rect::new(area.x + left, area.y + top, width, height)
    }
}

fn tile_color(url: &str) -> (u8, u8, u8) {
    // FNV-1a
    let hash = url
        .bytes()
        .fold(0xcbf29ce484222325u64, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(0x100000001b3)
        });
    PALETTE[(hash % PALETTE.len() as u64) as usize]
}

fn faded(color: (u8, u8, u8), opacity: f32) -> Color {
    let scale = |channel: u8| (channel as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::Rgb(scale(color.0), scale(color.1), scale(color.2))
}

/// Renderer half: records tiles on the shared canvas
pub struct TerminalRenderer {
    canvas: Arc<Mutex<Canvas>>,
    fade_duration: Duration,
    easing: EasingType,
}

impl TerminalRenderer {
    pub fn new(canvas: Arc<Mutex<Canvas>>, fade_duration: Duration, easing: EasingType) -> Self {
        Self {
            canvas,
            fade_duration,
            easing,
        }
    }
}

impl Renderer for TerminalRenderer {
    type Handle = u64;

    fn show_image(&mut self, rect: PixelRect, image: &ImageRef) -> u64 {
        let label = image
            .url
            .rsplit('/')
            .next()
            .unwrap_or(image.url.as_str())
            .to_string();
        let tile = Tile {
            label,
            rect,
            fit: aspect_fit(image.dimensions, &rect),
            fade: Fade::fade_in(self.fade_duration).with_easing(self.easing),
            color: tile_color(&image.url),
        };
        let mut canvas = self.canvas.lock().unwrap_or_else(PoisonError::into_inner);
        canvas.insert(tile)
    }

    fn hide_image(&mut self, handle: u64) {
        let mut canvas = self.canvas.lock().unwrap_or_else(PoisonError::into_inner);
        canvas.fade_out(handle, self.fade_duration, self.easing);
    }
}

fn render_canvas(f: &mut Frame, canvas: &Canvas, now: Instant) {
    let frame_panel = Panel::default()
        .borders(Borders::ALL)
        .title(" image cloud - press q to quit ");
    let area = frame_panel.inner(f.area());
    f.render_widget(frame_panel, f.area());

    for tile in canvas.tiles().values() {
        let cells = canvas.to_cells(&tile.rect, area);
        let opacity = tile.fade.opacity_at(now);
        let fit_marker = match tile.fit {
            FitAxis::Width => "↔",
            FitAxis::Height => "↕",
        };
        let body = Paragraph::new(format!("{} {}", fit_marker, tile.label))
            .style(Style::default().bg(faded(tile.color, opacity)).fg(Color::Black))
            .block(Panel::default().borders(Borders::ALL));
        f.render_widget(Clear, cells);
        f.render_widget(body, cells);
    }
}

/// Clock half: repaints the canvas and watches for quit keys while the
/// scheduler waits
pub struct FramePacer {
    canvas: Arc<Mutex<Canvas>>,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    running: Arc<AtomicBool>,
    restored: bool,
}

impl FramePacer {
    /// Take over the terminal (raw mode, alternate screen)
    pub fn new(canvas: Arc<Mutex<Canvas>>, running: Arc<AtomicBool>) -> MosaicResult<Self> {
        enable_raw_mode()?;
        let terminal = match Self::enter_screen(io::stdout()) {
            Ok(terminal) => terminal,
            Err(err) => {
                // No Self yet, so Drop cannot undo raw mode
                let mut stdout = io::stdout();
                if let Err(restore_err) = execute!(stdout, LeaveAlternateScreen) {
                    warn!("⚠️ Failed to leave alternate screen: {}", restore_err);
                }
                if let Err(restore_err) = disable_raw_mode() {
                    warn!("⚠️ Failed to disable raw mode: {}", restore_err);
                }
                return Err(err.into());
            }
        };

        Ok(Self {
            canvas,
            terminal,
            running,
            restored: false,
        })
    }

    /// Everything after raw mode that can fail while taking over the screen
    fn enter_screen<W: io::Write>(mut out: W) -> io::Result<Terminal<CrosstermBackend<W>>> {
        execute!(out, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(terminal)
    }

    pub fn draw(&mut self) -> io::Result<()> {
        let now = Instant::now();
        let mut canvas = self.canvas.lock().unwrap_or_else(PoisonError::into_inner);
        canvas.prune(now);
        self.terminal.draw(|f| render_canvas(f, &canvas, now))?;
        Ok(())
    }

    /// Wait up to `timeout` for a key; true when the user asked to quit
    fn poll_quit(&self, timeout: Duration) -> io::Result<bool> {
        if !event::poll(timeout)? {
            return Ok(false);
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);
                return Ok(ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc));
            }
        }
        Ok(false)
    }

    /// Give the terminal back. Called automatically on drop.
    pub fn restore(&mut self) -> MosaicResult<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Clock for FramePacer {
    fn wait(&mut self, delay: Duration) {
        let deadline = Instant::now() + delay;
        loop {
            if let Err(err) = self.draw() {
                warn!("⚠️ Failed to draw frame: {}", err);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.running.load(Ordering::SeqCst) {
                return;
            }

            match self.poll_quit(remaining.min(FRAME_DURATION)) {
                Ok(true) => self.running.store(false, Ordering::SeqCst),
                Ok(false) => {}
                Err(err) => {
                    warn!("⚠️ Failed to read terminal events: {}", err);
                    std::thread::sleep(remaining.min(FRAME_DURATION));
                }
            }
        }
    }
}

impl Drop for FramePacer {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!("⚠️ Failed to restore terminal: {}", err);
        }
    }
}
