use std::collections::VecDeque;

use crate::engine::SimulationState;
use crate::snapshot::LayoutSnapshot;
use crate::types::{Item, LayoutConfig, LayoutError, Position};

/// Input event for a layout session. Data and viewport deliveries are full
/// replacements, never deltas.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Fresh item set from the data source.
    Data(Vec<Item>),
    /// Viewport change; reseeds like new data.
    Resize { width: f64, height: f64 },
    DragStart { parent: String, pointer: Position },
    DragMove { pointer: Position },
    DragEnd,
}

/// Frame-driven wrapper around [`SimulationState`] that applies external
/// events only at tick boundaries.
///
/// Data snapshots, resizes and drag input arrive asynchronously from the
/// host's point of view, but they are queued here and drained at the top of
/// [`LayoutSession::step`], so a tick never observes a half-applied reseed.
/// The session itself is single-threaded; a multi-threaded host must
/// serialize access to it.
#[derive(Debug)]
pub struct LayoutSession {
    cfg: LayoutConfig,
    items: Vec<Item>,
    viewport: Option<(f64, f64)>,
    state: Option<SimulationState>,
    queue: VecDeque<SessionEvent>,
}

impl LayoutSession {
    pub fn new(cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            items: Vec::new(),
            viewport: None,
            state: None,
            queue: VecDeque::new(),
        }
    }

    /// Queue an event; it takes effect on the next [`LayoutSession::step`].
    pub fn push(&mut self, event: SessionEvent) {
        self.queue.push_back(event);
    }

    /// True once the current simulation has settled and no events are
    /// pending; the host may pause its frame loop until the next push.
    pub fn idle(&self) -> bool {
        self.queue.is_empty() && self.state.as_ref().map_or(true, |s| s.settled())
    }

    /// Drain pending events, then advance one frame. Returns `None` while no
    /// layout exists yet (no data or no viewport).
    pub fn step(&mut self) -> Result<Option<LayoutSnapshot>, LayoutError> {
        while let Some(event) = self.queue.pop_front() {
            match event {
                SessionEvent::Data(items) => {
                    self.items = items;
                    self.reseed()?;
                }
                SessionEvent::Resize { width, height } => {
                    self.viewport = Some((width, height));
                    self.reseed()?;
                }
                SessionEvent::DragStart { parent, pointer } => {
                    if let Some(state) = self.state.as_mut() {
                        state.drag_start(&parent, pointer);
                    }
                }
                SessionEvent::DragMove { pointer } => {
                    if let Some(state) = self.state.as_mut() {
                        state.drag_move(pointer);
                    }
                }
                SessionEvent::DragEnd => {
                    if let Some(state) = self.state.as_mut() {
                        state.drag_end();
                    }
                }
            }
        }

        Ok(self.state.as_mut().map(|s| s.tick()))
    }

    /// Unconditionally rebuild the simulation from the stored items and
    /// viewport. Any in-flight state, drags included, is discarded.
    fn reseed(&mut self) -> Result<(), LayoutError> {
        let Some((width, height)) = self.viewport else {
            return Ok(());
        };
        self.state = Some(SimulationState::new(
            self.items.clone(),
            width,
            height,
            self.cfg.clone(),
        )?);
        Ok(())
    }
}
