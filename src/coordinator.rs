//! The orchestrator that ties the strips, the surface host, and the output
//! together.
//!
//! [`OverlayCoordinator`] owns one [`GestureSlider`] per edge that has ever
//! been active, decides which of them are attached to the
//! [`SurfaceHost`], and forwards every value change to the
//! [`OutputSink`] and [`HapticSink`].
//!
//! # Attachment rule
//!
//! ```text
//! desired = enabled ? active_edges : {}
//! ```
//!
//! After every [`apply_configuration`](OverlayCoordinator::apply_configuration)
//! the attached set equals `desired`.  Sliders whose edge goes inactive are
//! kept dormant, so their value and sensitivity survive toggling.

use crate::command::{Command, ConfigUpdate, Edge, EdgeSet, PointerEvent};
use crate::config::{Config, ConfigError};
use crate::geometry::{Placement, Point};
use crate::slider::{GestureOutcome, GestureSlider};
use crate::traits::{HapticSink, OutputSink, SurfaceHost};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Possible errors from the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// A configuration update was rejected; nothing changed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// The coordinator was shut down and cannot be reconfigured.
    #[error("coordinator is stopped")]
    Stopped,
}

/// Whether the coordinator still manages surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Stopped,
}

/// A side effect performed against the surface host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceChange {
    Attach { edge: Edge, placement: Placement },
    Detach { edge: Edge },
}

/// A slider plus whether its surface is currently attached.
#[derive(Debug)]
struct TrackedSlider {
    slider: GestureSlider,
    attached: bool,
}

/// Output level for `value` on a `0..=max_level` scale.
pub fn target_level(max_level: u32, value: f64) -> u32 {
    (max_level as f64 * value / 100.0).round().max(0.0) as u32
}

/// Keeps the attached strips in line with the configuration and routes
/// their input.
///
/// All methods are expected to be called from one thread, one event at a
/// time; nothing here locks.
///
/// # Typical usage
///
/// ```ignore
/// let mut coordinator = OverlayCoordinator::start(host, output, NoHaptics, &config)?;
/// coordinator.handle(Command::Configure(ConfigUpdate::new().with_edges(EdgeSet::both())))?;
/// ```
pub struct OverlayCoordinator<H: SurfaceHost, O: OutputSink, P: HapticSink> {
    host: H,
    output: O,
    haptics: P,
    config: Config,
    active_edges: EdgeSet,
    enabled: bool,
    sensitivity: f64,
    sliders: BTreeMap<Edge, TrackedSlider>,
    last_value: Option<f64>,
    lifecycle: Lifecycle,
}

impl<H: SurfaceHost, O: OutputSink, P: HapticSink> OverlayCoordinator<H, O, P> {
    /// Create a running coordinator with no edge active.
    pub fn new(host: H, output: O, haptics: P, config: &Config) -> Self {
        Self {
            host,
            output,
            haptics,
            config: config.clone(),
            active_edges: EdgeSet::none(),
            enabled: config.overlay.enabled,
            sensitivity: config.slider.sensitivity,
            sliders: BTreeMap::new(),
            last_value: None,
            lifecycle: Lifecycle::Running,
        }
    }

    /// Create a coordinator and apply the configuration file's edges,
    /// sensitivity and master switch.
    pub fn start(host: H, output: O, haptics: P, config: &Config) -> Result<Self, CoordinatorError> {
        let mut coordinator = Self::new(host, output, haptics, config);
        coordinator.apply_configuration(config.initial_update())?;
        Ok(coordinator)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn haptics(&self) -> &P {
        &self.haptics
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Edges requested by the configuration (attached or not).
    pub fn active_edges(&self) -> &EdgeSet {
        &self.active_edges
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Edges whose surface is currently attached.
    pub fn attached_edges(&self) -> EdgeSet {
        self.sliders
            .iter()
            .filter(|(_, t)| t.attached)
            .map(|(edge, _)| *edge)
            .collect()
    }

    /// The slider for `edge`, attached or dormant.
    pub fn slider(&self, edge: Edge) -> Option<&GestureSlider> {
        self.sliders.get(&edge).map(|t| &t.slider)
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<(), CoordinatorError> {
        match cmd {
            Command::Configure(update) => {
                self.apply_configuration(update)?;
            }
            Command::Pointer { edge, event } => {
                let outcome = self.on_pointer(edge, event);
                debug!("pointer {} {:?} -> {:?}", edge, event, outcome);
            }
            Command::SyncValue(value) => {
                self.sync_value(value);
            }
            Command::Shutdown => {
                self.shutdown();
            }
        }
        self.flush_redraws();
        Ok(())
    }

    /// Apply a partial configuration and attach / detach surfaces so that
    /// the attached set matches it.
    ///
    /// The update is validated as a whole first; on error nothing changes.
    /// Returns the host side effects performed, which is empty when the
    /// update does not change the attached set.
    pub fn apply_configuration(
        &mut self,
        update: ConfigUpdate,
    ) -> Result<Vec<SurfaceChange>, CoordinatorError> {
        if !self.is_running() {
            return Err(CoordinatorError::Stopped);
        }
        update.validate()?;

        if let Some(sensitivity) = update.sensitivity {
            self.sensitivity = sensitivity;
            for tracked in self.sliders.values_mut() {
                tracked.slider.set_sensitivity(sensitivity)?;
            }
        }
        if let Some(edges) = update.active_edges {
            self.active_edges = edges;
        }
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }

        let desired = if self.enabled {
            self.active_edges.clone()
        } else {
            EdgeSet::none()
        };
        let current = self.attached_edges();

        let mut changes = Vec::new();
        for edge in current.union(&desired).iter() {
            match (current.contains(edge), desired.contains(edge)) {
                (false, true) => {
                    if let Some(placement) = self.attach_edge(edge) {
                        changes.push(SurfaceChange::Attach { edge, placement });
                    }
                }
                (true, false) => {
                    self.detach_edge(edge);
                    changes.push(SurfaceChange::Detach { edge });
                }
                _ => {}
            }
        }

        if !changes.is_empty() {
            info!(
                "configuration applied: edges={} enabled={} sensitivity={} attached={}",
                self.active_edges,
                self.enabled,
                self.sensitivity,
                self.attached_edges()
            );
        }
        Ok(changes)
    }

    /// Route one pointer sample to the strip on `edge`.
    ///
    /// Events for edges without an attached surface are ignored.
    pub fn on_pointer(&mut self, edge: Edge, event: PointerEvent) -> GestureOutcome {
        let Some(tracked) = self.sliders.get_mut(&edge).filter(|t| t.attached) else {
            debug!("pointer event for detached edge {} ignored", edge);
            return GestureOutcome::Ignored;
        };
        let slider = &mut tracked.slider;
        let outcome = match event {
            PointerEvent::Down { x, y } => slider.on_gesture_start(Point::new(x, y)),
            PointerEvent::Move { x, y } => slider.on_gesture_move(Point::new(x, y)),
            PointerEvent::Up { x, y } => slider.on_gesture_end(Point::new(x, y)),
            PointerEvent::Cancel => slider.on_gesture_cancel(),
        };
        if let GestureOutcome::ValueChanged(value) = outcome {
            self.on_slider_value_changed(edge, value);
        }
        outcome
    }

    /// Forward a value produced by the strip on `edge` to the output and
    /// pulse the haptics.
    ///
    /// The other strips are updated to show the same value.
    pub fn on_slider_value_changed(&mut self, edge: Edge, value: f64) {
        self.last_value = Some(value);
        for (other, tracked) in self.sliders.iter_mut() {
            if *other != edge {
                tracked.slider.set_value(value);
            }
        }

        let out = &self.config.output;
        match self.output.max_level(out.channel) {
            Ok(max) => {
                let level = target_level(max, value);
                debug!("{} strip: value={:.2} -> level {}/{}", edge, value, level, max);
                if let Err(e) = self.output.set_level(out.channel, level, out.show_ui) {
                    warn!("set level {} failed: {}", level, e);
                }
            }
            Err(e) => warn!("querying max level failed: {}", e),
        }

        if out.haptic_ms > 0 {
            self.haptics.pulse(out.haptic_ms);
        }
    }

    /// Show a value changed elsewhere on every strip, without forwarding it
    /// to the output.
    pub fn sync_value(&mut self, value: f64) {
        if value.is_nan() {
            warn!("ignoring NaN value sync");
            return;
        }
        for tracked in self.sliders.values_mut() {
            tracked.slider.set_value(value);
        }
        self.last_value = Some(value.clamp(0.0, 100.0));
    }

    /// Redraw every attached strip whose value changed since the last call.
    pub fn flush_redraws(&mut self) {
        for (edge, tracked) in self.sliders.iter_mut() {
            if tracked.attached && tracked.slider.take_dirty() {
                self.host.render(*edge, tracked.slider.value());
            }
        }
    }

    /// Detach every attached surface and drop all slider state.
    ///
    /// A failing detach is logged and does not stop the others.  Calling
    /// this more than once is harmless.
    pub fn shutdown(&mut self) {
        if !self.is_running() {
            return;
        }
        for (edge, tracked) in self.sliders.iter_mut() {
            if !tracked.attached {
                continue;
            }
            tracked.slider.on_gesture_cancel();
            tracked.attached = false;
            if let Err(e) = self.host.detach(*edge) {
                warn!("detaching {} strip during shutdown failed: {}", edge, e);
            }
        }
        self.sliders.clear();
        self.lifecycle = Lifecycle::Stopped;
        info!("coordinator stopped");
    }

    //  Attachment helpers

    /// Create the slider for `edge` if needed, size it, and attach it.
    ///
    /// Returns `None` when the screen size is unknown; the edge then stays
    /// detached and is retried by the next configuration update.
    fn attach_edge(&mut self, edge: Edge) -> Option<Placement> {
        let screen = match self.host.screen() {
            Ok(screen) => screen,
            Err(e) => {
                warn!("cannot place {} strip, screen unknown: {}", edge, e);
                return None;
            }
        };
        let overlay = &self.config.overlay;
        let placement = Placement::for_edge(edge, screen, overlay.width, overlay.height_fraction);

        let slider_config = crate::config::SliderConfig {
            sensitivity: self.sensitivity,
            ..self.config.slider.clone()
        };
        let last_value = self.last_value;
        let tracked = self.sliders.entry(edge).or_insert_with(|| {
            let mut slider = GestureSlider::new(&slider_config);
            if let Some(value) = last_value {
                slider.set_value(value);
            }
            TrackedSlider {
                slider,
                attached: false,
            }
        });
        tracked
            .slider
            .set_surface_size(placement.width as f64, placement.height as f64);
        tracked.attached = true;

        match self.host.attach(edge, &placement) {
            Ok(()) => info!(
                "attached {} strip {}x{} at ({}, {})",
                edge, placement.width, placement.height, placement.x, placement.y
            ),
            Err(e) => warn!("attaching {} strip reported: {} (ignored)", edge, e),
        }
        Some(placement)
    }

    /// Detach the surface for `edge`, abandoning any drag on it.
    fn detach_edge(&mut self, edge: Edge) {
        let Some(tracked) = self.sliders.get_mut(&edge) else {
            return;
        };
        if !tracked.attached {
            return;
        }
        tracked.slider.on_gesture_cancel();
        tracked.attached = false;
        match self.host.detach(edge) {
            Ok(()) => info!("detached {} strip", edge),
            Err(e) => warn!("detaching {} strip reported: {} (ignored)", edge, e),
        }
    }
}

impl<H: SurfaceHost, O: OutputSink, P: HapticSink> Drop for OverlayCoordinator<H, O, P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//  Tests
