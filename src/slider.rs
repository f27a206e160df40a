//! A single touch strip: turns pointer samples into a bounded value.
//!
//! # Value model
//!
//! The value lives in `[0, 100]`.  Dragging **up** raises it:
//!
//! ```text
//! delta          = anchor.y - position.y
//! percent_change = delta / surface_height * sensitivity
//! value          = clamp(anchor_value + percent_change, 0, 100)
//! ```
//!
//! With [`AnchorPolicy::Continuous`] the anchor moves to every sample, so
//! a sensitivity change mid-drag only scales the distance travelled after
//! it.  With [`AnchorPolicy::Fixed`] the anchor stays where the finger went
//! down.
//!
//! A slider knows nothing about overlays or other strips; the
//! [`OverlayCoordinator`](crate::coordinator::OverlayCoordinator) routes
//! events to it and acts on the returned [`GestureOutcome`].

use crate::command::validate_sensitivity;
use crate::config::{AnchorPolicy, ConfigError, SliderConfig};
use crate::geometry::{Point, Rect};
use log::debug;

/// Lower bound of the value range.
pub const MIN_VALUE: f64 = 0.0;
/// Upper bound of the value range.
pub const MAX_VALUE: f64 = 100.0;

fn clamp_value(v: f64) -> f64 {
    v.clamp(MIN_VALUE, MAX_VALUE)
}

/// Drag state of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No finger on the strip.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging { anchor: Point, anchor_value: f64 },
}

/// What a pointer event did to the slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Not for this strip; the host may pass it through.
    Ignored,
    /// Consumed, value unchanged.
    Claimed,
    /// Consumed, and the value is now the carried one.
    ValueChanged(f64),
}

impl GestureOutcome {
    /// Whether the event must be kept from reaching whatever lies beneath
    /// the strip.
    pub fn is_claimed(&self) -> bool {
        !matches!(self, GestureOutcome::Ignored)
    }
}

/// Drag state and geometry of one strip.
#[derive(Debug, Clone)]
pub struct GestureSlider {
    value: f64,
    sensitivity: f64,
    anchor_policy: AnchorPolicy,
    state: DragState,
    surface: Rect,
    touch_width: f64,
    active_region: Rect,
    dirty: bool,
}

impl GestureSlider {
    /// Create a slider from the configured defaults.
    ///
    /// The surface has no size until [`set_surface_size`](Self::set_surface_size)
    /// is called, so no gesture can start before the strip is placed.
    pub fn new(config: &SliderConfig) -> Self {
        Self {
            value: clamp_value(config.initial_value),
            sensitivity: config.sensitivity,
            anchor_policy: config.anchor_policy,
            state: DragState::Idle,
            surface: Rect::default(),
            touch_width: config.touch_width,
            active_region: Rect::default(),
            dirty: true,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn surface(&self) -> Rect {
        self.surface
    }

    /// The part of the surface where a drag may start.
    pub fn active_region(&self) -> Rect {
        self.active_region
    }

    /// Resize the surface.  The active region is a band `touch_width` wide,
    /// centered horizontally and spanning the full height.
    pub fn set_surface_size(&mut self, width: f64, height: f64) {
        self.surface = Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0));
        let band = self.touch_width.min(self.surface.width).max(0.0);
        self.active_region = Rect::new(
            (self.surface.width - band) / 2.0,
            0.0,
            band,
            self.surface.height,
        );
        self.dirty = true;
    }

    /// Finger down.  Starts a drag when `position` is inside the active
    /// region.
    pub fn on_gesture_start(&mut self, position: Point) -> GestureOutcome {
        if !self.active_region.contains(position) {
            return GestureOutcome::Ignored;
        }
        debug!("drag start at y={:.1} value={:.1}", position.y, self.value);
        self.state = DragState::Dragging {
            anchor: position,
            anchor_value: self.value,
        };
        GestureOutcome::Claimed
    }

    /// Finger moved.  Ignored unless a drag is in progress.
    pub fn on_gesture_move(&mut self, position: Point) -> GestureOutcome {
        let DragState::Dragging {
            anchor,
            anchor_value,
        } = self.state
        else {
            return GestureOutcome::Ignored;
        };
        let height = self.surface.height;
        if height <= 0.0 {
            return GestureOutcome::Claimed;
        }

        let delta = anchor.y - position.y;
        let percent_change = delta / height * self.sensitivity;
        self.value = clamp_value(anchor_value + percent_change);
        self.dirty = true;

        if self.anchor_policy == AnchorPolicy::Continuous {
            self.state = DragState::Dragging {
                anchor: position,
                anchor_value: self.value,
            };
        }
        debug!("drag move y={:.1} value={:.2}", position.y, self.value);
        GestureOutcome::ValueChanged(self.value)
    }

    /// Finger lifted.  Ends a drag; the value stays where the last move put
    /// it.
    pub fn on_gesture_end(&mut self, _position: Point) -> GestureOutcome {
        self.finish()
    }

    /// The host cancelled the gesture.
    pub fn on_gesture_cancel(&mut self) -> GestureOutcome {
        self.finish()
    }

    fn finish(&mut self) -> GestureOutcome {
        if self.is_dragging() {
            self.state = DragState::Idle;
            GestureOutcome::Claimed
        } else {
            GestureOutcome::Ignored
        }
    }

    /// Reflect a value changed elsewhere.  Clamped, marks the strip for
    /// redraw, never reported as a value change.
    pub fn set_value(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.value = clamp_value(value);
        self.dirty = true;
    }

    /// Replace the sensitivity used by subsequent move samples.
    pub fn set_sensitivity(&mut self, sensitivity: f64) -> Result<(), ConfigError> {
        validate_sensitivity(sensitivity)?;
        self.sensitivity = sensitivity;
        Ok(())
    }

    /// Return whether the strip needs redrawing, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Drawing geometry of a strip for a given value.
///
/// ```text
///  ┌──┐  track (full height, centered)
///  │  │
///  ●──┤  thumb at the top of the fill
///  ████  fill (bottom up to value)
///  └──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripLayout {
    pub track: Rect,
    pub fill: Rect,
    pub thumb_center: Point,
}

impl StripLayout {
    pub fn compute(width: f64, height: f64, track_width: f64, value: f64) -> Self {
        let track_width = track_width.min(width);
        let left = (width - track_width) / 2.0;
        let fill_top = height * (1.0 - clamp_value(value) / MAX_VALUE);
        Self {
            track: Rect::new(left, 0.0, track_width, height),
            fill: Rect::new(left, fill_top, track_width, height - fill_top),
            thumb_center: Point::new(left + track_width / 2.0, fill_top),
        }
    }
}
