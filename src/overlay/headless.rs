//! A [`SurfaceHost`] with no visuals.
//!
//! Useful on machines without a layer-shell compositor and for driving the
//! daemon purely over the command socket: pointer input arrives as
//! [`Command::Pointer`](crate::command::Command::Pointer) messages.

use crate::command::Edge;
use crate::geometry::{Placement, ScreenInfo};
use crate::traits::SurfaceHost;
use log::{debug, info};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// Host that only records which edges are attached.
#[derive(Debug)]
pub struct HeadlessHost {
    screen: ScreenInfo,
    attached: RefCell<BTreeSet<Edge>>,
}

/// Errors reported by the headless host.
#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error("{0} strip is already attached")]
    AlreadyAttached(Edge),
}

impl HeadlessHost {
    pub fn new(screen: ScreenInfo) -> Self {
        Self {
            screen,
            attached: RefCell::new(BTreeSet::new()),
        }
    }

    /// Whether `edge` is currently attached.
    pub fn is_attached(&self, edge: Edge) -> bool {
        self.attached.borrow().contains(&edge)
    }
}

impl SurfaceHost for HeadlessHost {
    type Error = HeadlessError;

    fn screen(&self) -> Result<ScreenInfo, HeadlessError> {
        Ok(self.screen)
    }

    fn attach(&self, edge: Edge, placement: &Placement) -> Result<(), HeadlessError> {
        if !self.attached.borrow_mut().insert(edge) {
            return Err(HeadlessError::AlreadyAttached(edge));
        }
        info!(
            "[headless] {} strip {}x{} at ({}, {})",
            edge, placement.width, placement.height, placement.x, placement.y
        );
        Ok(())
    }

    fn detach(&self, edge: Edge) -> Result<(), HeadlessError> {
        if self.attached.borrow_mut().remove(&edge) {
            info!("[headless] {} strip removed", edge);
        }
        Ok(())
    }

    fn render(&self, edge: Edge, value: f64) {
        debug!("[headless] {} strip at {:.1}%", edge, value);
    }
}
