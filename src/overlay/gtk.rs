//! GTK4 + layer-shell strips driven from the **main thread**.
//!
//! Each attached edge gets its own layer-shell window on the `Overlay`
//! layer, anchored to that screen side and vertically centered:
//!
//! ```text
//! window                (layer-shell, transparent, anchored left or right)
//! └ .edge-strip         (GtkDrawingArea, cairo-drawn track/fill/thumb)
//!     └ GestureDrag     (forwards Down/Move/Up/Cancel as Command::Pointer)
//! ```
//!
//! Pointer input never touches the coordinator directly: the drag
//! controller sends [`Command::Pointer`] into the same channel the command
//! socket feeds, and the ~60 fps GLib timeout drains that channel.  Every
//! gesture sample and configuration update is therefore handled on one
//! thread, one at a time.
//!
//! # CSS selectors
//!
//! | Selector      | Targets                                 |
//! |---------------|-----------------------------------------|
//! | `window`      | The strip window (keep transparent)     |
//! | `.edge-strip` | The drawing area                        |

use crate::command::{Command, Edge, PointerEvent};
use crate::config::Config;
use crate::coordinator::OverlayCoordinator;
use crate::geometry::{Placement, Rect, ScreenInfo};
use crate::slider::StripLayout;
use crate::traits::{HapticSink, OutputSink, SurfaceHost};
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
use gtk4_layer_shell::LayerShell;
use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

//  Drawing constants

const THUMB_RADIUS: f64 = 7.0;
const CORNER_RADIUS: f64 = 3.0;
const THUMB_STROKE: f64 = 1.5;

/// `#20000000`
const TRACK_RGBA: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 32.0 / 255.0);
/// `#4A90E2`, alpha 200
const FILL_RGBA: (f64, f64, f64, f64) = (74.0 / 255.0, 144.0 / 255.0, 226.0 / 255.0, 200.0 / 255.0);
/// `#3700B3`
const THUMB_RGB: (f64, f64, f64) = (55.0 / 255.0, 0.0, 179.0 / 255.0);

//  Default CSS

const DEFAULT_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}

.edge-strip {
    background: none;
}
"#;

/// Errors reported by the GTK host.
#[derive(Debug, thiserror::Error)]
pub enum GtkHostError {
    #[error("no GDK display")]
    NoDisplay,
    #[error("display has no monitor")]
    NoMonitor,
    #[error("{0} strip is already attached")]
    AlreadyAttached(Edge),
}

/// One attached strip.
struct StripWindow {
    window: gtk4::Window,
    area: gtk4::DrawingArea,
    value: Rc<Cell<f64>>,
}

/// [`SurfaceHost`] that shows each strip as a layer-shell window.
pub struct GtkSurfaceHost {
    strips: RefCell<BTreeMap<Edge, StripWindow>>,
    cmd_tx: mpsc::Sender<Command>,
    track_width: f64,
}

impl GtkSurfaceHost {
    /// `cmd_tx` receives the pointer input of every strip.
    pub fn new(cmd_tx: mpsc::Sender<Command>, track_width: f64) -> Self {
        Self {
            strips: RefCell::new(BTreeMap::new()),
            cmd_tx,
            track_width,
        }
    }

    fn drag_controller(&self, edge: Edge) -> gtk4::GestureDrag {
        let drag = gtk4::GestureDrag::new();

        let tx = self.cmd_tx.clone();
        drag.connect_drag_begin(move |_, x, y| {
            let _ = tx.send(Command::Pointer {
                edge,
                event: PointerEvent::Down { x, y },
            });
        });

        let tx = self.cmd_tx.clone();
        drag.connect_drag_update(move |gesture, dx, dy| {
            if let Some((x, y)) = gesture.start_point() {
                let _ = tx.send(Command::Pointer {
                    edge,
                    event: PointerEvent::Move {
                        x: x + dx,
                        y: y + dy,
                    },
                });
            }
        });

        let tx = self.cmd_tx.clone();
        drag.connect_drag_end(move |gesture, dx, dy| {
            let (x, y) = gesture.start_point().unwrap_or((0.0, 0.0));
            let _ = tx.send(Command::Pointer {
                edge,
                event: PointerEvent::Up {
                    x: x + dx,
                    y: y + dy,
                },
            });
        });

        let tx = self.cmd_tx.clone();
        drag.connect_cancel(move |_, _| {
            let _ = tx.send(Command::Pointer {
                edge,
                event: PointerEvent::Cancel,
            });
        });

        drag
    }
}

fn layer_edge(edge: Edge) -> gtk4_layer_shell::Edge {
    match edge {
        Edge::Left => gtk4_layer_shell::Edge::Left,
        Edge::Right => gtk4_layer_shell::Edge::Right,
    }
}

impl SurfaceHost for GtkSurfaceHost {
    type Error = GtkHostError;

    fn screen(&self) -> Result<ScreenInfo, GtkHostError> {
        let display = gdk::Display::default().ok_or(GtkHostError::NoDisplay)?;
        let monitor = display
            .monitors()
            .item(0)
            .and_then(|obj| obj.downcast::<gdk::Monitor>().ok())
            .ok_or(GtkHostError::NoMonitor)?;
        let geometry = monitor.geometry();
        Ok(ScreenInfo {
            width: geometry.width().max(0) as u32,
            height: geometry.height().max(0) as u32,
        })
    }

    fn attach(&self, edge: Edge, placement: &Placement) -> Result<(), GtkHostError> {
        if self.strips.borrow().contains_key(&edge) {
            return Err(GtkHostError::AlreadyAttached(edge));
        }

        let window = gtk4::Window::new();
        window.init_layer_shell();
        window.set_layer(gtk4_layer_shell::Layer::Overlay);
        window.set_namespace("edgevol");
        window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::None);
        window.set_anchor(layer_edge(edge), true);
        window.set_decorated(false);
        window.remove_css_class("background");
        window.set_default_size(placement.width as i32, placement.height as i32);

        let value = Rc::new(Cell::new(50.0));
        let area = gtk4::DrawingArea::new();
        area.add_css_class("edge-strip");
        area.set_content_width(placement.width as i32);
        area.set_content_height(placement.height as i32);

        let track_width = self.track_width;
        let shown = Rc::clone(&value);
        area.set_draw_func(move |_, cr, width, height| {
            draw_strip(cr, width as f64, height as f64, track_width, shown.get());
        });
        area.add_controller(self.drag_controller(edge));

        window.set_child(Some(&area));
        window.present();
        debug!("{} strip window presented", edge);

        self.strips.borrow_mut().insert(
            edge,
            StripWindow {
                window,
                area,
                value,
            },
        );
        Ok(())
    }

    fn detach(&self, edge: Edge) -> Result<(), GtkHostError> {
        if let Some(strip) = self.strips.borrow_mut().remove(&edge) {
            strip.window.destroy();
            debug!("{} strip window destroyed", edge);
        }
        Ok(())
    }

    fn render(&self, edge: Edge, value: f64) {
        if let Some(strip) = self.strips.borrow().get(&edge) {
            strip.value.set(value);
            strip.area.queue_draw();
        }
    }
}

//  Drawing

fn rounded_rect(cr: &cairo::Context, r: &Rect, radius: f64) {
    let radius = radius.min(r.width / 2.0).min(r.height / 2.0);
    let (x, y, w, h) = (r.x, r.y, r.width, r.height);
    let quarter = std::f64::consts::FRAC_PI_2;
    cr.new_sub_path();
    cr.arc(x + w - radius, y + radius, radius, -quarter, 0.0);
    cr.arc(x + w - radius, y + h - radius, radius, 0.0, quarter);
    cr.arc(x + radius, y + h - radius, radius, quarter, 2.0 * quarter);
    cr.arc(x + radius, y + radius, radius, 2.0 * quarter, 3.0 * quarter);
    cr.close_path();
}

fn draw_strip(cr: &cairo::Context, width: f64, height: f64, track_width: f64, value: f64) {
    let layout = StripLayout::compute(width, height, track_width, value);

    let (r, g, b, a) = TRACK_RGBA;
    rounded_rect(cr, &layout.track, CORNER_RADIUS);
    cr.set_source_rgba(r, g, b, a);
    let _ = cr.fill();

    if layout.fill.height > 0.0 {
        let (r, g, b, a) = FILL_RGBA;
        rounded_rect(cr, &layout.fill, CORNER_RADIUS);
        cr.set_source_rgba(r, g, b, a);
        let _ = cr.fill();
    }

    let (r, g, b) = THUMB_RGB;
    let c = layout.thumb_center;
    cr.new_sub_path();
    cr.arc(c.x, c.y, THUMB_RADIUS, 0.0, 2.0 * std::f64::consts::PI);
    cr.set_source_rgb(r, g, b);
    let _ = cr.fill_preserve();
    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.set_line_width(THUMB_STROKE);
    let _ = cr.stroke();
}

//  Public API

/// Run the GTK4 main loop on the **current** (main) thread.
///
/// `cmd_tx` is the sending half of `cmd_rx`; the strips use it to deliver
/// pointer input.  Returns once a [`Command::Shutdown`] has been handled.
pub fn run_main_loop<O, P>(
    config: Config,
    output: O,
    haptics: P,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: mpsc::Receiver<Command>,
    css_path: Option<PathBuf>,
) where
    O: OutputSink + 'static,
    P: HapticSink + 'static,
{
    if let Err(e) = gtk4::init() {
        error!("failed to initialise GTK4: {}", e);
        return;
    }
    info!("GTK4 initialised on main thread");

    load_css(&css_path);

    let host = GtkSurfaceHost::new(cmd_tx, config.slider.track_width);
    let mut coordinator = match OverlayCoordinator::start(host, output, haptics, &config) {
        Ok(c) => c,
        Err(e) => {
            error!("cannot start overlay: {}", e);
            return;
        }
    };
    coordinator.flush_redraws();
    info!(
        "strips ready (edges {}, enabled {}, CSS: {})",
        coordinator.active_edges(),
        coordinator.enabled(),
        css_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in>".into()),
    );

    let main_loop = glib::MainLoop::new(None, false);
    let quit = main_loop.clone();

    //  Main event loop (~60 fps)
    glib::timeout_add_local(Duration::from_millis(16), move || {
        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => {
                    if let Err(e) = coordinator.handle(cmd) {
                        error!("command error: {}", e);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    coordinator.shutdown();
                    break;
                }
            }
        }

        if !coordinator.is_running() {
            info!("coordinator stopped, leaving main loop");
            quit.quit();
            return glib::ControlFlow::Break;
        }
        glib::ControlFlow::Continue
    });

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
}

//  CSS loading

fn load_css(css_path: &Option<PathBuf>) {
    let provider = gtk4::CssProvider::new();

    let css_content = match css_path.as_ref().filter(|p| p.exists()) {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(content) => {
                info!("user CSS: {} ({} bytes)", p.display(), content.len());
                content
            }
            Err(e) => {
                warn!("CSS read failed ({}): {}, using built-in", p.display(), e);
                DEFAULT_CSS.to_string()
            }
        },
        None => {
            debug!("no user CSS, using built-in default");
            DEFAULT_CSS.to_string()
        }
    };

    #[allow(deprecated)]
    provider.load_from_data(&css_content);

    if let Some(display) = gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        warn!("no GDK display, CSS will not be applied");
    }
}
