//! Headless gesture replay.
//!
//! A script is a list of gestures, one per line or separated by `;`. Points
//! are `x,y` or a bare `x`.
//!
//! ```text
//! fling 400 250 250      # drag from x=400 to x=250 over 250ms, then release
//! wait 500
//! snap 2
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info, warn};

use altscroll_core::clamp::clamp;
use altscroll_core::scroll::timing::millis;
use altscroll_core::{AppConfig, Rect, ScrollConfig, ScrollEngine, ScrollSurface, Vec2};

const DEMO_SCRIPT: &str = "fling 400 250 250; wait 1000; snap 3; scroll 0 200";

/// Frames to run after the last input before giving up on settling
const MAX_SETTLE_FRAMES: u32 = 10_000;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Script file, `-` for stdin
    script: Option<PathBuf>,

    /// Inline gestures, may be repeated
    #[arg(short = 'e', long = "exec")]
    exec: Vec<String>,

    /// Print one JSON object per line
    #[arg(long)]
    json: bool,

    /// Pace frames with the wall clock
    #[arg(long)]
    realtime: bool,

    /// Viewport width
    #[arg(long, default_value_t = 300.0)]
    width: f64,

    /// Viewport height
    #[arg(long, default_value_t = 100.0)]
    height: f64,

    /// Number of children laid out in a row
    #[arg(long, default_value_t = 5)]
    children: usize,

    /// Width of each child
    #[arg(long, default_value_t = 300.0)]
    child_width: f64,

    /// Space between children
    #[arg(long, default_value_t = 0.0)]
    gap: f64,

    /// Enable snapping regardless of the config file
    #[arg(long)]
    snap: bool,

    /// Disable momentum regardless of the config file
    #[arg(long)]
    no_momentum: bool,
}

pub async fn run(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    let source = read_source(&args)?;
    let commands = parse_script(&source)?;

    let mut scroll = config.scroll.clone();
    if args.snap {
        scroll.snap = true;
    }
    if args.no_momentum {
        scroll.momentum = false;
    }

    let frame = config.ui.frame_duration();
    let surface = MemorySurface::row(args.width, args.height, args.child_width, args.gap, args.children);
    let mut sim = Simulation::new(surface, scroll, config.ui.scrollbar_inset, frame, &commands)?;

    let mut pace = args.realtime.then(|| tokio::time::interval(frame));

    loop {
        if let Some(interval) = pace.as_mut() {
            interval.tick().await;
        }
        let more = sim.step();

        for event in sim.drain_events() {
            if args.json {
                println!("{}", serde_json::to_string(&event)?);
            } else {
                println!("{}", event);
            }
        }
        if !more {
            break;
        }
    }

    info!(frames = sim.frames(), "Simulation finished");
    Ok(())
}

fn read_source(args: &SimulateArgs) -> Result<String> {
    let mut source = match &args.script {
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => String::new(),
    };

    for line in &args.exec {
        source.push('\n');
        source.push_str(line);
    }

    if source.trim().is_empty() {
        debug!("No script given, running the demo");
        source = DEMO_SCRIPT.to_string();
    }
    Ok(source)
}

// ─────────────────────────────────────────────── script ──────

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Press at `from`, move to `to` over `duration_ms`, keep holding
    Drag { from: Vec2, to: Vec2, duration_ms: f64 },
    /// Let go where the pointer is
    Release,
    /// Drag then release
    Fling { from: Vec2, to: Vec2, duration_ms: f64 },
    /// Native scroll by a delta
    Wheel(Vec2),
    Snap { index: usize, duration_ms: Option<f64> },
    Scroll { target: Vec2, duration_ms: f64 },
    Wait(f64),
    Stop,
    Resize { width: f64, height: f64 },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Drag { from, to, duration_ms } => {
                write!(f, "drag {} {} {}", point(*from), point(*to), duration_ms)
            }
            Command::Release => write!(f, "release"),
            Command::Fling { from, to, duration_ms } => {
                write!(f, "fling {} {} {}", point(*from), point(*to), duration_ms)
            }
            Command::Wheel(delta) => write!(f, "wheel {}", point(*delta)),
            Command::Snap { index, duration_ms: Some(ms) } => write!(f, "snap {} {}", index, ms),
            Command::Snap { index, duration_ms: None } => write!(f, "snap {}", index),
            Command::Scroll { target, duration_ms } => {
                write!(f, "scroll {} {}", point(*target), duration_ms)
            }
            Command::Wait(ms) => write!(f, "wait {}", ms),
            Command::Stop => write!(f, "stop"),
            Command::Resize { width, height } => write!(f, "resize {} {}", width, height),
        }
    }
}

fn point(p: Vec2) -> String {
    format!("{},{}", p.x, p.y)
}

/// Parse a whole script. Errors carry the 1-based line number.
pub fn parse_script(source: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (n, line) in source.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        for statement in line.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            let command = parse_command(statement)
                .with_context(|| format!("line {}: {}", n + 1, statement))?;
            commands.push(command);
        }
    }
    Ok(commands)
}

fn parse_command(statement: &str) -> Result<Command> {
    let mut words = statement.split_whitespace();
    let verb = words.next().ok_or_else(|| anyhow!("empty statement"))?;
    let args: Vec<&str> = words.collect();

    let command = match (verb, args.as_slice()) {
        ("drag", [from, to, ms]) => Command::Drag {
            from: parse_point(from)?,
            to: parse_point(to)?,
            duration_ms: parse_ms(ms)?,
        },
        ("fling", [from, to, ms]) => Command::Fling {
            from: parse_point(from)?,
            to: parse_point(to)?,
            duration_ms: parse_ms(ms)?,
        },
        ("release", []) => Command::Release,
        ("wheel", [delta]) => Command::Wheel(parse_point(delta)?),
        ("snap", [index]) => Command::Snap {
            index: index.parse().with_context(|| format!("bad index '{}'", index))?,
            duration_ms: None,
        },
        ("snap", [index, ms]) => Command::Snap {
            index: index.parse().with_context(|| format!("bad index '{}'", index))?,
            duration_ms: Some(parse_ms(ms)?),
        },
        ("scroll", [target, ms]) => Command::Scroll {
            target: parse_point(target)?,
            duration_ms: parse_ms(ms)?,
        },
        ("wait", [ms]) => Command::Wait(parse_ms(ms)?),
        ("stop", []) => Command::Stop,
        ("resize", [width, height]) => Command::Resize {
            width: parse_number(width)?,
            height: parse_number(height)?,
        },
        ("drag" | "fling" | "release" | "wheel" | "snap" | "scroll" | "wait" | "stop" | "resize", _) => {
            bail!("wrong number of arguments for '{}'", verb)
        }
        _ => bail!("unknown gesture '{}'", verb),
    };
    Ok(command)
}

fn parse_number(word: &str) -> Result<f64> {
    let value: f64 = word.parse().with_context(|| format!("bad number '{}'", word))?;
    if !value.is_finite() {
        bail!("bad number '{}'", word);
    }
    Ok(value)
}

fn parse_ms(word: &str) -> Result<f64> {
    let value = parse_number(word)?;
    if value < 0.0 {
        bail!("negative duration '{}'", word);
    }
    Ok(value)
}

fn parse_point(word: &str) -> Result<Vec2> {
    match word.split_once(',') {
        Some((x, y)) => Ok(Vec2::new(parse_number(x)?, parse_number(y)?)),
        None => Ok(Vec2::new(parse_number(word)?, 0.0)),
    }
}

// ─────────────────────────────────────────────── surface ─────

/// Row of equally sized children inside a viewport at the page origin
#[derive(Debug, Clone)]
pub struct MemorySurface {
    viewport: Rect,
    child_width: f64,
    gap: f64,
    children: usize,
    offset: Vec2,
}

impl MemorySurface {
    pub fn row(width: f64, height: f64, child_width: f64, gap: f64, children: usize) -> Self {
        Self {
            viewport: Rect::new(0.0, 0.0, width, height),
            child_width,
            gap,
            children,
            offset: Vec2::ZERO,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    fn content_width(&self) -> f64 {
        if self.children == 0 {
            0.0
        } else {
            self.children as f64 * (self.child_width + self.gap) - self.gap
        }
    }
}

impl ScrollSurface for MemorySurface {
    fn scroll_offset(&self) -> Vec2 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    fn container_rect(&self) -> altscroll_core::Result<Rect> {
        Ok(self.viewport)
    }

    fn content_rect(&self) -> altscroll_core::Result<Rect> {
        Ok(Rect::new(
            self.viewport.left - self.offset.x,
            self.viewport.top - self.offset.y,
            self.content_width(),
            self.viewport.height,
        ))
    }

    fn child_rects(&self) -> altscroll_core::Result<Vec<Rect>> {
        let stride = self.child_width + self.gap;
        Ok((0..self.children)
            .map(|i| {
                Rect::new(
                    self.viewport.left + stride * i as f64 - self.offset.x,
                    self.viewport.top - self.offset.y,
                    self.child_width,
                    self.viewport.height,
                )
            })
            .collect())
    }
}

// ─────────────────────────────────────────────── timeline ────

#[derive(Debug, Clone, PartialEq)]
enum Input {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
    Wheel(Vec2),
    Snap { index: usize, duration_ms: Option<f64> },
    Scroll { target: Vec2, duration_ms: f64 },
    Stop,
    Resize { width: f64, height: f64 },
}

#[derive(Debug)]
struct Timed {
    at: Duration,
    input: Input,
    /// Gesture echoed into the trace when this input is delivered
    label: Option<String>,
}

/// Lay gestures out on a timeline. Drags emit one move per frame.
fn schedule(commands: &[Command], frame: Duration) -> Result<VecDeque<Timed>> {
    let mut timeline = VecDeque::new();
    let mut cursor = Duration::ZERO;
    let mut held: Option<Vec2> = None;

    let push = |timeline: &mut VecDeque<Timed>, at: Duration, input: Input, label: Option<String>| {
        timeline.push_back(Timed { at, input, label });
    };

    for command in commands {
        let label = Some(command.to_string());
        match command {
            Command::Drag { from, to, duration_ms } | Command::Fling { from, to, duration_ms } => {
                if held.is_some() {
                    bail!("'{}' while the pointer is still down", command);
                }
                push(&mut timeline, cursor, Input::Down(*from), label);

                let total = millis(*duration_ms);
                let steps = (total.as_secs_f64() / frame.as_secs_f64()).ceil().max(1.0) as u32;
                for k in 1..=steps {
                    let t = k as f64 / steps as f64;
                    let at = cursor + total.mul_f64(t);
                    push(&mut timeline, at, Input::Move(*from + (*to - *from) * t), None);
                }
                cursor += total;

                if matches!(command, Command::Fling { .. }) {
                    push(&mut timeline, cursor, Input::Up(*to), None);
                } else {
                    held = Some(*to);
                }
            }
            Command::Release => {
                let at = held.take().ok_or_else(|| anyhow!("'release' without a drag"))?;
                push(&mut timeline, cursor, Input::Up(at), label);
            }
            Command::Wheel(delta) => push(&mut timeline, cursor, Input::Wheel(*delta), label),
            Command::Snap { index, duration_ms } => push(
                &mut timeline,
                cursor,
                Input::Snap {
                    index: *index,
                    duration_ms: *duration_ms,
                },
                label,
            ),
            Command::Scroll { target, duration_ms } => push(
                &mut timeline,
                cursor,
                Input::Scroll {
                    target: *target,
                    duration_ms: *duration_ms,
                },
                label,
            ),
            Command::Wait(ms) => cursor += millis(*ms),
            Command::Stop => push(&mut timeline, cursor, Input::Stop, label),
            Command::Resize { width, height } => push(
                &mut timeline,
                cursor,
                Input::Resize {
                    width: *width,
                    height: *height,
                },
                label,
            ),
        }
    }

    if let Some(at) = held {
        debug!("Pointer still down at end of script, releasing");
        push(&mut timeline, cursor, Input::Up(at), Some("release".to_string()));
    }
    Ok(timeline)
}

// ─────────────────────────────────────────────── trace ───────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A scripted gesture started
    Gesture { t_ms: f64, gesture: String },
    /// The engine wrote a new scroll offset
    Offset { t_ms: f64, x: f64, y: f64, phase: &'static str },
    /// The engine rejected a call
    Error { t_ms: f64, message: String },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Gesture { t_ms, gesture } => write!(f, "{:>8.1}ms  > {}", t_ms, gesture),
            Event::Offset { t_ms, x, y, phase } => {
                write!(f, "{:>8.1}ms  x={:>9.2} y={:>9.2}  {}", t_ms, x, y, phase)
            }
            Event::Error { t_ms, message } => write!(f, "{:>8.1}ms  ! {}", t_ms, message),
        }
    }
}

pub struct Simulation {
    engine: ScrollEngine<MemorySurface>,
    timeline: VecDeque<Timed>,
    frame: Duration,
    start: Instant,
    now: Duration,
    last_offset: Vec2,
    events: Vec<Event>,
    frames: u32,
    settle_frames: u32,
}

impl Simulation {
    pub fn new(
        surface: MemorySurface,
        config: ScrollConfig,
        scrollbar_inset: f64,
        frame: Duration,
        commands: &[Command],
    ) -> Result<Self> {
        if frame.is_zero() {
            bail!("frame duration must be positive");
        }
        let timeline = schedule(commands, frame)?;
        let engine = ScrollEngine::new(surface, config, scrollbar_inset)?;
        let last_offset = engine.offset();

        Ok(Self {
            engine,
            timeline,
            frame,
            start: Instant::now(),
            now: Duration::ZERO,
            last_offset,
            events: Vec::new(),
            frames: 0,
            settle_frames: 0,
        })
    }

    /// Deliver inputs due before the next frame, then run that frame.
    /// Returns false once the script is exhausted and the engine is at rest.
    pub fn step(&mut self) -> bool {
        let next = self.now + self.frame;

        while self.timeline.front().is_some_and(|timed| timed.at <= next) {
            if let Some(timed) = self.timeline.pop_front() {
                self.deliver(timed);
            }
        }

        self.now = next;
        self.frames += 1;
        self.engine.frame(self.start + next);
        self.record(next);

        if !self.timeline.is_empty() {
            return true;
        }
        let busy = self.engine.needs_frame() || self.engine.next_deadline().is_some();
        if busy {
            self.settle_frames += 1;
            if self.settle_frames >= MAX_SETTLE_FRAMES {
                warn!(frames = self.settle_frames, "Engine did not settle, stopping");
                return false;
            }
        }
        busy
    }

    fn deliver(&mut self, timed: Timed) {
        let at = timed.at;
        let now = self.start + at;
        if let Some(gesture) = timed.label {
            self.events.push(Event::Gesture {
                t_ms: as_ms(at),
                gesture,
            });
        }

        match timed.input {
            Input::Down(page) => self.engine.on_pointer_down(now, page),
            Input::Move(page) => self.engine.on_pointer_move(page),
            Input::Up(page) => self.engine.on_pointer_up(now, page),
            Input::Wheel(delta) => {
                // Native scrolling moves the surface directly, within its range.
                // A live tween would overwrite it on the next frame.
                self.engine.stop();
                let current = self.engine.offset();
                let max = self.engine.geometry().max_offset();
                let offset = clamp(current + delta, current, max).offset;
                self.engine.surface_mut().set_scroll_offset(offset);
                self.engine.on_wheel_activity(now);
            }
            Input::Snap { index, duration_ms } => {
                if let Err(e) = self.engine.snap_to(now, index, duration_ms, None, None) {
                    self.events.push(Event::Error {
                        t_ms: as_ms(at),
                        message: e.to_string(),
                    });
                }
            }
            Input::Scroll { target, duration_ms } => {
                self.engine.scroll_to(now, target, duration_ms, None, None)
            }
            Input::Stop => self.engine.stop(),
            Input::Resize { width, height } => {
                self.engine.surface_mut().resize(width, height);
                self.engine.on_resize(now);
            }
        }
        self.record(at);
    }

    fn record(&mut self, at: Duration) {
        let offset = self.engine.offset();
        if offset != self.last_offset {
            self.last_offset = offset;
            self.events.push(Event::Offset {
                t_ms: as_ms(at),
                x: offset.x,
                y: offset.y,
                phase: self.engine.phase().name(),
            });
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn offset(&self) -> Vec2 {
        self.engine.offset()
    }
}

fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn config(snap: bool) -> ScrollConfig {
        ScrollConfig {
            snap,
            ..ScrollConfig::default()
        }
    }

    fn run_script(source: &str, snap: bool) -> (Simulation, Vec<Event>) {
        let commands = parse_script(source).unwrap();
        let surface = MemorySurface::row(300.0, 100.0, 300.0, 0.0, 5);
        let mut sim = Simulation::new(surface, config(snap), 0.0, FRAME, &commands).unwrap();
        let mut events = Vec::new();
        while sim.step() {
            events.extend(sim.drain_events());
        }
        events.extend(sim.drain_events());
        (sim, events)
    }

    fn offsets(events: &[Event]) -> Vec<f64> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Offset { x, .. } => Some(*x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_script() {
        let commands = parse_script("fling 400 250 250 # flick left\nwait 100; snap 2 150\n\nwheel 0,30").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Fling {
                    from: Vec2::new(400.0, 0.0),
                    to: Vec2::new(250.0, 0.0),
                    duration_ms: 250.0,
                },
                Command::Wait(100.0),
                Command::Snap {
                    index: 2,
                    duration_ms: Some(150.0),
                },
                Command::Wheel(Vec2::new(0.0, 30.0)),
            ]
        );
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let err = parse_script("stop\nspin 3").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));

        assert!(parse_script("snap").is_err());
        assert!(parse_script("wait -5").is_err());
        assert!(parse_script("scroll 10,x 100").is_err());
    }

    #[test]
    fn test_release_without_drag_is_rejected() {
        let commands = parse_script("release").unwrap();
        let surface = MemorySurface::row(300.0, 100.0, 300.0, 0.0, 5);
        assert!(Simulation::new(surface, config(false), 0.0, FRAME, &commands).is_err());
    }

    #[test]
    fn test_zero_frame_is_rejected() {
        let commands = parse_script("fling 400 250 250").unwrap();
        let surface = MemorySurface::row(300.0, 100.0, 300.0, 0.0, 5);
        assert!(Simulation::new(surface, config(false), 0.0, Duration::ZERO, &commands).is_err());
    }

    #[test]
    fn test_fling_momentum_then_snap() {
        let (sim, events) = run_script("fling 400 250 250", true);

        let xs = offsets(&events);
        // Drag follows the pointer to 150, momentum carries to 180, snap lands on the next child
        assert!(xs.contains(&150.0));
        assert!(xs.contains(&180.0));
        assert_eq!(sim.offset(), Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_fling_without_snap_rests_after_momentum() {
        let (sim, _) = run_script("fling 400 250 250", false);
        assert_eq!(sim.offset(), Vec2::new(180.0, 0.0));
    }

    #[test]
    fn test_held_drag_has_no_momentum() {
        let (sim, _) = run_script("drag 400 250 250; wait 1000; release", false);
        // Velocity is averaged over the whole press, so a long hold barely moves
        assert!((sim.offset().x - 150.0).abs() < 2.0);
    }

    #[test]
    fn test_out_of_range_snap_is_reported() {
        let (sim, events) = run_script("snap 9", false);
        assert!(events.iter().any(|e| matches!(e, Event::Error { .. })));
        assert_eq!(sim.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_wheel_triggers_idle_snap() {
        let (sim, events) = run_script("wheel 100", true);

        assert_eq!(offsets(&events).first(), Some(&100.0));
        assert_eq!(sim.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_wheel_cancels_running_scroll() {
        let (sim, events) = run_script("scroll 1200 1000; wait 100; wheel 300", false);

        let last = events
            .iter()
            .rev()
            .find_map(|e| match e {
                Event::Offset { t_ms, x, .. } => Some((*t_ms, *x)),
                _ => None,
            })
            .unwrap();
        // Nothing writes after the wheel lands
        assert!((last.0 - 100.0).abs() < 1e-6);
        assert_eq!(sim.offset().x, last.1);
        assert!(sim.offset().x > 400.0 && sim.offset().x < 430.0);
    }

    #[test]
    fn test_scroll_clamps_to_range() {
        let (sim, _) = run_script("scroll 5000 300", false);
        assert_eq!(sim.offset(), Vec2::new(1200.0, 0.0));
    }

    #[test]
    fn test_resize_extends_range_after_debounce() {
        let (sim, _) = run_script("resize 600 100; wait 600; scroll 5000 100", false);
        assert_eq!(sim.offset(), Vec2::new(900.0, 0.0));
    }

    #[test]
    fn test_event_json_shape() {
        let event = Event::Offset {
            t_ms: 16.0,
            x: 1.5,
            y: 0.0,
            phase: "animating",
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "offset");
        assert_eq!(json["x"], 1.5);
        assert_eq!(json["phase"], "animating");
    }
}
