// src/session.rs

//! The plotting session: a bounded, ordered history of plot commands,
//! the viewport they are drawn under, and the command-dispatch state
//! machine the interactive shell feeds lines into.
//!
//! Whenever the viewport or canvas size changes, the canvas is
//! cleared and the whole history is replayed in insertion order, so
//! later commands paint over earlier ones on pixel conflicts
//! (last-write-wins, no blending). The shell layer above this module
//! owns only line input; everything user-visible that is not raw
//! terminal handling happens here.

use std::path::PathBuf;

use log::{debug, warn};

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::config::Config;
use crate::error::PlotError;
use crate::plot;
use crate::render;
use crate::viewport::Viewport;

/// Maximum number of plots kept live on screen. Further plot commands
/// are dropped (and logged) until the history is cleared.
pub const MAX_PLOT_HISTORY: usize = 50;

/// One replayable plot command.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotCommand {
    /// Plot an expression of `x` across the viewport.
    Expr { expr: String, color: Rgb },
    /// Plot two columns of a delimited file as a connected trace.
    Csv {
        path: PathBuf,
        xcol: usize,
        ycol: usize,
        color: Rgb,
    },
}

/// What a dispatched command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The session is over.
    Quit,
    /// Text only, no redraw.
    Message(String),
    /// A rendered frame, optionally followed by a status message.
    Frame {
        frame: String,
        message: Option<String>,
    },
}

impl Outcome {
    fn frame_with(frame: String, message: impl Into<String>) -> Self {
        Outcome::Frame {
            frame,
            message: Some(message.into()),
        }
    }
}

/// Session state: canvas, viewport, plot history, and axis settings.
pub struct Session {
    canvas: Canvas,
    view: Viewport,
    history: Vec<PlotCommand>,
    x_ticks: usize,
    y_ticks: usize,
    use_color: bool,
    expr_color: Rgb,
    csv_color: Rgb,
    /// Failure of the most recently replayed command, if any; taken
    /// by the submitter to decide whether to retain it.
    last_replay_error: Option<PlotError>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Session {
            canvas: Canvas::new(config.canvas.width_px, config.canvas.height_px),
            view: config.viewport,
            history: Vec::new(),
            x_ticks: config.axes.x_ticks,
            y_ticks: config.axes.y_ticks,
            use_color: config.colors.enabled,
            expr_color: config.colors.expr,
            csv_color: config.colors.csv,
            last_replay_error: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.view
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &[PlotCommand] {
        &self.history
    }

    /// Dispatches one command line. Errors never escape as `Err`:
    /// anything the user can get wrong comes back as a `Message`, the
    /// way an interactive prompt reports it.
    pub fn execute(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        let (word, rest) = split_first_word(line);
        match word {
            "exit" | "quit" => Outcome::Quit,
            "clear" | "clean" => {
                self.history.clear();
                self.canvas.clear();
                Outcome::Message("Canvas cleared.".into())
            }
            "reset" => {
                self.view.reset();
                self.replay();
                Outcome::frame_with(self.frame(), "Viewport reset.")
            }
            "zoom" => self.cmd_zoom(rest),
            "size" => self.cmd_size(rest),
            "ticks" => self.cmd_ticks(rest),
            "plot" => self.cmd_plot(rest),
            _ => Outcome::Message("Error: Unknown command.".into()),
        }
    }

    /// Renders the current canvas with axes, as shown after every
    /// drawing command.
    pub fn frame(&self) -> String {
        render::render_to_string(
            &self.canvas,
            Some((&self.view, self.x_ticks, self.y_ticks)),
            self.use_color,
        )
    }

    fn cmd_zoom(&mut self, args: &str) -> Outcome {
        let factors: Vec<f64> = args
            .split_whitespace()
            .map_while(|t| t.parse().ok())
            .collect();
        let (fx, fy, uniform) = match factors.as_slice() {
            [f] => (*f, *f, true),
            [fx, fy, ..] => (*fx, *fy, false),
            [] => (0.0, 0.0, true),
        };
        if fx <= 0.0 || fy <= 0.0 {
            return Outcome::Message("Usage: zoom <factor>  OR  zoom <x_factor> <y_factor>".into());
        }
        self.view.zoom(fx, fy);
        self.replay();
        let message = if uniform {
            format!("Zoomed x{:.2} (Uniform)", fx)
        } else {
            format!("Zoomed X: x{:.2}, Y: x{:.2}", fx, fy)
        };
        Outcome::frame_with(self.frame(), message)
    }

    fn cmd_size(&mut self, args: &str) -> Outcome {
        let dims: Vec<usize> = args
            .split_whitespace()
            .map_while(|t| t.parse().ok())
            .collect();
        let [w, h] = dims.as_slice() else {
            return Outcome::Message("Usage: size <width> <height>".into());
        };
        if *w == 0 || *h == 0 {
            return Outcome::Message("Usage: size <width> <height>".into());
        }
        self.canvas.resize(*w, *h);
        self.replay();
        Outcome::frame_with(self.frame(), format!("Resized to {}x{}", w, h))
    }

    fn cmd_ticks(&mut self, args: &str) -> Outcome {
        let ticks: Vec<usize> = args
            .split_whitespace()
            .map_while(|t| t.parse().ok())
            .collect();
        let [xt, yt] = ticks.as_slice() else {
            return Outcome::Message("Usage: ticks <x_ticks> <y_ticks>".into());
        };
        // Each count updates independently; invalid ones keep the
        // previous value.
        if *xt > 1 {
            self.x_ticks = *xt;
        }
        if *yt > 1 {
            self.y_ticks = *yt;
        }
        Outcome::frame_with(
            self.frame(),
            format!("Ticks set: x={}, y={}", self.x_ticks, self.y_ticks),
        )
    }

    fn cmd_plot(&mut self, args: &str) -> Outcome {
        let args = args.trim();
        if args.is_empty() {
            // Bare "plot": re-render the current state.
            return Outcome::Frame {
                frame: self.frame(),
                message: None,
            };
        }
        if args.starts_with('"') || args.starts_with('\'') {
            self.cmd_plot_csv(args)
        } else {
            self.cmd_plot_expr(args)
        }
    }

    fn cmd_plot_expr(&mut self, args: &str) -> Outcome {
        let (expr, color) = strip_trailing_color(args, self.expr_color);
        let command = PlotCommand::Expr {
            expr: expr.to_string(),
            color,
        };
        if !self.push_command(command) {
            return Outcome::Message("Error: Plot history is full; `clear` to start over.".into());
        }
        self.replay();
        // A failing expression plot is atomic (nothing drawn), so the
        // canvas already reflects the history without it; drop it.
        if let Some(err) = self.last_replay_error.take() {
            self.history.pop();
            return Outcome::Message(format!("Error: {}", err));
        }
        Outcome::Frame {
            frame: self.frame(),
            message: None,
        }
    }

    fn cmd_plot_csv(&mut self, args: &str) -> Outcome {
        let quote = args.chars().next().unwrap_or('"');
        let body = &args[1..];
        let Some(end) = body.find(quote) else {
            return Outcome::Message("Error: Missing closing quote.".into());
        };
        let path = PathBuf::from(&body[..end]);
        let rest = &body[end + 1..];

        let mut tokens = rest.split_whitespace();
        let xcol = tokens.next().and_then(|t| t.parse::<usize>().ok());
        let ycol = tokens.next().and_then(|t| t.parse::<usize>().ok());
        let (Some(xcol), Some(ycol)) = (xcol, ycol) else {
            return Outcome::Message(
                "Usage: plot \"file.csv\" <x_col> <y_col> [hex_color]".into(),
            );
        };
        let color = tokens
            .next()
            .and_then(Rgb::parse_hex)
            .unwrap_or(self.csv_color);

        // Validate the file up front; a failure must leave the canvas
        // and history untouched.
        let bounds = match plot::read_series(&path, xcol, ycol) {
            Ok((_, bounds)) => bounds,
            Err(err) => return Outcome::Message(format!("Error: {}", err)),
        };
        if !self.view.locked {
            debug!("autoscaling viewport to {:?}", bounds);
            self.view.fit(&bounds);
        }

        let command = PlotCommand::Csv {
            path,
            xcol,
            ycol,
            color,
        };
        if !self.push_command(command) {
            return Outcome::Message("Error: Plot history is full; `clear` to start over.".into());
        }
        self.replay();
        if let Some(err) = self.last_replay_error.take() {
            self.history.pop();
            return Outcome::Message(format!("Error: {}", err));
        }
        Outcome::Frame {
            frame: self.frame(),
            message: None,
        }
    }

    fn push_command(&mut self, command: PlotCommand) -> bool {
        if self.history.len() >= MAX_PLOT_HISTORY {
            warn!("plot history full ({} commands)", MAX_PLOT_HISTORY);
            return false;
        }
        self.history.push(command);
        true
    }

    /// Clears the canvas and replays the whole history in insertion
    /// order under the current viewport. Failures of previously
    /// accepted commands (e.g. a CSV file deleted since) are logged
    /// and skipped; the failure of the most recent command is kept
    /// for its submitter to inspect.
    fn replay(&mut self) {
        self.canvas.clear();
        self.last_replay_error = None;
        let commands = self.history.clone();
        let last = commands.len().wrapping_sub(1);
        for (i, command) in commands.iter().enumerate() {
            if let Err(err) = run_command(&mut self.canvas, &self.view, command) {
                if i == last {
                    self.last_replay_error = Some(err);
                } else {
                    warn!("replay: skipping failed plot: {}", err);
                }
            }
        }
    }
}

/// Executes one recorded command against the canvas. Replay ignores
/// the CSV bounds: autoscale happens only when a command is first
/// submitted.
fn run_command(canvas: &mut Canvas, view: &Viewport, command: &PlotCommand) -> Result<(), PlotError> {
    match command {
        PlotCommand::Expr { expr, color } => plot::plot_function(canvas, expr, *color, view),
        PlotCommand::Csv {
            path,
            xcol,
            ycol,
            color,
        } => plot::plot_csv(canvas, path, *xcol, *ycol, *color, view).map(|_| ()),
    }
}

/// Splits a trailing `0xRRGGBB` token off an expression, if present.
fn strip_trailing_color(args: &str, default: Rgb) -> (&str, Rgb) {
    if let Some((head, tail)) = args.rsplit_once(char::is_whitespace) {
        if tail.starts_with("0x") || tail.starts_with("0X") {
            if let Some(color) = Rgb::parse_hex(tail) {
                return (head.trim_end(), color);
            }
        }
    }
    (args, default)
}

fn split_first_word(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.canvas.width_px = 40;
        config.canvas.height_px = 24;
        config.colors.enabled = false;
        config
    }

    fn pixel_count(canvas: &Canvas) -> usize {
        let mut n = 0;
        for y in 0..canvas.height_px() as i32 {
            for x in 0..canvas.width_px() as i32 {
                if canvas.pixel_is_set(x, y) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn plot_expr_draws_and_records() {
        let mut s = Session::new(&test_config());
        let outcome = s.execute("plot x");
        assert!(matches!(outcome, Outcome::Frame { .. }));
        assert_eq!(s.history().len(), 1);
        assert!(pixel_count(s.canvas()) > 0);
    }

    #[test]
    fn invalid_expression_is_reported_and_not_retained() {
        let mut s = Session::new(&test_config());
        let outcome = s.execute("plot foo(x)");
        match outcome {
            Outcome::Message(msg) => assert!(msg.contains("invalid expression"), "{}", msg),
            other => panic!("expected message, got {:?}", other),
        }
        assert!(s.history().is_empty());
        assert_eq!(pixel_count(s.canvas()), 0);
    }

    #[test]
    fn trailing_hex_token_selects_the_color() {
        let mut s = Session::new(&test_config());
        s.execute("plot x 0xFF00FF");
        assert_eq!(
            s.history(),
            &[PlotCommand::Expr {
                expr: "x".into(),
                color: Rgb::new(0xFF00FF)
            }]
        );
    }

    #[test]
    fn zoom_locks_and_replays() {
        let mut s = Session::new(&test_config());
        s.execute("plot 1");
        let before = pixel_count(s.canvas());
        assert!(before > 0);

        let outcome = s.execute("zoom 2");
        assert!(matches!(outcome, Outcome::Frame { .. }));
        assert!(s.viewport().locked);
        assert_eq!((s.viewport().xmin, s.viewport().xmax), (-5.0, 5.0));
        // y=1 is still inside -2.5..2.5, so the replayed curve spans
        // the full width again.
        assert_eq!(pixel_count(s.canvas()), before);
    }

    #[test]
    fn zoom_rejects_bad_factors() {
        let mut s = Session::new(&test_config());
        for line in ["zoom", "zoom 0", "zoom -2", "zoom abc"] {
            match s.execute(line) {
                Outcome::Message(msg) => assert!(msg.starts_with("Usage:"), "{}", msg),
                other => panic!("{:?}: expected usage message, got {:?}", line, other),
            }
        }
        assert!(!s.viewport().locked);
    }

    #[test]
    fn size_resizes_and_replays_history() {
        let mut s = Session::new(&test_config());
        s.execute("plot 1");
        let outcome = s.execute("size 60 32");
        assert!(matches!(outcome, Outcome::Frame { .. }));
        assert_eq!(s.canvas().width_px(), 60);
        assert!(pixel_count(s.canvas()) > 0, "history not replayed");
    }

    #[test]
    fn csv_plot_autoscales_unless_locked() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,100").unwrap();
        writeln!(file, "4,104").unwrap();
        let line = format!("plot \"{}\" 0 1", file.path().display());

        let mut s = Session::new(&test_config());
        s.execute(&line);
        assert_eq!((s.viewport().xmin, s.viewport().xmax), (0.0, 4.0));
        assert_eq!((s.viewport().ymin, s.viewport().ymax), (100.0, 104.0));

        // Once zoomed, a fresh CSV plot must not move the window.
        let mut locked = Session::new(&test_config());
        locked.execute("zoom 2");
        let view_before = *locked.viewport();
        locked.execute(&line);
        assert_eq!(*locked.viewport(), view_before);
        assert_eq!(locked.history().len(), 1);
    }

    #[test]
    fn csv_errors_leave_state_untouched() {
        let mut s = Session::new(&test_config());
        s.execute("plot 1");
        let view_before = *s.viewport();
        let pixels_before = pixel_count(s.canvas());

        match s.execute("plot \"/nonexistent/data.csv\" 0 1") {
            Outcome::Message(msg) => assert!(msg.starts_with("Error:"), "{}", msg),
            other => panic!("expected message, got {:?}", other),
        }
        assert_eq!(s.history().len(), 1);
        assert_eq!(*s.viewport(), view_before);
        assert_eq!(pixel_count(s.canvas()), pixels_before);
    }

    #[test]
    fn locked_viewport_survives_far_off_csv_values() {
        // With the viewport locked, CSV values around 1e12 project far
        // outside pixel space; the plot must clip and render a frame,
        // not panic in the rasterizer.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,1e12").unwrap();
        writeln!(file, "4,2e12").unwrap();

        let mut s = Session::new(&test_config());
        s.execute("zoom 2");
        let line = format!("plot \"{}\" 0 1", file.path().display());
        let outcome = s.execute(&line);
        assert!(matches!(outcome, Outcome::Frame { .. }));
        assert_eq!(s.history().len(), 1);
        assert_eq!((s.viewport().xmin, s.viewport().xmax), (-5.0, 5.0));
    }

    #[test]
    fn replay_skips_failures_of_previously_accepted_commands() {
        // A CSV plot whose file disappears afterwards must not poison
        // later replays: the command stays in history, the failure is
        // only logged, and the surviving plots still draw.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,0").unwrap();
        writeln!(file, "4,4").unwrap();
        let line = format!("plot \"{}\" 0 1", file.path().display());

        let mut s = Session::new(&test_config());
        s.execute(&line);
        s.execute("plot 1");
        assert_eq!(s.history().len(), 2);

        file.close().unwrap(); // deletes the file
        let outcome = s.execute("zoom 2");
        assert!(matches!(outcome, Outcome::Frame { .. }));
        assert_eq!(s.history().len(), 2);
        assert!(pixel_count(s.canvas()) > 0, "surviving plot not drawn");
    }

    #[test]
    fn csv_command_requires_closing_quote_and_columns() {
        let mut s = Session::new(&test_config());
        assert_eq!(
            s.execute("plot \"data.csv 0 1"),
            Outcome::Message("Error: Missing closing quote.".into())
        );
        match s.execute("plot \"data.csv\" 0") {
            Outcome::Message(msg) => assert!(msg.starts_with("Usage:"), "{}", msg),
            other => panic!("expected usage message, got {:?}", other),
        }
    }

    #[test]
    fn clear_empties_history_and_canvas() {
        let mut s = Session::new(&test_config());
        s.execute("plot 1");
        let outcome = s.execute("clear");
        assert_eq!(outcome, Outcome::Message("Canvas cleared.".into()));
        assert!(s.history().is_empty());
        assert_eq!(pixel_count(s.canvas()), 0);
    }

    #[test]
    fn reset_unlocks_and_restores_the_default_window() {
        let mut s = Session::new(&test_config());
        s.execute("zoom 4 4");
        s.execute("reset");
        assert_eq!(*s.viewport(), Viewport::default());
    }

    #[test]
    fn history_is_bounded() {
        let mut s = Session::new(&test_config());
        for i in 0..MAX_PLOT_HISTORY + 5 {
            s.execute(&format!("plot {}", i % 3));
        }
        assert_eq!(s.history().len(), MAX_PLOT_HISTORY);
    }

    #[test]
    fn ticks_update_independently() {
        let mut s = Session::new(&test_config());
        let outcome = s.execute("ticks 7 1");
        match outcome {
            Outcome::Frame { message, .. } => {
                assert_eq!(message.as_deref(), Some("Ticks set: x=7, y=5"));
            }
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn bare_plot_rerenders_without_message() {
        let mut s = Session::new(&test_config());
        s.execute("plot 1");
        match s.execute("plot") {
            Outcome::Frame { message, .. } => assert!(message.is_none()),
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut s = Session::new(&test_config());
        assert_eq!(s.execute("quit"), Outcome::Quit);
        assert_eq!(s.execute("exit"), Outcome::Quit);
        assert_eq!(
            s.execute("frobnicate"),
            Outcome::Message("Error: Unknown command.".into())
        );
    }
}
