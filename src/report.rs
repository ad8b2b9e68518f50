use crate::{Error, Report};
use std::io::{self, IsTerminal, Write};
use yansi::Paint;

/// Writes the human-readable progress of a run
pub struct Reporter<W = io::Stdout> {
    out: W,
    color: bool,
}

impl Reporter {
    /// Reporter on stdout, colored when stdout is a terminal
    pub fn stdout(color: bool) -> Self {
        let color = color && io::stdout().is_terminal();
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn listing(&mut self) {
        self.line(format_args!("🔍 Listing available tools..."));
    }

    pub fn tools(&mut self, names: &[String]) {
        self.line(format_args!("Available tools: {names:?}"));
    }

    pub fn calling(&mut self, tool: &str) {
        self.line(format_args!("\n🧪 Testing {tool} tool..."));
    }

    pub fn success(&mut self, report: &Report) {
        let marker = self.green_marker("✅ Tool call successful!");
        self.line(format_args!("{marker}"));
        self.line(format_args!("Response: {}...", report.preview));
    }

    pub fn failure(&mut self, err: &Error) {
        let marker = self.yellow_marker("❌ Test failed:");
        self.line(format_args!("{marker} {err}"));
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        // A closed stdout must not turn a passing run into a panic
        let _ = writeln!(self.out, "{args}");
        let _ = self.out.flush();
    }

    fn green_marker(&self, text: &str) -> String {
        if self.color {
            paint_green_bold(text)
        } else {
            text.to_string()
        }
    }

    fn yellow_marker(&self, text: &str) -> String {
        if self.color {
            paint_yellow_bold(text)
        } else {
            text.to_string()
        }
    }
}

fn paint_green_bold(input: &str) -> String {
    Paint::green(input).bold().to_string()
}

fn paint_yellow_bold(input: &str) -> String {
    Paint::yellow(input).bold().to_string()
}
