use std::net::IpAddr;

use checklb_common::network::probe::{ProbeResult, Status};
use colored::*;

pub const WARNING: Color = Color::Yellow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Warning,
}

/// `<address>\t<status line>`, e.g. `10.0.0.5\t200 OK`.
pub fn result_line(addr: &IpAddr, status: &Status) -> String {
    format!("{addr}\t{status}")
}

/// Anything but `200` stands out.
pub fn line_style(status: &Status) -> LineStyle {
    if status.is_ok() {
        LineStyle::Plain
    } else {
        LineStyle::Warning
    }
}

pub fn styled(line: &str, style: LineStyle) -> ColoredString {
    match style {
        LineStyle::Plain => line.normal(),
        LineStyle::Warning => line.color(WARNING),
    }
}

/// Renders a successful probe; `None` for failed ones, which go to stderr.
pub fn render(result: &ProbeResult) -> Option<ColoredString> {
    let status = result.status()?;
    let line = result_line(&result.addr, status);
    Some(styled(&line, line_style(status)))
}
