//! Startup banner with a vertical gradient (LEGAL CONSULT).

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Navy (#1f3a93).
const NAVY: (u8, u8, u8) = (0x1f, 0x3a, 0x93);
/// Brass (#d4a017).
const BRASS: (u8, u8, u8) = (0xd4, 0xa0, 0x17);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Render `text` with the built-in figlet font; plain text if the font is unavailable.
fn render_art(text: &str) -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(text).map(|figure| figure.to_string()))
        .unwrap_or_else(|| format!("{}\n", text))
}

/// Prints the welcome banner from Navy to Brass, then version and the disclaimer line.
pub fn print_welcome() {
    let mut out = stdout();
    let art = render_art("LEGAL CONSULT");
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(NAVY, BRASS, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: BRASS.0,
        g: BRASS.1,
        b: BRASS.2,
    }));
    let _ = out.execute(Print(format!("v{}\r\n", version)));
    let _ = out.execute(Print(
        "Informational reports only. Not legal advice from a licensed advocate.\r\n",
    ));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
