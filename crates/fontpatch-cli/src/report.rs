//! Progress lines printed to the console while a font is patched.
use crate::patch::Names;
use fontpatch::Metric;
use std::path::Path;
use termimad::{ansi, CompoundStyle, MadSkin};

const RED: u8 = 1;
const GREEN: u8 = 2;
const YELLOW: u8 = 3;
const BLUE: u8 = 4;
const WHITE: u8 = 15;

/// The skin's plain text style in the given colour.
fn plain(colour: u8) -> CompoundStyle {
    let mut style = MadSkin::default().paragraph.compound_style;
    style.set_fg(ansi(colour));
    style
}

/// The skin's bold style in the given colour.
fn bold(colour: u8) -> CompoundStyle {
    let mut style = MadSkin::default().bold;
    style.set_fg(ansi(colour));
    style
}

pub fn blank() {
    println!();
}

/// `Adjusting <metric>: <old> -> <new>`
pub fn adjustment(metric: Metric, old: i64, new: i64) {
    println!(
        "Adjusting {}: {} -> {}",
        bold(YELLOW).apply_to(metric),
        plain(RED).apply_to(old),
        plain(GREEN).apply_to(new),
    );
}

fn label(text: &str, value: &str) {
    println!(
        "{}{}",
        bold(WHITE).apply_to(format!("{:>34} ", text)),
        plain(BLUE).apply_to(value)
    );
}

pub fn summary(names: &Names) {
    println!();
    println!("{}", plain(GREEN).apply_to("Successfully created patched font:"));
    label("Fontname:", &names.fontname);
    label("Family Name:", &names.familyname);
    label("Name for Humans:", &names.fullname);
    println!();
}

pub fn saved(filename: &Path) {
    println!(
        "{} {}",
        plain(GREEN).apply_to("Saved patched font file:"),
        plain(BLUE).apply_to(filename.display().to_string())
    );
}
