//! User-facing status lines. Diagnostics go through `log` instead.

use std::fmt::Display;

pub fn info(message: impl Display) {
    println!("✅ Info: {message}");
}

pub fn error(message: impl Display) {
    eprintln!("❌ Error: {message}");
}

pub fn item(name: impl Display) {
    println!("  - {name}");
}
