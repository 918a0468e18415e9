//! ANSI SGR colorizing for terminal output

use std::fmt;

/// ANSI SGR codes used by the console renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorCode {
    Bold = 1,
    Black = 30,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
    White = 37,
    DarkGray = 90,
}

impl ColorCode {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

const RESET: &str = "\x1b[0m";

/// Wrap `value` in a set/reset escape pair, or pass it through when `disabled`
pub fn colorize(value: impl fmt::Display, color: ColorCode, disabled: bool) -> String {
    if disabled {
        value.to_string()
    } else {
        format!("\x1b[{}m{}{}", color.code(), value, RESET)
    }
}

/// Apply `inner` first, then wrap the result in `outer`
///
/// `colorize_nested("ERR", ColorCode::Red, ColorCode::Bold, false)` yields
/// `ESC[1m ESC[31m ERR ESC[0m ESC[0m`.
pub fn colorize_nested(
    value: impl fmt::Display,
    inner: ColorCode,
    outer: ColorCode,
    disabled: bool,
) -> String {
    colorize(colorize(value, inner, disabled), outer, disabled)
}

/// Remove every `ESC[...m` sequence from `s`
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}
