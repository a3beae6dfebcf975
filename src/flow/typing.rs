//! Typing effect as an explicit keystroke script
//!
//! The browser driver walks a `TypingScript`, sleeping `delay_before_ms` and then
//! appending `ch` to the target. Splitting the timing out of the driver makes the
//! exact sequence of visible contents testable without timers.

use std::cell::Cell;
use std::rc::Rc;

/// One character to append after waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub ch: char,
    pub delay_before_ms: u32,
}

/// Iterator over the keystrokes that reveal `lines`
///
/// Every character is followed by `char_delay_ms`; a line break is preceded by an
/// additional `line_pause_ms`. No break follows the last line.
#[derive(Debug, Clone)]
pub struct TypingScript {
    lines: Vec<Vec<char>>,
    char_delay_ms: u32,
    line_pause_ms: u32,
    line: usize,
    col: usize,
    pending_delay: u32,
    pending_newline: bool,
}

impl TypingScript {
    pub fn new<S: AsRef<str>>(lines: &[S], char_delay_ms: u32, line_pause_ms: u32) -> Self {
        Self {
            lines: lines.iter().map(|l| l.as_ref().chars().collect()).collect(),
            char_delay_ms,
            line_pause_ms,
            line: 0,
            col: 0,
            pending_delay: 0,
            pending_newline: false,
        }
    }

    /// Visible contents after each keystroke
    pub fn partials(self) -> Vec<String> {
        let mut text = String::new();
        self.map(|k| {
            text.push(k.ch);
            text.clone()
        })
        .collect()
    }
}

impl Iterator for TypingScript {
    type Item = Keystroke;

    fn next(&mut self) -> Option<Keystroke> {
        loop {
            let chars = self.lines.get(self.line)?;

            if self.pending_newline {
                self.pending_newline = false;
                return Some(Keystroke {
                    ch: '\n',
                    delay_before_ms: std::mem::take(&mut self.pending_delay),
                });
            }

            if let Some(&ch) = chars.get(self.col) {
                self.col += 1;
                let delay_before_ms = std::mem::replace(&mut self.pending_delay, self.char_delay_ms);
                return Some(Keystroke { ch, delay_before_ms });
            }

            // Line finished
            self.line += 1;
            self.col = 0;
            if self.line < self.lines.len() {
                self.pending_delay += self.line_pause_ms;
                self.pending_newline = true;
            }
        }
    }
}

/// Shared cancel flag for a running typing effect
#[derive(Debug, Clone, Default)]
pub struct TypingHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TypingHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
