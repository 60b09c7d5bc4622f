//! Calculator session state.
//!
//! A [`Session`] is the `(buffer, mode, memory)` tuple a keypad front end
//! drives one [`Key`] at a time. The display is derived from the buffer and is
//! never stored separately, so the two cannot diverge.

use core::fmt;

use serde::Deserialize;
use tracing::trace;

use crate::Real;
use crate::display::format_number;
use crate::engine::calculate;
use crate::types::{AngleMode, ERROR_TEXT, Evaluation};

/// Runtime settings for a new session.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Angle mode the session starts in.
    pub angle_mode: AngleMode,
}

/// One keypad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// `C`: empty the buffer.
    Clear,
    /// `=`: evaluate the buffer and replace it with the result.
    Evaluate,
    /// `DEG/RAD`: switch the angle mode.
    ToggleMode,
    /// `M+`: add the buffer's value to memory.
    MemoryAdd,
    /// `M-`: subtract the buffer's value from memory.
    MemorySubtract,
    /// `MR`: append the memory value to the buffer.
    MemoryRecall,
    /// `MC`: reset memory to zero.
    MemoryClear,
    /// Any other label (digit, operator, function prefix) is appended verbatim.
    Input(String),
}

impl Key {
    /// The keypad label for this key.
    pub fn label(&self) -> &str {
        match self {
            Key::Clear => "C",
            Key::Evaluate => "=",
            Key::ToggleMode => "DEG/RAD",
            Key::MemoryAdd => "M+",
            Key::MemorySubtract => "M-",
            Key::MemoryRecall => "MR",
            Key::MemoryClear => "MC",
            Key::Input(text) => text,
        }
    }
}

impl From<&str> for Key {
    fn from(label: &str) -> Self {
        match label {
            "C" => Key::Clear,
            "=" => Key::Evaluate,
            "DEG/RAD" => Key::ToggleMode,
            "M+" => Key::MemoryAdd,
            "M-" => Key::MemorySubtract,
            "MR" => Key::MemoryRecall,
            "MC" => Key::MemoryClear,
            other => Key::Input(other.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single calculator session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    buffer: String,
    mode: AngleMode,
    memory: Real,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session with an empty buffer, zero memory, in degrees.
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    pub fn with_config(config: &SessionConfig) -> Self {
        Self {
            buffer: String::new(),
            mode: config.angle_mode,
            memory: 0.0,
        }
    }

    /// The expression being edited, or the text of the last result.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// What the calculator shows: the buffer, or `"0"` when it is empty.
    pub fn display(&self) -> &str {
        if self.buffer.is_empty() {
            "0"
        } else {
            &self.buffer
        }
    }

    pub fn mode(&self) -> AngleMode {
        self.mode
    }

    pub fn memory(&self) -> Real {
        self.memory
    }

    /// Whether the buffer holds the error indicator from a failed evaluation.
    pub fn is_error(&self) -> bool {
        self.buffer == ERROR_TEXT
    }

    /// Apply one key and return the resulting session.
    pub fn apply(mut self, key: &Key) -> Self {
        self.press(key);
        self
    }

    /// Apply one key in place.
    pub fn press(&mut self, key: &Key) {
        match key {
            Key::Clear => self.buffer.clear(),
            Key::Evaluate => {
                let result = self.evaluate_buffer();
                self.buffer = result.to_string();
            }
            Key::ToggleMode => self.mode = self.mode.toggled(),
            Key::MemoryAdd => self.accumulate(1.0),
            Key::MemorySubtract => self.accumulate(-1.0),
            Key::MemoryRecall => {
                let text = format_number(self.memory);
                self.append(&text);
            }
            Key::MemoryClear => self.memory = 0.0,
            Key::Input(text) => self.append(text),
        }
        trace!(
            key = %key,
            buffer = %self.buffer,
            mode = %self.mode,
            memory = self.memory,
            "key applied"
        );
    }

    fn evaluate_buffer(&self) -> Evaluation {
        calculate(&self.buffer, self.mode)
    }

    // Typing after an error starts a new expression
    fn append(&mut self, text: &str) {
        if self.is_error() {
            self.buffer.clear();
        }
        self.buffer.push_str(text);
    }

    // Memory only changes when the buffer evaluates and the sum stays finite
    fn accumulate(&mut self, sign: Real) {
        if let Some(value) = self.evaluate_buffer().value() {
            let next = self.memory + sign * value;
            if next.is_finite() {
                self.memory = next;
            }
        }
    }
}
