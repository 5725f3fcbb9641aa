//! Per-signal encoding derivation for DBF output.
//!
//! DBF addresses signals by byte and bit within the frame, and carries a
//! type tag plus the raw range of the encoded integer. All of it derives
//! from the signal's start bit, bit width, and sign; the physical bounds
//! in the source file play no part here.

use crate::types::{Signal, ValueType};

// ── Placement ─────────────────────────────────────────────────

/// 1-based index of the byte holding the signal's start bit.
pub fn byte_index(start_bit: u32) -> u32 {
    start_bit / 8 + 1
}

/// Bit position of the start bit within its byte.
pub fn bit_index(start_bit: u32) -> u32 {
    start_bit % 8
}

// ── Type tag & raw range ──────────────────────────────────────

/// DBF signal type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Bool,
    Unsigned,
    Signed,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "B",
            Self::Unsigned => "U",
            Self::Signed => "I",
        }
    }
}

/// Type tag and exact raw range of a signal's encoded integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    pub kind: SignalKind,
    pub raw_max: i128,
    pub raw_min: i128,
}

/// Derive the encoding from bit width and sign.
///
/// Single-bit signals are booleans regardless of sign. Wider signals span
/// the full range of their width; signed ranges split around zero with
/// the extra value on the negative side, as in two's complement.
pub fn encoding(signal: &Signal) -> Encoding {
    if signal.length == 1 {
        return Encoding {
            kind: SignalKind::Bool,
            raw_max: 1,
            raw_min: 0,
        };
    }
    // Real signals never exceed 64 bits; the clamp keeps an absurd width
    // in the source file from overflowing the shift.
    let span = signal.length.min(127);
    let range = (1u128 << span) - 1;
    match signal.value_type {
        ValueType::Signed => {
            let half = (range / 2) as i128;
            Encoding {
                kind: SignalKind::Signed,
                raw_max: half,
                raw_min: -half - 1,
            }
        }
        ValueType::Unsigned => Encoding {
            kind: SignalKind::Unsigned,
            raw_max: range as i128,
            raw_min: 0,
        },
    }
}

// ── Float rendering ───────────────────────────────────────────

/// Format a scaling coefficient for DBF output: shortest decimal form,
/// always with a decimal point (`0` renders as `0.0`).
pub fn fmt_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}
