//! Core CAN database types shared by the DBC parser and the DBF encoder.

use indexmap::IndexMap;

/// Message attributes keyed by attribute name, in file order.
///
/// Re-assigning an existing key updates the value in place and keeps the
/// key's original position.
pub type AttributeMap = IndexMap<String, String>;

/// Raw-value-to-description table of a signal, in declaration order.
pub type ValueTable = IndexMap<u64, String>;

// ── Value Type ────────────────────────────────────────────────

/// Sign of a signal's raw value (`+` or `-` in DBC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Unsigned,
    Signed,
}

// ── Signal ────────────────────────────────────────────────────

/// One signal of a CAN message.
///
/// `factor` and `offset` relate raw and physical values
/// (physical = raw * factor + offset). The physical bounds are carried
/// for completeness; the DBF encoder derives raw ranges from bit width
/// and sign alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    /// Bit offset of the start bit, interpreted per `byte_order`.
    pub start_bit: u32,
    /// Bit width; 0 is tolerated and skipped by the encoder.
    pub length: u32,
    /// DBC byte-order digit, passed through to output unchanged.
    pub byte_order: String,
    pub value_type: ValueType,
    pub factor: f64,
    pub offset: f64,
    pub phy_min_val: f64,
    pub phy_max_val: f64,
    pub unit: String,
    pub receiver: String,
    /// Filled in when a matching value-table statement is found.
    pub value_table: ValueTable,
}

// ── Message ───────────────────────────────────────────────────

/// One CAN message and the signals it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Raw identifier; bit 31 flags an extended frame.
    pub id: u32,
    pub name: String,
    /// Payload length in bytes.
    pub length: u32,
    /// Transmitting node, informational only.
    pub node: String,
    pub signals: Vec<Signal>,
    pub attributes: AttributeMap,
}

impl Message {
    /// Create a message with no signals or attributes yet.
    pub fn new(id: u32, name: impl Into<String>, length: u32, node: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            length,
            node: node.into(),
            signals: Vec::new(),
            attributes: AttributeMap::new(),
        }
    }
}

// ── Database ──────────────────────────────────────────────────

/// Everything extracted from one DBC file.
#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    pub messages: Vec<Message>,
    /// Network protocol declared in the file; defaults to `"CAN"`.
    pub protocol_type: String,
}
