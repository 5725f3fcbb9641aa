//! Statement matchers for the DBC line grammar.
//!
//! One `LazyLock<Regex>` per recognized statement form. Each matcher
//! returns `Ok(None)` when the line is not that statement; a line that
//! matches but carries a numeric literal that does not fit its type is a
//! fatal error. Everything else in a DBC file (comments, node lists,
//! attribute definitions, multiplexed signals) falls through unmatched.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{CandbError, CandbResult};
use crate::types::{Message, Signal, ValueTable, ValueType};

// BA_ "ProtocolType" "J1939";
static RE_PROTOCOL_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^BA_ "ProtocolType" "(.*?)";"#).unwrap());

// BO_ 2364540158 EEC1: 8 Vector__XXX
static RE_MESSAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BO_ (\d+) (\w+): (\d+) (\w+)").unwrap());

// SG_ EngineSpeed : 24|16@1+ (0.125,0) [0|8031.875] "rpm" Vector__XXX
// Range bounds accept plain decimals or exponent notation.
static RE_SIGNAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*SG_ (\w+) : (\d+)\|(\d+)@(\d+)([+-]) \(([\d.]+),([\d.-]+)\) \[([-+]?\d*\.?\d+(?:[eE][-+]?\d+)?|\d*\.?\d+)\|([-+]?\d*\.?\d+(?:[eE][-+]?\d+)?|\d*\.?\d+)\] "(.*?)"\s+(\w+)"#,
    )
    .unwrap()
});

// BA_ "VFrameFormat" BO_ 2364540158 3;
static RE_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^BA_ "(\w+)" BO_ (\d+) (\w+);"#).unwrap());

// VAL_ 256 CurrentGear 0 "Neutral" 1 "First";
static RE_VALUE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^VAL_ (\d+) (\w+) (.+);").unwrap());

// One value-description pair inside a VAL_ body: 0 "Neutral"
static RE_VALUE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\d+) "(.*?)""#).unwrap());

/// Attribute assignment parsed from a `BA_ ... BO_` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAttribute {
    pub message_id: u32,
    pub name: String,
    pub value: String,
}

/// Value table parsed from a `VAL_` statement, addressed to one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalValueTable {
    pub message_id: u32,
    pub signal_name: String,
    pub table: ValueTable,
}

/// Try to parse a network-level `ProtocolType` declaration.
pub fn protocol_type(line: &str) -> Option<String> {
    let caps = RE_PROTOCOL_TYPE.captures(line)?;
    Some(caps[1].to_string())
}

/// Try to parse a `BO_` message header.
pub fn message_header(line: &str, line_number: usize) -> CandbResult<Option<Message>> {
    let Some(caps) = RE_MESSAGE.captures(line) else {
        return Ok(None);
    };
    let id: u32 = number(&caps[1], "message id", line_number)?;
    let length: u32 = number(&caps[3], "message length", line_number)?;
    Ok(Some(Message::new(id, &caps[2], length, &caps[4])))
}

/// Try to parse an `SG_` signal definition.
pub fn signal(line: &str, line_number: usize) -> CandbResult<Option<Signal>> {
    let Some(caps) = RE_SIGNAL.captures(line) else {
        return Ok(None);
    };
    let start_bit: u32 = number(&caps[2], "signal start bit", line_number)?;
    let length: u32 = number(&caps[3], "signal length", line_number)?;
    let value_type = if &caps[5] == "-" {
        ValueType::Signed
    } else {
        ValueType::Unsigned
    };
    let factor: f64 = number(&caps[6], "signal factor", line_number)?;
    let offset: f64 = number(&caps[7], "signal offset", line_number)?;
    let phy_min_val: f64 = number(&caps[8], "signal minimum", line_number)?;
    let phy_max_val: f64 = number(&caps[9], "signal maximum", line_number)?;
    Ok(Some(Signal {
        name: caps[1].to_string(),
        start_bit,
        length,
        byte_order: caps[4].to_string(),
        value_type,
        factor,
        offset,
        phy_min_val,
        phy_max_val,
        unit: caps[10].to_string(),
        receiver: caps[11].to_string(),
        value_table: ValueTable::new(),
    }))
}

/// Try to parse a `BA_ ... BO_` message attribute assignment.
///
/// Only unquoted (identifier or integer) values match; string-valued
/// attributes are a different grammar and are skipped.
pub fn message_attribute(line: &str, line_number: usize) -> CandbResult<Option<MessageAttribute>> {
    let Some(caps) = RE_ATTRIBUTE.captures(line) else {
        return Ok(None);
    };
    let message_id: u32 = number(&caps[2], "message id", line_number)?;
    Ok(Some(MessageAttribute {
        message_id,
        name: caps[1].to_string(),
        value: caps[3].to_string(),
    }))
}

/// Try to parse a `VAL_` value table for one signal of one message.
pub fn value_table(line: &str, line_number: usize) -> CandbResult<Option<SignalValueTable>> {
    let Some(caps) = RE_VALUE_TABLE.captures(line) else {
        return Ok(None);
    };
    let message_id: u32 = number(&caps[1], "message id", line_number)?;
    let mut table = ValueTable::new();
    for pair in RE_VALUE_PAIR.captures_iter(&caps[3]) {
        let value: u64 = number(&pair[1], "table value", line_number)?;
        table.insert(value, pair[2].to_string());
    }
    Ok(Some(SignalValueTable {
        message_id,
        signal_name: caps[2].to_string(),
        table,
    }))
}

fn number<T: std::str::FromStr>(text: &str, what: &'static str, line: usize) -> CandbResult<T> {
    text.parse().map_err(|_| CandbError::InvalidNumber {
        line,
        what,
        text: text.to_string(),
    })
}
