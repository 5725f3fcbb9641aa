//! DBF encoder: render parsed messages into BUSMASTER database files.
//!
//! Messages split by their `VFrameFormat` attribute into a J1939 document
//! and a classic CAN document. Each document is rendered fully in memory
//! and written to the requested output stem with the family name glued on
//! as a prefix.

pub mod layout;

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{CandbError, CandbResult};
use crate::types::Message;

const BANNER: &str = "//******************************BUSMASTER Messages and signals Database ******************************//";

// ── Frame format ──────────────────────────────────────────────

/// Output family of a message, read from its `VFrameFormat` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    J1939,
    Can,
}

impl FrameFormat {
    /// Classify a message: `3` is J1939, `1` and `2` are classic CAN.
    /// Anything else, including a missing attribute, belongs to neither
    /// output.
    pub fn of(message: &Message) -> Option<Self> {
        match message.attributes.get("VFrameFormat").map(String::as_str) {
            Some("3") => Some(Self::J1939),
            Some("1" | "2") => Some(Self::Can),
            _ => None,
        }
    }

    /// Protocol name in the DBF header.
    pub fn protocol(&self) -> &'static str {
        match self {
            Self::J1939 => "J1939",
            Self::Can => "CAN",
        }
    }

    /// Prefix glued onto the output stem for this family's file.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::J1939 => "J1939_",
            Self::Can => "CAN_",
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────

/// Render one output family as a complete DBF document.
///
/// Lines join with `\n`, and every `[START_MSG]` carries a literal
/// `\r\n` ahead of it; the document ends without a trailing newline.
/// The legacy consumer expects these bytes exactly.
pub fn render(format: FrameFormat, messages: &[&Message]) -> String {
    let mut lines: Vec<String> = vec![
        BANNER.to_string(),
        "[DATABASE_VERSION] 1.3".to_string(),
        format!("[PROTOCOL] {}", format.protocol()),
        "[BUSMASTER_VERSION] [3.2.2]".to_string(),
        format!("[NUMBER_OF_MESSAGES] {}", messages.len()),
    ];

    for message in messages {
        let masked_id = message.id & 0x0FFF_FFFF;
        let ext_flag = if message.id & 0x8000_0000 != 0 { "X" } else { "S" };
        // The signal count includes zero-length signals even though they
        // render no [START_SIGNALS] line.
        lines.push(format!(
            "\r\n[START_MSG] {},{},{},{},1,{}",
            message.name,
            masked_id,
            message.length,
            message.signals.len(),
            ext_flag
        ));

        for (name, value) in &message.attributes {
            lines.push(format!("[ATTRIBUTE] {name} = {value}"));
        }

        for signal in message.signals.iter().filter(|s| s.length > 0) {
            let enc = layout::encoding(signal);
            lines.push(format!(
                "[START_SIGNALS] {},{},{},{},{},{},{},{}, {},{},{},",
                signal.name,
                signal.length,
                layout::byte_index(signal.start_bit),
                layout::bit_index(signal.start_bit),
                enc.kind.as_str(),
                enc.raw_max,
                enc.raw_min,
                signal.byte_order,
                layout::fmt_float(signal.offset),
                layout::fmt_float(signal.factor),
                signal.unit
            ));
            for (value, description) in &signal.value_table {
                lines.push(format!("[VALUE_DESCRIPTION] {description},{value}"));
            }
        }

        lines.push("[END_MSG]".to_string());
    }

    lines.join("\n")
}

// ── Writing ───────────────────────────────────────────────────

/// Paths of the two documents produced by [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbfFiles {
    pub j1939: PathBuf,
    pub can: PathBuf,
}

/// Split `messages` by frame format and write both DBF documents.
///
/// An empty family still produces a well-formed header-only file.
pub fn encode(messages: &[Message], stem: &str) -> CandbResult<DbfFiles> {
    let j1939 = write_family(FrameFormat::J1939, messages, stem)?;
    let can = write_family(FrameFormat::Can, messages, stem)?;
    Ok(DbfFiles { j1939, can })
}

fn write_family(format: FrameFormat, messages: &[Message], stem: &str) -> CandbResult<PathBuf> {
    let selected: Vec<&Message> = messages
        .iter()
        .filter(|m| FrameFormat::of(m) == Some(format))
        .collect();
    let document = render(format, &selected);
    let path = PathBuf::from(format!("{}{}", format.file_prefix(), stem));
    debug!(path = %path.display(), messages = selected.len(), "writing DBF document");
    fs::write(&path, document).map_err(|source| CandbError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Signal, ValueTable, ValueType};

    fn message(id: u32, name: &str, frame_format: Option<&str>) -> Message {
        let mut msg = Message::new(id, name, 8, "ECU");
        if let Some(value) = frame_format {
            msg.attributes
                .insert("VFrameFormat".to_string(), value.to_string());
        }
        msg
    }

    fn rpm_signal() -> Signal {
        Signal {
            name: "RPM".to_string(),
            start_bit: 0,
            length: 16,
            byte_order: "1".to_string(),
            value_type: ValueType::Unsigned,
            factor: 0.25,
            offset: 0.0,
            phy_min_val: 0.0,
            phy_max_val: 16383.75,
            unit: "rpm".to_string(),
            receiver: "Vector__XXX".to_string(),
            value_table: ValueTable::new(),
        }
    }

    #[test]
    fn header_only_document_for_empty_family() {
        let doc = render(FrameFormat::J1939, &[]);
        assert_eq!(
            doc,
            "//******************************BUSMASTER Messages and signals Database ******************************//\n\
             [DATABASE_VERSION] 1.3\n\
             [PROTOCOL] J1939\n\
             [BUSMASTER_VERSION] [3.2.2]\n\
             [NUMBER_OF_MESSAGES] 0"
        );
    }

    #[test]
    fn message_block_layout() {
        let mut msg = message(100, "EngineData", Some("1"));
        let mut sig = rpm_signal();
        sig.value_table.insert(0, "Stopped".to_string());
        msg.signals.push(sig);

        let doc = render(FrameFormat::Can, &[&msg]);
        let expected = "//******************************BUSMASTER Messages and signals Database ******************************//\n\
            [DATABASE_VERSION] 1.3\n\
            [PROTOCOL] CAN\n\
            [BUSMASTER_VERSION] [3.2.2]\n\
            [NUMBER_OF_MESSAGES] 1\n\
            \r\n[START_MSG] EngineData,100,8,1,1,S\n\
            [ATTRIBUTE] VFrameFormat = 1\n\
            [START_SIGNALS] RPM,16,1,0,U,65535,0,1, 0.0,0.25,rpm,\n\
            [VALUE_DESCRIPTION] Stopped,0\n\
            [END_MSG]";
        assert_eq!(doc, expected);
    }

    #[test]
    fn extended_ids_are_masked_and_flagged() {
        let msg = message(0x8CF0_0400, "EEC1", Some("3"));
        let doc = render(FrameFormat::J1939, &[&msg]);
        assert!(doc.contains("\r\n[START_MSG] EEC1,217056256,8,0,1,X\n"));
    }

    #[test]
    fn standard_ids_keep_the_s_flag() {
        let msg = message(0x123, "DashStatus", Some("2"));
        let doc = render(FrameFormat::Can, &[&msg]);
        assert!(doc.contains("\r\n[START_MSG] DashStatus,291,8,0,1,S\n"));
    }

    #[test]
    fn zero_length_signals_count_but_do_not_render() {
        let mut msg = message(100, "Sparse", Some("1"));
        let mut ghost = rpm_signal();
        ghost.name = "Ghost".to_string();
        ghost.length = 0;
        msg.signals.push(ghost);
        msg.signals.push(rpm_signal());

        let doc = render(FrameFormat::Can, &[&msg]);
        assert!(doc.contains("[START_MSG] Sparse,100,8,2,1,S"));
        assert!(!doc.contains("Ghost"));
        assert!(doc.contains("[START_SIGNALS] RPM,"));
    }

    #[test]
    fn signed_signal_line_uses_integer_tag() {
        let mut msg = message(100, "Torque", Some("1"));
        let mut sig = rpm_signal();
        sig.name = "DemandTorque".to_string();
        sig.start_bit = 8;
        sig.length = 8;
        sig.value_type = ValueType::Signed;
        sig.factor = 1.0;
        sig.offset = -125.0;
        sig.unit = "%".to_string();
        msg.signals.push(sig);

        let doc = render(FrameFormat::Can, &[&msg]);
        assert!(doc.contains("[START_SIGNALS] DemandTorque,8,2,0,I,127,-128,1, -125.0,1.0,%,"));
    }

    #[test]
    fn partition_covers_recognized_values_only() {
        let messages = [
            message(1, "A", Some("1")),
            message(2, "B", Some("2")),
            message(3, "C", Some("3")),
            message(4, "D", None),
            message(5, "E", Some("9")),
        ];
        let names = |format: FrameFormat| -> Vec<&str> {
            messages
                .iter()
                .filter(|m| FrameFormat::of(m) == Some(format))
                .map(|m| m.name.as_str())
                .collect()
        };
        assert_eq!(names(FrameFormat::J1939), vec!["C"]);
        assert_eq!(names(FrameFormat::Can), vec!["A", "B"]);
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut msg = message(100, "EngineData", Some("1"));
        msg.signals.push(rpm_signal());
        let selected = vec![&msg];
        assert_eq!(
            render(FrameFormat::Can, &selected),
            render(FrameFormat::Can, &selected)
        );
    }
}
