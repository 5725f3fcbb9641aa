//! DBC parser: a single pass over the file's lines.
//!
//! Statement matching lives in [`statements`]; this module owns the pass
//! state: the message currently being built, the finished messages, and
//! attribute assignments waiting for their target message. Attributes may
//! appear anywhere relative to their `BO_` block and are merged at the
//! end; value tables attach as soon as their target message has been
//! started, so a `VAL_` ahead of its `BO_` header is dropped.

pub mod statements;

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::CandbResult;
use crate::types::{AttributeMap, Database, Message};

use statements::SignalValueTable;

/// Parse DBC text into a [`Database`].
///
/// Lines matching none of the recognized statement forms are skipped.
pub fn parse(text: &str) -> CandbResult<Database> {
    let mut messages: Vec<Message> = Vec::new();
    let mut current: Option<Message> = None;
    let mut pending_attributes: HashMap<u32, AttributeMap> = HashMap::new();
    let mut protocol_type = String::from("CAN");

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        trace!(line_number, line, "examining line");

        if let Some(protocol) = statements::protocol_type(line) {
            debug!(%protocol, "protocol type declared");
            protocol_type = protocol;
        }

        if let Some(message) = statements::message_header(line, line_number)? {
            debug!(id = message.id, name = %message.name, "message header");
            if let Some(done) = current.replace(message) {
                debug!(name = %done.name, signals = done.signals.len(), "message finalized");
                messages.push(done);
            }
            continue;
        }

        if let Some(sig) = statements::signal(line, line_number)? {
            match current.as_mut() {
                Some(message) => {
                    debug!(signal = %sig.name, message = %message.name, "signal definition");
                    message.signals.push(sig);
                }
                None => debug!(signal = %sig.name, "signal outside a message, dropped"),
            }
        }

        if let Some(attr) = statements::message_attribute(line, line_number)? {
            debug!(id = attr.message_id, name = %attr.name, value = %attr.value, "message attribute");
            pending_attributes
                .entry(attr.message_id)
                .or_default()
                .insert(attr.name, attr.value);
        }

        if let Some(vt) = statements::value_table(line, line_number)? {
            attach_value_table(&mut messages, current.as_mut(), &vt);
        }
    }

    if let Some(done) = current.take() {
        debug!(name = %done.name, signals = done.signals.len(), "message finalized");
        messages.push(done);
    }

    // Merging is a lookup, not a removal: messages sharing an id each
    // receive the accumulated attributes.
    for message in &mut messages {
        if let Some(attributes) = pending_attributes.get(&message.id) {
            message.attributes = attributes.clone();
        }
    }

    debug!(messages = messages.len(), %protocol_type, "parse complete");
    Ok(Database {
        messages,
        protocol_type,
    })
}

/// Replace the value table of every matching signal in every started
/// message with the same id. The message still under construction counts
/// as started.
fn attach_value_table(
    messages: &mut [Message],
    current: Option<&mut Message>,
    vt: &SignalValueTable,
) {
    let mut attached = false;
    for message in messages.iter_mut().chain(current) {
        if message.id != vt.message_id {
            continue;
        }
        for sig in message
            .signals
            .iter_mut()
            .filter(|s| s.name == vt.signal_name)
        {
            sig.value_table = vt.table.clone();
            attached = true;
        }
    }
    if attached {
        debug!(
            id = vt.message_id,
            signal = %vt.signal_name,
            entries = vt.table.len(),
            "value table attached"
        );
    } else {
        debug!(id = vt.message_id, signal = %vt.signal_name, "value table has no target, dropped");
    }
}
