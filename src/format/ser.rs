use serde_json::{Map, Value};

use super::{Error, KIND, Result, record::Fields};
use crate::fault::{AnyFault, FaultCapability};

/// Refuse a chain of more than `max_depth` cause links, which no decoder
/// with the same bound would accept back.
pub(super) fn check_depth(fault: &AnyFault, max_depth: usize) -> Result<()> {
    match fault.chain().nth(max_depth) {
        Some(link) if link.cause().is_some() => Err(Error::ChainTooDeep {
            kind: link.kind(),
            max_depth,
        }),
        _ => Ok(()),
    }
}

/// Serialize `fault` to its record, with every inherited field flattened
/// next to its `Kind` discriminator.
pub(super) fn to_value(fault: &AnyFault) -> Value {
    let mut map = Map::new();
    map.insert(KIND.into(), fault.discriminator().into());
    fault.write_fields(&mut map);

    tracing::trace!("serialized `{}` record", fault.kind());

    Value::Object(map)
}

/// Serialize `fault` to its textual record.
pub(super) fn to_string(fault: &AnyFault) -> Result<String> {
    serde_json::to_string(&to_value(fault)).map_err(Error::Serialize)
}

/// Serialize `fault` to the bytes of its textual record.
pub(super) fn to_vec(fault: &AnyFault) -> Result<Vec<u8>> {
    serde_json::to_vec(&to_value(fault)).map_err(Error::Serialize)
}

/// Serialize a sequence of optional faults, keeping `None` slots as `null`.
pub(super) fn seq_to_vec(faults: &[Option<AnyFault>]) -> Result<Vec<u8>> {
    let value: Value = faults
        .iter()
        .map(|fault| fault.as_ref().map_or(Value::Null, to_value))
        .collect();

    serde_json::to_vec(&value).map_err(Error::Serialize)
}
