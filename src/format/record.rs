//! Flattened field layout of each variant.
//!
//! A variant writes and reads its parent's fields first, then its own,
//! all at the same level of the record.

use serde_json::{Map, Value};

use super::{Error, Result, de::Deserializer, error::type_name, ser};
use crate::fault::{AnyFault, Fault, Kind, NotFound, RuntimeFault};

pub(super) const MESSAGE: &str = "Message";
pub(super) const CAUSE: &str = "Cause";
pub(super) const OBJ_KIND: &str = "ObjKind";
pub(super) const OBJ: &str = "Obj";

/// Find `field` in `map`, preferring an exact key over a case-insensitive one.
pub(super) fn field<'v>(map: &'v Map<String, Value>, field: &str) -> Option<&'v Value> {
    map.get(field).or_else(|| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    })
}

/// A record being read into the variant `kind`.
pub(super) struct Record<'r> {
    pub(super) de: &'r Deserializer<'r>,
    pub(super) kind: Kind,
    pub(super) value: &'r Value,
    pub(super) map: &'r Map<String, Value>,
    pub(super) depth: usize,
}

impl<'r> Record<'r> {
    fn get(&self, name: &str) -> Option<&'r Value> {
        field(self.map, name)
    }

    fn mismatch(&self, field: &'static str, expected: &'static str, found: &Value) -> Error {
        Error::FieldDecode {
            kind: self.kind,
            field,
            expected,
            found: type_name(found),
            snippet: self.de.snippet(self.value),
        }
    }

    /// Read a string field, a missing or `null` one being empty.
    fn string(&self, field: &'static str) -> Result<String> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(value)) => Ok(value.clone()),
            Some(other) => Err(self.mismatch(field, "a string", other)),
        }
    }

    /// Read a nested fault, resolving its own discriminator.
    fn fault(&self, field: &'static str) -> Result<Option<AnyFault>> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Object(_)) if self.depth >= self.de.depth_limit() => {
                Err(Error::ChainTooDeep {
                    kind: self.kind,
                    max_depth: self.de.depth_limit(),
                })
            }
            Some(value @ (Value::Null | Value::Object(_))) => {
                self.de.deserialize_at(value, self.depth + 1)
            }
            Some(other) => Err(self.mismatch(field, "a record", other)),
        }
    }
}

/// Field layout of one variant of the hierarchy.
pub(super) trait Fields {
    fn write_fields(&self, map: &mut Map<String, Value>);

    fn read_fields(&mut self, record: &Record<'_>) -> Result<()>;
}

impl Fields for Fault {
    fn write_fields(&self, map: &mut Map<String, Value>) {
        map.insert(MESSAGE.into(), self.message.clone().into());
        map.insert(
            CAUSE.into(),
            self.cause.as_deref().map_or(Value::Null, ser::to_value),
        );
    }

    fn read_fields(&mut self, record: &Record<'_>) -> Result<()> {
        self.message = record.string(MESSAGE)?;
        self.cause = record.fault(CAUSE)?.map(Box::new);

        Ok(())
    }
}

impl Fields for RuntimeFault {
    fn write_fields(&self, map: &mut Map<String, Value>) {
        self.fault.write_fields(map);
    }

    fn read_fields(&mut self, record: &Record<'_>) -> Result<()> {
        self.fault.read_fields(record)
    }
}

impl Fields for NotFound {
    fn write_fields(&self, map: &mut Map<String, Value>) {
        self.runtime.write_fields(map);

        map.insert(OBJ_KIND.into(), self.obj_kind.clone().into());
        map.insert(OBJ.into(), self.obj.clone().into());
    }

    fn read_fields(&mut self, record: &Record<'_>) -> Result<()> {
        self.runtime.read_fields(record)?;

        self.obj_kind = record.string(OBJ_KIND)?;
        self.obj = record.string(OBJ)?;

        Ok(())
    }
}

impl Fields for AnyFault {
    fn write_fields(&self, map: &mut Map<String, Value>) {
        match self {
            Self::Fault(fault) => fault.write_fields(map),
            Self::RuntimeFault(fault) => fault.write_fields(map),
            Self::NotFound(fault) => fault.write_fields(map),
        }
    }

    fn read_fields(&mut self, record: &Record<'_>) -> Result<()> {
        match self {
            Self::Fault(fault) => fault.read_fields(record),
            Self::RuntimeFault(fault) => fault.read_fields(record),
            Self::NotFound(fault) => fault.read_fields(record),
        }
    }
}
