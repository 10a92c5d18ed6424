use serde_json::{Map, Value};

use super::{
    Error, KIND, Result,
    error::{snippet, type_name},
    record::{self, Fields, Record},
};
use crate::{
    config::{Config, UnknownVariantPolicy},
    fault::{AnyFault, FaultCapability, Kind},
    registry::{Registry, UnknownVariant},
};

/// Materializes fault records from an already parsed tree.
pub(super) struct Deserializer<'c> {
    registry: &'c Registry,
    config: &'c Config,
}

impl<'c> Deserializer<'c> {
    pub(super) fn new(registry: &'c Registry, config: &'c Config) -> Self {
        Self { registry, config }
    }

    pub(super) fn snippet(&self, value: &Value) -> String {
        snippet(value, self.config.snippet_len)
    }

    pub(super) fn depth_limit(&self) -> usize {
        self.config.depth_limit()
    }

    fn deserialize_kind<'v>(&self, map: &'v Map<String, Value>, value: &Value) -> Result<&'v str> {
        match record::field(map, KIND) {
            Some(Value::String(kind)) => Ok(kind.as_str()),
            None => Err(Error::MissingKind {
                snippet: self.snippet(value),
            }),
            Some(other) => Err(Error::InvalidKind {
                found: type_name(other),
                snippet: self.snippet(value),
            }),
        }
    }

    fn instantiate(&self, kind: &str, value: &Value) -> Result<AnyFault> {
        match self.registry.lookup(kind) {
            Ok(factory) => Ok(factory()),
            Err(UnknownVariant(kind)) => match self.config.unknown_variant {
                UnknownVariantPolicy::Reject => Err(Error::UnknownVariant {
                    kind,
                    snippet: self.snippet(value),
                }),
                UnknownVariantPolicy::FallbackToBase => {
                    tracing::warn!("unknown fault variant `{kind}`, decoding as `Fault`");

                    Ok(AnyFault::zeroed(Kind::Fault))
                }
            },
        }
    }

    /// Deserialize the record `value`, `null` being no fault at all.
    pub(super) fn deserialize(&self, value: &Value) -> Result<Option<AnyFault>> {
        self.deserialize_at(value, 0)
    }

    /// Deserialize the record `value`, found `depth` cause links below the outermost one.
    pub(super) fn deserialize_at(&self, value: &Value, depth: usize) -> Result<Option<AnyFault>> {
        let map = match value {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            other => {
                return Err(Error::NotARecord {
                    found: type_name(other),
                    snippet: self.snippet(value),
                });
            }
        };

        let mut fault = self.instantiate(self.deserialize_kind(map, value)?, value)?;

        let record = Record {
            de: self,
            kind: fault.kind(),
            value,
            map,
            depth,
        };
        fault.read_fields(&record)?;

        tracing::trace!("deserialized `{}` record", fault.kind());

        Ok(Some(fault))
    }

    /// Deserialize every element of the sequence `value`.
    pub(super) fn deserialize_seq(&self, value: &Value) -> Result<Vec<Option<AnyFault>>> {
        let Value::Array(items) = value else {
            return Err(Error::NotASequence {
                found: type_name(value),
                snippet: self.snippet(value),
            });
        };

        items.iter().map(|item| self.deserialize(item)).collect()
    }
}
