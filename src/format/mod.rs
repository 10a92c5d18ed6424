//! Wire format of fault records.
//!
//! ## Format of a record
//!
//! Every fault is a single flat JSON object holding:
//! - `Kind`: the discriminator of the value's most-derived variant,
//!   always present, matched case-sensitively against the [`Registry`],
//! - every field declared by that variant and all its ancestors,
//!   side by side rather than nested under an ancestor key,
//! - `Cause`: the record of the upstream fault, or `null` when absent.
//!
//! ```json
//! {"Kind":"NotFound","Message":"vm is gone","Cause":null,"ObjKind":"VirtualMachine","Obj":"vm-42"}
//! ```
//!
//! Field keys are matched exactly first, then ASCII case-insensitively, so
//! records from producers spelling them `message` or `objKind` still decode.
//! Unknown keys are ignored, and a missing or `null` string field is empty.
//!
//! ## Depth of a cause chain
//!
//! A codec encodes and decodes at most [`Config::max_depth`] cause links
//! below the outermost record, failing both ways with [`Error::ChainTooDeep`]
//! past it. The bound is capped to [`MAX_DEPTH`](crate::config::MAX_DEPTH),
//! the deepest chain the parser takes in.
//!
//! ## Sequences
//!
//! A sequence of faults is a JSON array of records, where `null` marks an
//! empty slot that is kept in place when decoding.

use std::sync::OnceLock;

use serde_json::Value;

use crate::{
    config::{Config, UnknownVariantPolicy},
    fault::AnyFault,
    registry::Registry,
};

mod error;
pub use error::{Error, Result};

mod de;
mod record;

mod ser;

/// Key of the discriminator in every record.
pub const KIND: &str = "Kind";

static INSTALLED: OnceLock<Codec> = OnceLock::new();

/// Encodes and decodes fault records against a fixed [`Registry`] and [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Codec {
    registry: Registry,
    config: Config,
}

impl Codec {
    /// Create a codec resolving discriminators in `registry`,
    /// and handling unknown ones with `policy`.
    pub fn new(registry: Registry, policy: UnknownVariantPolicy) -> Self {
        Self::with_config(
            registry,
            Config {
                unknown_variant: policy,
                ..Default::default()
            },
        )
    }

    /// Create a codec resolving discriminators in `registry` with the provided `config`.
    pub fn with_config(registry: Registry, config: Config) -> Self {
        Self { registry, config }
    }

    /// Install this codec as the one used by [`FaultField`](crate::FaultField)
    /// for the rest of the process.
    ///
    /// This must happen before anything decodes through the installed codec,
    /// returning the codec back if one is already in place.
    pub fn install(self) -> Result<(), Codec> {
        INSTALLED.set(self)
    }

    /// The codec installed with [`Codec::install`], or the default one
    /// (builtin registry, rejecting unknown variants) if none was.
    pub fn installed() -> &'static Codec {
        INSTALLED.get_or_init(Codec::default)
    }

    /// The registry this codec resolves discriminators in.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The settings of this codec.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn deserializer(&self) -> de::Deserializer<'_> {
        de::Deserializer::new(&self.registry, &self.config)
    }

    fn parse(&self, input: &[u8]) -> Result<Value> {
        serde_json::from_slice(input).map_err(|source| Error::Parse {
            source,
            snippet: error::snippet_bytes(input, self.config.snippet_len),
        })
    }

    fn check_depth(&self, fault: &AnyFault) -> Result<()> {
        ser::check_depth(fault, self.config.depth_limit())
    }

    /// Encode `fault` to its record tree.
    pub fn to_value(&self, fault: &AnyFault) -> Result<Value> {
        self.check_depth(fault)?;

        Ok(ser::to_value(fault))
    }

    /// Encode `fault` to its textual record.
    pub fn to_string(&self, fault: &AnyFault) -> Result<String> {
        self.check_depth(fault)?;

        ser::to_string(fault)
    }

    /// Encode `fault` to the bytes of its textual record.
    pub fn encode(&self, fault: &AnyFault) -> Result<Vec<u8>> {
        self.check_depth(fault)?;

        ser::to_vec(fault)
    }

    /// Encode a sequence of faults, empty slots becoming `null`.
    pub fn encode_seq(&self, faults: &[Option<AnyFault>]) -> Result<Vec<u8>> {
        for fault in faults.iter().flatten() {
            self.check_depth(fault)?;
        }

        ser::seq_to_vec(faults)
    }

    /// Decode a fault from the bytes of its record, `null` decoding to `None`.
    pub fn decode(&self, input: &[u8]) -> Result<Option<AnyFault>> {
        self.decode_value(&self.parse(input)?)
    }

    /// Decode a fault from its textual record.
    pub fn decode_str(&self, input: &str) -> Result<Option<AnyFault>> {
        self.decode(input.as_bytes())
    }

    /// Decode a fault from an already parsed record tree.
    pub fn decode_value(&self, value: &Value) -> Result<Option<AnyFault>> {
        self.deserializer().deserialize(value)
    }

    /// Decode a fault and narrow it to `T`, failing with
    /// [`Error::CapabilityMismatch`] when the decoded variant does not provide it.
    pub fn decode_as<T>(&self, input: &[u8]) -> Result<Option<T>>
    where
        T: TryFrom<AnyFault>,
        Error: From<T::Error>,
    {
        match self.decode(input)? {
            Some(fault) => Ok(Some(T::try_from(fault)?)),
            None => Ok(None),
        }
    }

    /// Decode a sequence of faults, keeping `null` elements as `None` in place.
    pub fn decode_seq(&self, input: &[u8]) -> Result<Vec<Option<AnyFault>>> {
        self.deserializer().deserialize_seq(&self.parse(input)?)
    }
}
