//! Fault-typed members of serializable containers.
//!
//! A container generically (de-)serialized with `serde` cannot know which
//! variant to build for a member declared as [`AnyFault`], only the
//! [`Codec`] can. [`FaultField`] holds such a member and routes its
//! (de-)serialization through the [installed](Codec::installed) codec.
//!
//! ```
//! use fault_wire::{AnyFault, field};
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Report {
//!     #[serde(with = "field::option", default)]
//!     last: Option<AnyFault>,
//!
//!     #[serde(with = "field::seq", default)]
//!     history: Vec<Option<AnyFault>>,
//! }
//! ```

use serde::{
    Deserialize, Deserializer, Serialize, Serializer, de::Error as _, ser::Error as _,
};
use serde_json::Value;

use crate::{fault::AnyFault, format::Codec};

/// A holder for an optional fault member, (de-)serialized by the codec.
///
/// Since an absent member is `null` on the wire, a container should mark the
/// field `#[serde(default)]` to accept records omitting it entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultField(Option<AnyFault>);

impl FaultField {
    /// Wrap `fault` for (de-)serialization.
    pub fn wrap(fault: impl Into<Option<AnyFault>>) -> Self {
        Self(fault.into())
    }

    /// Unwrap the held fault, if any.
    pub fn into_inner(self) -> Option<AnyFault> {
        self.0
    }

    /// Borrow the held fault, if any.
    pub fn get(&self) -> Option<&AnyFault> {
        self.0.as_ref()
    }
}

impl From<Option<AnyFault>> for FaultField {
    fn from(value: Option<AnyFault>) -> Self {
        Self(value)
    }
}

impl From<AnyFault> for FaultField {
    fn from(value: AnyFault) -> Self {
        Self(Some(value))
    }
}

impl From<FaultField> for Option<AnyFault> {
    fn from(value: FaultField) -> Self {
        value.0
    }
}

/// Wrap every element of `faults`, keeping empty slots in place.
pub fn wrap_all(faults: Vec<Option<AnyFault>>) -> Vec<FaultField> {
    faults.into_iter().map(FaultField).collect()
}

/// Unwrap every element of `fields`, keeping empty slots in place.
pub fn unwrap_all(fields: Vec<FaultField>) -> Vec<Option<AnyFault>> {
    fields.into_iter().map(FaultField::into_inner).collect()
}

struct Borrowed<'f>(Option<&'f AnyFault>);

impl Serialize for Borrowed<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(fault) => Codec::installed()
                .to_value(fault)
                .map_err(S::Error::custom)?
                .serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl Serialize for FaultField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Borrowed(self.get()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FaultField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        Codec::installed()
            .decode_value(&value)
            .map(Self)
            .map_err(D::Error::custom)
    }
}

/// `#[serde(with = "field::option")]` for `Option<AnyFault>` members.
pub mod option {
    use super::*;

    /// Serialize the member as a record, or `null`.
    pub fn serialize<S: Serializer>(
        fault: &Option<AnyFault>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        Borrowed(fault.as_ref()).serialize(serializer)
    }

    /// Deserialize the member from a record, or `null`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<AnyFault>, D::Error> {
        FaultField::deserialize(deserializer).map(FaultField::into_inner)
    }
}

/// `#[serde(with = "field::seq")]` for `Vec<Option<AnyFault>>` members.
pub mod seq {
    use super::*;

    /// Serialize the member as an array of records or `null`s.
    pub fn serialize<S: Serializer>(
        faults: &[Option<AnyFault>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(faults.iter().map(|fault| Borrowed(fault.as_ref())))
    }

    /// Deserialize the member from an array of records or `null`s.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<AnyFault>>, D::Error> {
        Vec::<FaultField>::deserialize(deserializer).map(unwrap_all)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fault::{Fault, NotFound, RuntimeFault};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Container {
        #[serde(rename = "FaultField", default)]
        fault: FaultField,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ArrayContainer {
        #[serde(rename = "Faults", with = "seq", default)]
        faults: Vec<Option<AnyFault>>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct OptionContainer {
        #[serde(with = "option", default)]
        cause: Option<AnyFault>,

        label: String,
    }

    fn not_found() -> AnyFault {
        NotFound::new("test message", "VirtualMachine", "vm-42")
            .with_cause(RuntimeFault::new("inner message"))
            .into()
    }

    #[test]
    fn container_field() {
        let container = Container {
            fault: FaultField::wrap(not_found()),
        };

        let encoded = serde_json::to_string(&container).unwrap();
        let decoded: Container = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, container);
        assert_eq!(
            decoded.fault.get().and_then(|f| f.as_not_found().ok()).map(|nf| &nf.obj),
            Some(&"vm-42".to_string())
        );
    }

    #[test]
    fn container_field_absent() {
        let decoded: Container = serde_json::from_str(r#"{"FaultField":null}"#).unwrap();
        assert_eq!(decoded.fault, FaultField::default());

        let decoded: Container = serde_json::from_str("{}").unwrap();
        assert_eq!(decoded.fault.into_inner(), None);

        let empty = Container {
            fault: FaultField::default(),
        };
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            json!({ "FaultField": null })
        );
    }

    #[test]
    fn container_field_rejects_bad_records() {
        let err = serde_json::from_str::<Container>(r#"{"FaultField":{"Message":"no kind"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Kind"), "{err}");

        let err = serde_json::from_str::<Container>(r#"{"FaultField":{"Kind":"Bogus"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Bogus"), "{err}");
    }

    #[test]
    fn container_field_refuses_deep_chains() {
        let limit = Codec::installed().config().depth_limit();
        let deep = (0..=limit).fold(AnyFault::from(Fault::new("root")), |cause, _| {
            AnyFault::from(RuntimeFault::new("link").with_cause(cause))
        });

        let err = serde_json::to_string(&Container {
            fault: FaultField::wrap(deep),
        })
        .unwrap_err();
        assert!(err.to_string().contains("deeper than"), "{err}");
    }

    #[test]
    fn array_container() {
        let container = ArrayContainer {
            faults: vec![
                Some(Fault::new("test message").into()),
                Some(RuntimeFault::new("test message").into()),
                Some(not_found()),
            ],
        };

        let encoded = serde_json::to_string(&container).unwrap();
        let decoded: ArrayContainer = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, container);
    }

    #[test]
    fn array_container_with_gaps() {
        let input = json!({
            "Faults": [
                { "Kind": "NotFound", "Message": "a", "ObjKind": "Disk", "Obj": "d-1" },
                null,
                { "Kind": "RuntimeFault", "Message": "b" },
            ]
        });

        let decoded: ArrayContainer = serde_json::from_value(input).unwrap();
        let kinds: Vec<_> = decoded
            .faults
            .iter()
            .map(|fault| fault.as_ref().map(AnyFault::discriminator))
            .collect();

        assert_eq!(kinds, [Some("NotFound"), None, Some("RuntimeFault")]);

        let reencoded = serde_json::to_value(&decoded).unwrap();
        assert_eq!(reencoded["Faults"][1], Value::Null);
        assert_eq!(reencoded["Faults"][2]["Kind"], "RuntimeFault");
    }

    #[test]
    fn option_member() {
        let container = OptionContainer {
            cause: Some(not_found()),
            label: "nightly".into(),
        };

        let encoded = serde_json::to_value(&container).unwrap();
        assert_eq!(encoded["cause"]["Kind"], "NotFound");
        assert_eq!(encoded["cause"]["Cause"]["Kind"], "RuntimeFault");

        let decoded: OptionContainer = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, container);

        let decoded: OptionContainer = serde_json::from_str(r#"{"label":"none"}"#).unwrap();
        assert_eq!(decoded.cause, None);
    }

    #[test]
    fn wraps_and_unwraps_all() {
        let faults = vec![Some(not_found()), None, Some(Fault::new("x").into())];

        let wrapped = wrap_all(faults.clone());
        assert_eq!(wrapped.len(), 3);
        assert_eq!(wrapped[1].get(), None);

        assert_eq!(unwrap_all(wrapped), faults);
    }
}
