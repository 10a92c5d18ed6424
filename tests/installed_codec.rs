//! The codec used by `FaultField` is process-wide, so installing one
//! gets its own test binary.

use fault_wire::{
    AnyFault, Codec, FaultCapability, FaultField, Kind, NotFound, Registry, UnknownVariantPolicy,
    field,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Report {
    #[serde(rename = "Faults", with = "field::seq")]
    faults: Vec<Option<AnyFault>>,
}

#[test]
fn fields_decode_through_installed_codec() {
    let mut registry = Registry::empty();
    registry.register_kind(Kind::Fault).unwrap();
    registry.register_kind(Kind::RuntimeFault).unwrap();

    Codec::new(registry, UnknownVariantPolicy::FallbackToBase)
        .install()
        .unwrap();

    // Only the first install takes
    assert!(Codec::default().install().is_err());
    assert_eq!(
        Codec::installed().config().unknown_variant,
        UnknownVariantPolicy::FallbackToBase
    );

    let report = Report {
        faults: vec![
            Some(NotFound::new("gone", "VirtualMachine", "vm-42").into()),
            None,
        ],
    };
    let encoded = serde_json::to_string(&report).unwrap();

    // This consumer does not know `NotFound`, and falls back to a base fault
    let decoded: Report = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded.faults.len(), 2);

    let first = decoded.faults[0].as_ref().unwrap();
    assert_eq!(first.kind(), Kind::Fault);
    assert_eq!(first.message(), "gone");
    assert_eq!(decoded.faults[1], None);

    let field: FaultField = serde_json::from_str(r#"{"Kind":"Bogus","Message":"m"}"#).unwrap();
    assert_eq!(field.get().map(AnyFault::kind), Some(Kind::Fault));
}
