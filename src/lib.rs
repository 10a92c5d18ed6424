#![doc = include_str!("../README.md")]
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, clippy::unimplemented)]

pub mod config;
pub mod fault;
pub mod field;
pub mod format;
pub mod registry;

pub use config::{Config, UnknownVariantPolicy};
pub use fault::{
    AnyFault, AnyRuntimeFault, CapabilityMismatch, Fault, FaultCapability, Kind, NotFound,
    NotFoundCapability, RuntimeFault, RuntimeFaultCapability,
};
pub use field::FaultField;
pub use format::{Codec, Error, Result};
pub use registry::Registry;
