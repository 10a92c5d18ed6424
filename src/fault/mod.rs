//! The fault hierarchy: `Fault` → `RuntimeFault` → `NotFound`.
//!
//! Each specialization embeds its parent by value, so every type carries the
//! fields of all its ancestors. Values of unknown concrete type are held as
//! [`AnyFault`], or as [`AnyRuntimeFault`] once narrowed to the runtime
//! capability.

use std::{error, fmt, iter};

mod kind;
pub use kind::{Kind, ParseKindError};

mod capability;
pub use capability::{FaultCapability, NotFoundCapability, RuntimeFaultCapability};

/// The root of the hierarchy: a message and an optional upstream cause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fault {
    /// Human readable description of the fault.
    pub message: String,

    /// The fault this one wraps, owned exclusively by this link of the chain.
    pub cause: Option<Box<AnyFault>>,
}

impl Fault {
    /// Create a fault with the provided `message` and no cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Attach an upstream `cause` to this fault.
    pub fn with_cause(mut self, cause: impl Into<AnyFault>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }
}

/// A fault raised during execution.
///
/// It adds no fields to [`Fault`], but provides the [`RuntimeFaultCapability`]
/// that a bare [`Fault`] does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeFault {
    /// Fields inherited from [`Fault`].
    pub fault: Fault,
}

impl RuntimeFault {
    /// Create a runtime fault with the provided `message` and no cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            fault: Fault::new(message),
        }
    }

    /// Attach an upstream `cause` to this fault.
    pub fn with_cause(mut self, cause: impl Into<AnyFault>) -> Self {
        self.fault = self.fault.with_cause(cause);
        self
    }
}

/// A runtime fault signaling that an object could not be found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotFound {
    /// Fields inherited from [`RuntimeFault`].
    pub runtime: RuntimeFault,

    /// The kind of the missing object, e.g. `VirtualMachine`.
    pub obj_kind: String,

    /// The identifier of the missing object, e.g. `vm-42`.
    pub obj: String,
}

impl NotFound {
    /// Create a not-found fault for the object `obj` of kind `obj_kind`.
    pub fn new(
        message: impl Into<String>,
        obj_kind: impl Into<String>,
        obj: impl Into<String>,
    ) -> Self {
        Self {
            runtime: RuntimeFault::new(message),
            obj_kind: obj_kind.into(),
            obj: obj.into(),
        }
    }

    /// Attach an upstream `cause` to this fault.
    pub fn with_cause(mut self, cause: impl Into<AnyFault>) -> Self {
        self.runtime = self.runtime.with_cause(cause);
        self
    }
}

/// A fault of any concrete variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyFault {
    /// A bare [`Fault`].
    Fault(Fault),

    /// A [`RuntimeFault`].
    RuntimeFault(RuntimeFault),

    /// A [`NotFound`] fault.
    NotFound(NotFound),
}

impl AnyFault {
    /// The zero value of the variant `kind`.
    pub fn zeroed(kind: Kind) -> Self {
        match kind {
            Kind::Fault => Self::Fault(Default::default()),
            Kind::RuntimeFault => Self::RuntimeFault(Default::default()),
            Kind::NotFound => Self::NotFound(Default::default()),
        }
    }

    /// The discriminator of the most-derived variant of this value.
    pub fn discriminator(&self) -> &'static str {
        self.kind().discriminator()
    }

    /// Narrow this value to the runtime fault capability.
    pub fn as_runtime_fault(&self) -> Result<&dyn RuntimeFaultCapability, CapabilityMismatch> {
        match self {
            Self::RuntimeFault(fault) => Ok(fault as &dyn RuntimeFaultCapability),
            Self::NotFound(fault) => Ok(fault as &dyn RuntimeFaultCapability),
            Self::Fault(_) => Err(CapabilityMismatch::new(Kind::RuntimeFault, self.kind())),
        }
    }

    /// Narrow this value to the not-found capability.
    pub fn as_not_found(&self) -> Result<&NotFound, CapabilityMismatch> {
        match self {
            Self::NotFound(fault) => Ok(fault),
            _ => Err(CapabilityMismatch::new(Kind::NotFound, self.kind())),
        }
    }

    /// Iterate over this fault and then each of its causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &AnyFault> {
        iter::successors(Some(self), |&fault| fault.cause())
    }
}

impl FaultCapability for AnyFault {
    fn kind(&self) -> Kind {
        match self {
            Self::Fault(fault) => fault.kind(),
            Self::RuntimeFault(fault) => fault.kind(),
            Self::NotFound(fault) => fault.kind(),
        }
    }

    fn base(&self) -> &Fault {
        match self {
            Self::Fault(fault) => fault.base(),
            Self::RuntimeFault(fault) => fault.base(),
            Self::NotFound(fault) => fault.base(),
        }
    }

    fn base_mut(&mut self) -> &mut Fault {
        match self {
            Self::Fault(fault) => fault.base_mut(),
            Self::RuntimeFault(fault) => fault.base_mut(),
            Self::NotFound(fault) => fault.base_mut(),
        }
    }
}

/// A fault of any variant that provides the [`RuntimeFaultCapability`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyRuntimeFault {
    /// A [`RuntimeFault`].
    RuntimeFault(RuntimeFault),

    /// A [`NotFound`] fault.
    NotFound(NotFound),
}

impl FaultCapability for AnyRuntimeFault {
    fn kind(&self) -> Kind {
        match self {
            Self::RuntimeFault(fault) => fault.kind(),
            Self::NotFound(fault) => fault.kind(),
        }
    }

    fn base(&self) -> &Fault {
        self.runtime().base()
    }

    fn base_mut(&mut self) -> &mut Fault {
        self.runtime_mut().base_mut()
    }
}

impl RuntimeFaultCapability for AnyRuntimeFault {
    fn runtime(&self) -> &RuntimeFault {
        match self {
            Self::RuntimeFault(fault) => fault,
            Self::NotFound(fault) => &fault.runtime,
        }
    }

    fn runtime_mut(&mut self) -> &mut RuntimeFault {
        match self {
            Self::RuntimeFault(fault) => fault,
            Self::NotFound(fault) => &mut fault.runtime,
        }
    }
}

/// An error returned when a value is narrowed to a capability its variant
/// does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected a `{expected}` capability, but `{found}` does not provide it")]
pub struct CapabilityMismatch {
    /// The capability that was requested.
    pub expected: Kind,

    /// The variant that was actually found.
    pub found: Kind,
}

impl CapabilityMismatch {
    fn new(expected: Kind, found: Kind) -> Self {
        Self { expected, found }
    }
}

impl From<Fault> for AnyFault {
    fn from(value: Fault) -> Self {
        Self::Fault(value)
    }
}

impl From<RuntimeFault> for AnyFault {
    fn from(value: RuntimeFault) -> Self {
        Self::RuntimeFault(value)
    }
}

impl From<NotFound> for AnyFault {
    fn from(value: NotFound) -> Self {
        Self::NotFound(value)
    }
}

impl From<AnyRuntimeFault> for AnyFault {
    fn from(value: AnyRuntimeFault) -> Self {
        match value {
            AnyRuntimeFault::RuntimeFault(fault) => Self::RuntimeFault(fault),
            AnyRuntimeFault::NotFound(fault) => Self::NotFound(fault),
        }
    }
}

impl From<RuntimeFault> for AnyRuntimeFault {
    fn from(value: RuntimeFault) -> Self {
        Self::RuntimeFault(value)
    }
}

impl From<NotFound> for AnyRuntimeFault {
    fn from(value: NotFound) -> Self {
        Self::NotFound(value)
    }
}

impl TryFrom<AnyFault> for AnyRuntimeFault {
    type Error = CapabilityMismatch;

    fn try_from(value: AnyFault) -> Result<Self, Self::Error> {
        match value {
            AnyFault::RuntimeFault(fault) => Ok(Self::RuntimeFault(fault)),
            AnyFault::NotFound(fault) => Ok(Self::NotFound(fault)),
            AnyFault::Fault(_) => Err(CapabilityMismatch::new(Kind::RuntimeFault, Kind::Fault)),
        }
    }
}

impl TryFrom<AnyFault> for NotFound {
    type Error = CapabilityMismatch;

    fn try_from(value: AnyFault) -> Result<Self, Self::Error> {
        match value {
            AnyFault::NotFound(fault) => Ok(fault),
            other => Err(CapabilityMismatch::new(Kind::NotFound, other.kind())),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Display for RuntimeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fault.fmt(f)
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} `{}`)", self.runtime, self.obj_kind, self.obj)
    }
}

impl fmt::Display for AnyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fault(fault) => fault.fmt(f),
            Self::RuntimeFault(fault) => fault.fmt(f),
            Self::NotFound(fault) => fault.fmt(f),
        }
    }
}

impl fmt::Display for AnyRuntimeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuntimeFault(fault) => fault.fmt(f),
            Self::NotFound(fault) => fault.fmt(f),
        }
    }
}

fn source_of(fault: &impl FaultCapability) -> Option<&(dyn error::Error + 'static)> {
    fault
        .cause()
        .map(|cause| cause as &(dyn error::Error + 'static))
}

impl error::Error for Fault {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        source_of(self)
    }
}

impl error::Error for RuntimeFault {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        source_of(self)
    }
}

impl error::Error for NotFound {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        source_of(self)
    }
}

impl error::Error for AnyFault {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        source_of(self)
    }
}

impl error::Error for AnyRuntimeFault {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        source_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> NotFound {
        NotFound::new("test message", "VirtualMachine", "vm-42")
            .with_cause(RuntimeFault::new("inner message"))
    }

    #[test]
    fn it_exposes_inherited_fields() {
        let mut fault = not_found();

        assert_eq!(fault.message(), "test message");
        assert_eq!(fault.obj_kind(), "VirtualMachine");
        assert_eq!(fault.obj(), "vm-42");
        assert_eq!(fault.cause().map(AnyFault::kind), Some(Kind::RuntimeFault));

        fault.set_message("updated".into());
        fault.set_obj("vm-43".into());
        assert_eq!(fault.runtime.fault.message, "updated");
        assert_eq!(fault.obj, "vm-43");

        let cause = fault.take_cause();
        assert_eq!(cause, Some(RuntimeFault::new("inner message").into()));
        assert!(fault.cause().is_none());
    }

    #[test]
    fn it_narrows_explicitly() {
        let fault = AnyFault::from(not_found());
        assert!(fault.as_runtime_fault().is_ok());
        assert_eq!(fault.as_not_found().map(|nf| nf.obj()), Ok("vm-42"));

        let fault = AnyFault::from(RuntimeFault::new("runtime"));
        assert_eq!(
            fault.as_not_found().unwrap_err(),
            CapabilityMismatch::new(Kind::NotFound, Kind::RuntimeFault)
        );

        // Same fields as a `RuntimeFault`, still not one
        let fault = AnyFault::from(Fault::new("runtime"));
        assert!(fault.as_runtime_fault().is_err());
        assert!(AnyRuntimeFault::try_from(fault).is_err());
    }

    #[test]
    fn it_converts_between_sums() {
        let narrowed = AnyRuntimeFault::try_from(AnyFault::from(not_found())).unwrap();
        assert_eq!(narrowed.kind(), Kind::NotFound);
        assert_eq!(narrowed.runtime().fault.message, "test message");

        assert_eq!(AnyFault::from(narrowed), AnyFault::from(not_found()));
    }

    #[test]
    fn it_walks_the_chain() {
        let fault = AnyFault::from(
            Fault::new("outer").with_cause(not_found().with_cause(Fault::new("root"))),
        );

        let kinds: Vec<_> = fault.chain().map(AnyFault::kind).collect();
        assert_eq!(kinds, [Kind::Fault, Kind::NotFound, Kind::Fault]);

        let root = fault.chain().last().unwrap();
        assert_eq!(root.message(), "root");
    }

    #[test]
    fn it_reports_as_error() {
        let fault = AnyFault::from(not_found());

        assert_eq!(fault.to_string(), "test message (VirtualMachine `vm-42`)");
        assert_eq!(
            error::Error::source(&fault)
                .map(ToString::to_string)
                .as_deref(),
            Some("inner message")
        );
    }

    #[test]
    fn zeroed_matches_kind() {
        for kind in Kind::ALL {
            let fault = AnyFault::zeroed(kind);

            assert_eq!(fault.kind(), kind);
            assert_eq!(fault.message(), "");
            assert!(fault.cause().is_none());
        }
    }
}
