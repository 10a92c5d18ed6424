//! Capabilities exposed by the fault types.
//!
//! A capability is implemented only by the types that actually provide it:
//! [`Fault`] never implements [`RuntimeFaultCapability`], so handing a bare
//! fault to code that requires a runtime fault does not compile. Going from an
//! [`AnyFault`] to a narrower capability is a checked operation, see
//! [`AnyFault::as_runtime_fault`] and [`AnyFault::as_not_found`].

use super::{AnyFault, Fault, Kind, NotFound, RuntimeFault};

/// Read/write access to the fields every fault carries.
pub trait FaultCapability {
    /// The most-derived variant of this value.
    fn kind(&self) -> Kind;

    /// The base fields of this value.
    fn base(&self) -> &Fault;

    /// The base fields of this value, mutably.
    fn base_mut(&mut self) -> &mut Fault;

    /// The human readable message.
    fn message(&self) -> &str {
        &self.base().message
    }

    /// Replace the message.
    fn set_message(&mut self, message: String) {
        self.base_mut().message = message;
    }

    /// The upstream fault this one wraps, if any.
    fn cause(&self) -> Option<&AnyFault> {
        self.base().cause.as_deref()
    }

    /// Replace the upstream fault.
    fn set_cause(&mut self, cause: Option<AnyFault>) {
        self.base_mut().cause = cause.map(Box::new);
    }

    /// Detach and return the upstream fault.
    fn take_cause(&mut self) -> Option<AnyFault> {
        self.base_mut().cause.take().map(|cause| *cause)
    }
}

/// Faults raised during execution.
pub trait RuntimeFaultCapability: FaultCapability {
    /// The runtime fault fields of this value.
    fn runtime(&self) -> &RuntimeFault;

    /// The runtime fault fields of this value, mutably.
    fn runtime_mut(&mut self) -> &mut RuntimeFault;
}

/// Faults naming a missing resource.
pub trait NotFoundCapability: RuntimeFaultCapability {
    /// The not-found fields of this value.
    fn not_found(&self) -> &NotFound;

    /// The not-found fields of this value, mutably.
    fn not_found_mut(&mut self) -> &mut NotFound;

    /// The kind of the missing object, e.g. `VirtualMachine`.
    fn obj_kind(&self) -> &str {
        &self.not_found().obj_kind
    }

    /// Replace the kind of the missing object.
    fn set_obj_kind(&mut self, obj_kind: String) {
        self.not_found_mut().obj_kind = obj_kind;
    }

    /// The identifier of the missing object.
    fn obj(&self) -> &str {
        &self.not_found().obj
    }

    /// Replace the identifier of the missing object.
    fn set_obj(&mut self, obj: String) {
        self.not_found_mut().obj = obj;
    }
}

impl FaultCapability for Fault {
    fn kind(&self) -> Kind {
        Kind::Fault
    }

    fn base(&self) -> &Fault {
        self
    }

    fn base_mut(&mut self) -> &mut Fault {
        self
    }
}

impl FaultCapability for RuntimeFault {
    fn kind(&self) -> Kind {
        Kind::RuntimeFault
    }

    fn base(&self) -> &Fault {
        &self.fault
    }

    fn base_mut(&mut self) -> &mut Fault {
        &mut self.fault
    }
}

impl RuntimeFaultCapability for RuntimeFault {
    fn runtime(&self) -> &RuntimeFault {
        self
    }

    fn runtime_mut(&mut self) -> &mut RuntimeFault {
        self
    }
}

impl FaultCapability for NotFound {
    fn kind(&self) -> Kind {
        Kind::NotFound
    }

    fn base(&self) -> &Fault {
        &self.runtime.fault
    }

    fn base_mut(&mut self) -> &mut Fault {
        &mut self.runtime.fault
    }
}

impl RuntimeFaultCapability for NotFound {
    fn runtime(&self) -> &RuntimeFault {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut RuntimeFault {
        &mut self.runtime
    }
}

impl NotFoundCapability for NotFound {
    fn not_found(&self) -> &NotFound {
        self
    }

    fn not_found_mut(&mut self) -> &mut NotFound {
        self
    }
}
