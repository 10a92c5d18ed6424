use std::{fmt, str::FromStr};

/// The closed set of fault variants, identified on the wire by their discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A bare [`Fault`](super::Fault), the root of the hierarchy.
    Fault,

    /// A [`RuntimeFault`](super::RuntimeFault), raised during execution.
    RuntimeFault,

    /// A [`NotFound`](super::NotFound) fault, naming a missing resource.
    NotFound,
}

impl Kind {
    /// Every variant, root first.
    pub const ALL: [Kind; 3] = [Kind::Fault, Kind::RuntimeFault, Kind::NotFound];

    /// The wire-level discriminator of this variant, matched case-sensitively.
    pub const fn discriminator(self) -> &'static str {
        match self {
            Self::Fault => "Fault",
            Self::RuntimeFault => "RuntimeFault",
            Self::NotFound => "NotFound",
        }
    }

    /// The variant this one directly specializes, `None` for the root.
    pub const fn parent(self) -> Option<Kind> {
        match self {
            Self::Fault => None,
            Self::RuntimeFault => Some(Self::Fault),
            Self::NotFound => Some(Self::RuntimeFault),
        }
    }

    /// Whether a value of this variant provides the capability of `ancestor`,
    /// that is if `ancestor` is this variant or one of its parents.
    pub fn is_a(self, ancestor: Kind) -> bool {
        let mut kind = Some(self);
        while let Some(current) = kind {
            if current == ancestor {
                return true;
            }

            kind = current.parent();
        }

        false
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.discriminator())
    }
}

/// An error returned when a string is not the discriminator of any [`Kind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a known fault discriminator")]
pub struct ParseKindError(pub String);

impl FromStr for Kind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.discriminator() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}
