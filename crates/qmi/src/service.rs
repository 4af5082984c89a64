//! QMI service identifiers.

use std::fmt;

/// A QMI service number as carried in the QMUX envelope.
///
/// Services are namespaces of messages (CTL, DMS, WDS, …) identified by a
/// single byte. The known constants live in [`crate::services::common`],
/// generated from the schema catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Service(pub u8);

impl Service {
    /// Returns the raw service number.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }
}

impl From<u8> for Service {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::services::common::service_name(*self) {
            Some(name) => write!(f, "service {name}"),
            None => write!(f, "unknown service {:#04x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::common::{QMI_SERVICE_DMS, QMI_SERVICE_UNKNOWN};

    #[test]
    fn display_uses_catalog_names() {
        assert_eq!(QMI_SERVICE_DMS.to_string(), "service DMS");
        assert_eq!(Service(0x77).to_string(), "unknown service 0x77");
        assert_eq!(QMI_SERVICE_UNKNOWN.to_string(), "unknown service 0xff");
    }
}
