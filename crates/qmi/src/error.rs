//! Error types surfaced by the runtime.
//!
//! Framing failures are local to the reader (logged, frame dropped, loop
//! continues); transport I/O failures are sticky and returned to every
//! subsequent call; per-call failures surface only to that caller.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::service::Service;

/// Errors produced by the QMI runtime.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QmiError {
    /// A frame did not start with the QMUX marker byte `0x01`.
    #[error("bad frame marker: {0:#04x} != 0x01")]
    BadMarker(u8),

    /// A frame's declared length exceeds the bytes available.
    #[error("frame shorter than its declared length")]
    ShortFrame,

    /// No messages are registered for the frame's service.
    #[error("no registered messages for {0}")]
    UnknownService(Service),

    /// The message id is not in the service's dispatch map.
    #[error("unknown message {1:#06x} for {0}")]
    UnknownMessage(Service, u16),

    /// A TLV payload ended before its fields were fully read.
    #[error("truncated TLV payload")]
    TruncatedTlv,

    /// A TLV payload does not fit the 16-bit length field.
    #[error("TLV payload of {0} bytes exceeds the 16-bit length field")]
    TlvTooLong(usize),

    /// A response lacked the mandatory Operation Result TLV (tag 2).
    #[error("response is missing the mandatory result TLV (tag 2)")]
    MissingOperationResult,

    /// The remote reported a nonzero operation status.
    #[error("QMI protocol error: {0}")]
    Protocol(ProtocolError),

    /// The device was already shut down when the operation was attempted.
    #[error("device is already closed")]
    AlreadyClosed,

    /// The CTL service refused to allocate a client id.
    #[error("allocating a client id for {service} failed")]
    AllocateCidFailed {
        /// The service a client id was requested for.
        service: Service,
        /// The underlying refusal.
        #[source]
        source: Box<QmiError>,
    },

    /// The underlying device read or write failed.
    #[error("device i/o failed")]
    Io(#[from] io::Error),
}

/// A QMI protocol error code, carried by the Operation Result TLV of a
/// failed response.
///
/// The named constants and descriptions follow the LM940 QMI command
/// reference (section 3.2.1, tables 3-2 and 3-3). Codes outside the table
/// render as `unknown error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolError(pub u16);

#[allow(missing_docs)]
impl ProtocolError {
    pub const NONE: Self = Self(0);
    pub const MALFORMED_MESSAGE: Self = Self(1);
    pub const NO_MEMORY: Self = Self(2);
    pub const INTERNAL: Self = Self(3);
    pub const ABORTED: Self = Self(4);
    pub const CLIENT_IDS_EXHAUSTED: Self = Self(5);
    pub const UNABORTABLE_TRANSACTION: Self = Self(6);
    pub const INVALID_CLIENT_ID: Self = Self(7);
    pub const NO_THRESHOLDS_PROVIDED: Self = Self(8);
    pub const INVALID_HANDLE: Self = Self(9);
    pub const INVALID_PROFILE: Self = Self(10);
    pub const INVALID_PIN_ID: Self = Self(11);
    pub const INCORRECT_PIN: Self = Self(12);
    pub const NO_NETWORK_FOUND: Self = Self(13);
    pub const CALL_FAILED: Self = Self(14);
    pub const OUT_OF_CALL: Self = Self(15);
    pub const NOT_PROVISIONED: Self = Self(16);
    pub const MISSING_ARGUMENT: Self = Self(17);
    pub const ARGUMENT_TOO_LONG: Self = Self(19);
    pub const INVALID_TRANSACTION_ID: Self = Self(22);
    pub const DEVICE_IN_USE: Self = Self(23);
    pub const NETWORK_UNSUPPORTED: Self = Self(24);
    pub const DEVICE_UNSUPPORTED: Self = Self(25);
    pub const NO_EFFECT: Self = Self(26);
    pub const NO_FREE_PROFILE: Self = Self(27);
    pub const INVALID_PDP_TYPE: Self = Self(28);
    pub const INVALID_TECHNOLOGY_PREFERENCE: Self = Self(29);
    pub const INVALID_PROFILE_TYPE: Self = Self(30);
    pub const INVALID_SERVICE_TYPE: Self = Self(31);
    pub const INVALID_REGISTER_ACTION: Self = Self(32);
    pub const INVALID_PS_ATTACH_ACTION: Self = Self(33);
    pub const AUTHENTICATION_FAILED: Self = Self(34);
    pub const PIN_BLOCKED: Self = Self(35);
    pub const PIN_ALWAYS_BLOCKED: Self = Self(36);
    pub const UIM_UNINITIALIZED: Self = Self(37);
    pub const MAXIMUM_QOS_REQUESTS_IN_USE: Self = Self(38);
    pub const INCORRECT_FLOW_FILTER: Self = Self(39);
    pub const NETWORK_QOS_UNAWARE: Self = Self(40);
    pub const INVALID_QOS_ID: Self = Self(41);
    pub const QOS_UNAVAILABLE: Self = Self(42);
    pub const FLOW_SUSPENDED: Self = Self(43);
    pub const GENERAL_ERROR: Self = Self(46);
    pub const UNKNOWN_ERROR: Self = Self(47);
    pub const INVALID_ARGUMENT: Self = Self(48);
    pub const INVALID_INDEX: Self = Self(49);
    pub const NO_ENTRY: Self = Self(50);
    pub const DEVICE_STORAGE_FULL: Self = Self(51);
    pub const DEVICE_NOT_READY: Self = Self(52);
    pub const NETWORK_NOT_READY: Self = Self(53);
    pub const WMS_CAUSE_CODE: Self = Self(54);
    pub const WMS_MESSAGE_NOT_SENT: Self = Self(55);
    pub const WMS_MESSAGE_DELIVERY_FAILURE: Self = Self(56);
    pub const WMS_INVALID_MESSAGE_ID: Self = Self(57);
    pub const WMS_ENCODING: Self = Self(58);
    pub const AUTHENTICATION_LOCK: Self = Self(59);
    pub const INVALID_TRANSITION: Self = Self(60);
    pub const SESSION_INACTIVE: Self = Self(65);
    pub const SESSION_INVALID: Self = Self(66);
    pub const SESSION_OWNERSHIP: Self = Self(67);
    pub const INSUFFICIENT_RESOURCES: Self = Self(68);
    pub const DISABLED: Self = Self(69);
    pub const INVALID_OPERATION: Self = Self(70);
    pub const INVALID_QMI_COMMAND: Self = Self(71);
    pub const WMS_T_PDU_TYPE: Self = Self(72);
    pub const WMS_SMSC_ADDRESS: Self = Self(73);
    pub const INFORMATION_UNAVAILABLE: Self = Self(74);
    pub const SEGMENT_TOO_LONG: Self = Self(75);
    pub const SEGMENT_ORDER: Self = Self(76);
    pub const BUNDLING_NOT_SUPPORTED: Self = Self(77);
    pub const POLICY_MISMATCH: Self = Self(79);
    pub const SIM_FILE_NOT_FOUND: Self = Self(80);
    pub const EXTENDED_INTERNAL: Self = Self(81);
    pub const ACCESS_DENIED: Self = Self(82);
    pub const HARDWARE_RESTRICTED: Self = Self(83);
    pub const ACK_NOT_SENT: Self = Self(84);
    pub const INJECT_TIMEOUT: Self = Self(85);
    pub const INCOMPATIBLE_STATE: Self = Self(90);
    pub const FDN_RESTRICT: Self = Self(91);
    pub const SUPS_FAILURE_CASE: Self = Self(92);
    pub const NO_RADIO: Self = Self(93);
    pub const NOT_SUPPORTED: Self = Self(94);
    pub const NO_SUBSCRIPTION: Self = Self(95);
    pub const CARD_CALL_CONTROL_FAILED: Self = Self(96);
    pub const NETWORK_ABORTED: Self = Self(97);
    pub const MSG_BLOCKED: Self = Self(98);
    pub const INVALID_SESSION_TYPE: Self = Self(100);
    pub const INVALID_PB_TYPE: Self = Self(101);
    pub const NO_SIM: Self = Self(102);
    pub const PB_NOT_READY: Self = Self(103);
    pub const PIN_RESTRICTION: Self = Self(104);
    pub const PIN2_RESTRICTION: Self = Self(105);
    pub const PUK_RESTRICTION: Self = Self(106);
    pub const PUK2_RESTRICTION: Self = Self(107);
    pub const PB_ACCESS_RESTRICTED: Self = Self(108);
    pub const PB_TEXT_TOO_LONG: Self = Self(109);
    pub const PB_NUMBER_TOO_LONG: Self = Self(110);
    pub const PB_HIDDEN_KEY_RESTRICTION: Self = Self(111);
    pub const CAT_EVENT_REGISTRATION_FAILED: Self = Self(0xF001);
    pub const CAT_INVALID_TERMINAL_RESPONSE: Self = Self(0xF002);
    pub const CAT_INVALID_ENVELOPE_COMMAND: Self = Self(0xF003);
    pub const CAT_ENVELOPE_COMMAND_BUSY: Self = Self(0xF004);
    pub const CAT_ENVELOPE_COMMAND_FAILED: Self = Self(0xF005);
}

impl ProtocolError {
    /// Returns the raw 16-bit error code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    /// Returns the human description of the code, if the table knows it.
    #[must_use]
    pub const fn description(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "No error",
            1 => "Malformed message",
            2 => "No memory",
            3 => "Internal",
            4 => "Aborted",
            5 => "Client IDs exhausted",
            6 => "Unabortable transaction",
            7 => "Invalid client ID",
            8 => "No thresholds provided",
            9 => "Invalid handle",
            10 => "Invalid profile",
            11 => "Invalid PIN ID",
            12 => "Incorrect PIN",
            13 => "No network found",
            14 => "Call failed",
            15 => "Out of call",
            16 => "Not provisioned",
            17 => "Missing argument",
            19 => "Argument too long",
            22 => "Invalid transaction ID",
            23 => "Device in use",
            24 => "Network unsupported",
            25 => "Device unsupported",
            26 => "No effect",
            27 => "No free profile",
            28 => "Invalid PDP type",
            29 => "Invalid technology preference",
            30 => "Invalid profile type",
            31 => "Invalid service type",
            32 => "Invalid register action",
            33 => "Invalid PS attach action",
            34 => "Authentication failed",
            35 => "PIN blocked",
            36 => "PIN always blocked",
            37 => "UIM uninitialized",
            38 => "Maximum QoS requests in use",
            39 => "Incorrect flow filter",
            40 => "Network QoS unaware",
            41 => "Invalid QoS ID",
            42 => "QoS unavailable",
            43 => "Flow suspended",
            46 => "General error",
            47 => "Unknown error",
            48 => "Invalid argument",
            49 => "Invalid index",
            50 => "No entry",
            51 => "Device storage full",
            52 => "Device not ready",
            53 => "Network not ready",
            54 => "WMS cause code",
            55 => "WMS message not sent",
            56 => "WMS message delivery failure",
            57 => "WMS invalid message ID",
            58 => "WMS encoding",
            59 => "Authentication lock",
            60 => "Invalid transition",
            65 => "Session inactive",
            66 => "Session invalid",
            67 => "Session ownership",
            68 => "Insufficient resources",
            69 => "Disabled",
            70 => "Invalid operation",
            71 => "Invalid QMI command",
            72 => "WMS T-PDU type",
            73 => "WMS SMSC address",
            74 => "Information unavailable",
            75 => "Segment too long",
            76 => "Segment order",
            77 => "Bundling not supported",
            79 => "Policy mismatch",
            80 => "SIM file not found",
            81 => "Extended internal error",
            82 => "Access denied",
            83 => "Hardware restricted",
            84 => "ACK not sent",
            85 => "Inject timeout",
            90 => "Incompatible state",
            91 => "FDN restrict",
            92 => "SUPS failure case",
            93 => "No radio",
            94 => "Not supported",
            95 => "No subscription",
            96 => "Card call control failed",
            97 => "Network aborted",
            98 => "Message blocked",
            100 => "Invalid session type",
            101 => "Invalid PB type",
            102 => "No SIM",
            103 => "PB not ready",
            104 => "PIN restriction",
            105 => "PIN2 restriction",
            106 => "PUK restriction",
            107 => "PUK2 restriction",
            108 => "PB access restricted",
            109 => "PB text too long",
            110 => "PB number too long",
            111 => "PB hidden key restriction",
            0xF001 => "Event registration failed",
            0xF002 => "Invalid terminal response",
            0xF003 => "Invalid envelope command",
            0xF004 => "Envelope command busy",
            0xF005 => "Envelope command failed",
            _ => return None,
        })
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{description} ({})", self.0),
            None => write!(f, "unknown error ({})", self.0),
        }
    }
}

impl From<u16> for ProtocolError {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_descriptions() {
        assert_eq!(ProtocolError::CALL_FAILED.description(), Some("Call failed"));
        assert_eq!(ProtocolError::CALL_FAILED.to_string(), "Call failed (14)");
        assert_eq!(ProtocolError(18).description(), None);
        assert_eq!(ProtocolError(18).to_string(), "unknown error (18)");
        assert_eq!(
            ProtocolError::CAT_ENVELOPE_COMMAND_BUSY.description(),
            Some("Envelope command busy")
        );
    }

    #[test]
    fn qmi_error_display() {
        let err = QmiError::Protocol(ProtocolError::CALL_FAILED);
        assert_eq!(err.to_string(), "QMI protocol error: Call failed (14)");
        assert_eq!(
            QmiError::UnknownMessage(Service(2), 0x5555).to_string(),
            "unknown message 0x5555 for service DMS"
        );
    }
}
