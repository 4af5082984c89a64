// @generated by qmi-codegen from qmi-common.json. DO NOT EDIT.

//! Common definitions shared by every QMI service: the service catalog and
//! the reusable records embedded by service messages.

use crate::error::QmiError;
use crate::service::Service;
use crate::wire;

/// CTL service (service id 0).
pub const QMI_SERVICE_CTL: Service = Service(0);
/// WDS service (service id 1).
pub const QMI_SERVICE_WDS: Service = Service(1);
/// DMS service (service id 2).
pub const QMI_SERVICE_DMS: Service = Service(2);
/// NAS service (service id 3).
pub const QMI_SERVICE_NAS: Service = Service(3);
/// QOS service (service id 4).
pub const QMI_SERVICE_QOS: Service = Service(4);
/// WMS service (service id 5).
pub const QMI_SERVICE_WMS: Service = Service(5);
/// PDS service (service id 6).
pub const QMI_SERVICE_PDS: Service = Service(6);
/// AUTH service (service id 7).
pub const QMI_SERVICE_AUTH: Service = Service(7);
/// AT service (service id 8).
pub const QMI_SERVICE_AT: Service = Service(8);
/// VOICE service (service id 9).
pub const QMI_SERVICE_VOICE: Service = Service(9);
/// CAT2 service (service id 10).
pub const QMI_SERVICE_CAT2: Service = Service(10);
/// UIM service (service id 11).
pub const QMI_SERVICE_UIM: Service = Service(11);
/// PBM service (service id 12).
pub const QMI_SERVICE_PBM: Service = Service(12);
/// QCHAT service (service id 13).
pub const QMI_SERVICE_QCHAT: Service = Service(13);
/// RMTFS service (service id 14).
pub const QMI_SERVICE_RMTFS: Service = Service(14);
/// TEST service (service id 15).
pub const QMI_SERVICE_TEST: Service = Service(15);
/// LOC service (service id 16).
pub const QMI_SERVICE_LOC: Service = Service(16);
/// SAR service (service id 17).
pub const QMI_SERVICE_SAR: Service = Service(17);
/// IMS service (service id 18).
pub const QMI_SERVICE_IMS: Service = Service(18);
/// ADC service (service id 19).
pub const QMI_SERVICE_ADC: Service = Service(19);
/// CSD service (service id 20).
pub const QMI_SERVICE_CSD: Service = Service(20);
/// MFS service (service id 21).
pub const QMI_SERVICE_MFS: Service = Service(21);
/// TIME service (service id 22).
pub const QMI_SERVICE_TIME: Service = Service(22);
/// TS service (service id 23).
pub const QMI_SERVICE_TS: Service = Service(23);
/// TMD service (service id 24).
pub const QMI_SERVICE_TMD: Service = Service(24);
/// SAP service (service id 25).
pub const QMI_SERVICE_SAP: Service = Service(25);
/// WDA service (service id 26).
pub const QMI_SERVICE_WDA: Service = Service(26);
/// TSYNC service (service id 27).
pub const QMI_SERVICE_TSYNC: Service = Service(27);
/// RFSA service (service id 28).
pub const QMI_SERVICE_RFSA: Service = Service(28);
/// CSVT service (service id 29).
pub const QMI_SERVICE_CSVT: Service = Service(29);
/// QCMAP service (service id 30).
pub const QMI_SERVICE_QCMAP: Service = Service(30);
/// IMSP service (service id 31).
pub const QMI_SERVICE_IMSP: Service = Service(31);
/// IMSVT service (service id 32).
pub const QMI_SERVICE_IMSVT: Service = Service(32);
/// IMSA service (service id 33).
pub const QMI_SERVICE_IMSA: Service = Service(33);
/// COEX service (service id 34).
pub const QMI_SERVICE_COEX: Service = Service(34);
/// PDC service (service id 36).
pub const QMI_SERVICE_PDC: Service = Service(36);
/// STX service (service id 38).
pub const QMI_SERVICE_STX: Service = Service(38);
/// BIT service (service id 39).
pub const QMI_SERVICE_BIT: Service = Service(39);
/// IMSRTP service (service id 40).
pub const QMI_SERVICE_IMSRTP: Service = Service(40);
/// RFRPE service (service id 41).
pub const QMI_SERVICE_RFRPE: Service = Service(41);
/// DSD service (service id 42).
pub const QMI_SERVICE_DSD: Service = Service(42);
/// SSCTL service (service id 43).
pub const QMI_SERVICE_SSCTL: Service = Service(43);
/// CAT service (service id 224).
pub const QMI_SERVICE_CAT: Service = Service(224);
/// RMS service (service id 225).
pub const QMI_SERVICE_RMS: Service = Service(225);
/// OMA service (service id 226).
pub const QMI_SERVICE_OMA: Service = Service(226);
/// GMS service (service id 231).
pub const QMI_SERVICE_GMS: Service = Service(231);
/// Placeholder for a service the catalog does not know.
pub const QMI_SERVICE_UNKNOWN: Service = Service(0xff);

/// Returns the catalog name of `service`, if it has one.
#[must_use]
pub fn service_name(service: Service) -> Option<&'static str> {
    Some(match service.0 {
        0 => "CTL",
        1 => "WDS",
        2 => "DMS",
        3 => "NAS",
        4 => "QOS",
        5 => "WMS",
        6 => "PDS",
        7 => "AUTH",
        8 => "AT",
        9 => "VOICE",
        10 => "CAT2",
        11 => "UIM",
        12 => "PBM",
        13 => "QCHAT",
        14 => "RMTFS",
        15 => "TEST",
        16 => "LOC",
        17 => "SAR",
        18 => "IMS",
        19 => "ADC",
        20 => "CSD",
        21 => "MFS",
        22 => "TIME",
        23 => "TS",
        24 => "TMD",
        25 => "SAP",
        26 => "WDA",
        27 => "TSYNC",
        28 => "RFSA",
        29 => "CSVT",
        30 => "QCMAP",
        31 => "IMSP",
        32 => "IMSVT",
        33 => "IMSA",
        34 => "COEX",
        36 => "PDC",
        38 => "STX",
        39 => "BIT",
        40 => "IMSRTP",
        41 => "RFRPE",
        42 => "DSD",
        43 => "SSCTL",
        224 => "CAT",
        225 => "RMS",
        226 => "OMA",
        231 => "GMS",
        _ => return None,
    })
}

/// Reusable "Operation Result" record (tag 0x02).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    /// "Error Status" field.
    pub error_status: u16,
    /// "Error Code" field.
    pub error_code: u16,
}

impl OperationResult {
    /// Reads the record's fields from `buf` in declaration order.
    ///
    /// # Errors
    ///
    /// [`QmiError::TruncatedTlv`] if `buf` ends early.
    pub fn read_from(buf: &mut &[u8]) -> Result<Self, QmiError> {
        Ok(Self {
            error_status: wire::read_u16(buf)?,
            error_code: wire::read_u16(buf)?,
        })
    }
}
