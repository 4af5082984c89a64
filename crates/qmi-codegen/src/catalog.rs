//! The built-in service-id catalog.
//!
//! Schema documents declare services by symbolic name only; the numeric ids
//! come from here. LM940 QMI Command Reference Guide, section 3.1, table 3-1,
//! plus the Telit vendor block.

/// Known services, ascending by id.
pub const SERVICES: &[(u8, &str)] = &[
    (0, "CTL"),
    (1, "WDS"),
    (2, "DMS"),
    (3, "NAS"),
    (4, "QOS"),
    (5, "WMS"),
    (6, "PDS"),
    (7, "AUTH"),
    (8, "AT"),
    (9, "VOICE"),
    (10, "CAT2"),
    (11, "UIM"),
    (12, "PBM"),
    (13, "QCHAT"),
    (14, "RMTFS"),
    (15, "TEST"),
    (16, "LOC"),
    (17, "SAR"),
    (18, "IMS"),
    (19, "ADC"),
    (20, "CSD"),
    (21, "MFS"),
    (22, "TIME"),
    (23, "TS"),
    (24, "TMD"),
    (25, "SAP"),
    (26, "WDA"),
    (27, "TSYNC"),
    (28, "RFSA"),
    (29, "CSVT"),
    (30, "QCMAP"),
    (31, "IMSP"),
    (32, "IMSVT"),
    (33, "IMSA"),
    (34, "COEX"),
    (36, "PDC"),
    (38, "STX"),
    (39, "BIT"),
    (40, "IMSRTP"),
    (41, "RFRPE"),
    (42, "DSD"),
    (43, "SSCTL"),
    (224, "CAT"),
    (225, "RMS"),
    (226, "OMA"),
    (231, "GMS"),
];

/// Id reserved for services the catalog does not know.
pub const UNKNOWN_ID: u8 = 0xff;

/// Resolves a symbolic service name to its id.
#[must_use]
pub fn lookup(name: &str) -> Option<u8> {
    SERVICES
        .iter()
        .find(|(_, catalog_name)| *catalog_name == name)
        .map(|(id, _)| *id)
}
