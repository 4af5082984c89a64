// @generated by qmi-codegen from qmi-service-dms.json. DO NOT EDIT.

//! Generated bindings for the QMI DMS service.

use std::any::Any;

use crate::error::QmiError;
use crate::frame::find_tag;
use crate::message::{Message, Request, Response};
use crate::registry::MessageRegistry;
use crate::service::Service;
use crate::services::common::{OperationResult, QMI_SERVICE_DMS};
use crate::transport::Device;
use crate::wire;

/// Request for DMS "Get Capabilities" (message 0x0020).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetCapabilitiesInput {}

/// Response for DMS "Get Capabilities" (message 0x0020).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetCapabilitiesOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
    /// "Info" TLV (tag 0x01).
    pub info: DmsGetCapabilitiesOutputInfo,
}

/// "Info" record of [`DmsGetCapabilitiesOutput`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetCapabilitiesOutputInfo {
    /// "Max Tx Channel Rate" field.
    pub max_tx_channel_rate: u32,
    /// "Max Rx Channel Rate" field.
    pub max_rx_channel_rate: u32,
    /// "Data Service Capability" field.
    pub data_service_capability: u8,
    /// "Sim Capability" field.
    pub sim_capability: u8,
    /// "Radio Interface List" field.
    pub radio_interface_list: Vec<u8>,
}

impl DmsGetCapabilitiesOutputInfo {
    /// Reads the record's fields from `buf` in declaration order.
    ///
    /// # Errors
    ///
    /// [`QmiError::TruncatedTlv`] if `buf` ends early.
    pub fn read_from(buf: &mut &[u8]) -> Result<Self, QmiError> {
        Ok(Self {
            max_tx_channel_rate: wire::read_u32(buf)?,
            max_rx_channel_rate: wire::read_u32(buf)?,
            data_service_capability: wire::read_u8(buf)?,
            sim_capability: wire::read_u8(buf)?,
            radio_interface_list: {
                let mut items = Vec::new();
                while !buf.is_empty() {
                    items.push(wire::read_u8(buf)?);
                }
                items
            },
        })
    }
}

impl Message for DmsGetCapabilitiesInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x0020
    }
}

impl Request for DmsGetCapabilitiesInput {
    fn write_tlvs(&self, _out: &mut Vec<u8>) -> Result<(), QmiError> {
        Ok(())
    }
}

impl Message for DmsGetCapabilitiesOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x0020
    }
}

impl Response for DmsGetCapabilitiesOutput {
    fn read_tlvs(&mut self, tlvs: &[u8]) -> Result<(), QmiError> {
        match find_tag(tlvs, 0x02) {
            Some(payload) => {
                let buf = &mut &payload[..];
                self.operation_result = OperationResult::read_from(buf)?;
            }
            None => return Err(QmiError::MissingOperationResult),
        }
        if let Some(payload) = find_tag(tlvs, 0x01) {
            let buf = &mut &payload[..];
            self.info = DmsGetCapabilitiesOutputInfo::read_from(buf)?;
        }
        Ok(())
    }

    fn operation_result(&self) -> Option<OperationResult> {
        Some(self.operation_result.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Device {
    /// Sends a DMS "Get Capabilities" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn dms_get_capabilities(
        &self,
        input: DmsGetCapabilitiesInput,
    ) -> Result<DmsGetCapabilitiesOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<DmsGetCapabilitiesOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Request for DMS "Get Manufacturer" (message 0x0021).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetManufacturerInput {}

/// Response for DMS "Get Manufacturer" (message 0x0021).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetManufacturerOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
    /// "Manufacturer" TLV (tag 0x01).
    pub manufacturer: String,
}

impl Message for DmsGetManufacturerInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x0021
    }
}

impl Request for DmsGetManufacturerInput {
    fn write_tlvs(&self, _out: &mut Vec<u8>) -> Result<(), QmiError> {
        Ok(())
    }
}

impl Message for DmsGetManufacturerOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x0021
    }
}

impl Response for DmsGetManufacturerOutput {
    fn read_tlvs(&mut self, tlvs: &[u8]) -> Result<(), QmiError> {
        match find_tag(tlvs, 0x02) {
            Some(payload) => {
                let buf = &mut &payload[..];
                self.operation_result = OperationResult::read_from(buf)?;
            }
            None => return Err(QmiError::MissingOperationResult),
        }
        if let Some(payload) = find_tag(tlvs, 0x01) {
            let buf = &mut &payload[..];
            self.manufacturer = wire::read_string(buf);
        }
        Ok(())
    }

    fn operation_result(&self) -> Option<OperationResult> {
        Some(self.operation_result.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Device {
    /// Sends a DMS "Get Manufacturer" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn dms_get_manufacturer(
        &self,
        input: DmsGetManufacturerInput,
    ) -> Result<DmsGetManufacturerOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<DmsGetManufacturerOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Request for DMS "Get IDs" (message 0x0025).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetIdsInput {}

/// Response for DMS "Get IDs" (message 0x0025).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetIdsOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
    /// "Esn" TLV (tag 0x10).
    pub esn: String,
    /// "Imei" TLV (tag 0x11).
    pub imei: String,
    /// "Meid" TLV (tag 0x12).
    pub meid: String,
}

impl Message for DmsGetIdsInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x0025
    }
}

impl Request for DmsGetIdsInput {
    fn write_tlvs(&self, _out: &mut Vec<u8>) -> Result<(), QmiError> {
        Ok(())
    }
}

impl Message for DmsGetIdsOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x0025
    }
}

impl Response for DmsGetIdsOutput {
    fn read_tlvs(&mut self, tlvs: &[u8]) -> Result<(), QmiError> {
        match find_tag(tlvs, 0x02) {
            Some(payload) => {
                let buf = &mut &payload[..];
                self.operation_result = OperationResult::read_from(buf)?;
            }
            None => return Err(QmiError::MissingOperationResult),
        }
        if let Some(payload) = find_tag(tlvs, 0x10) {
            let buf = &mut &payload[..];
            self.esn = wire::read_string(buf);
        }
        if let Some(payload) = find_tag(tlvs, 0x11) {
            let buf = &mut &payload[..];
            self.imei = wire::read_string(buf);
        }
        if let Some(payload) = find_tag(tlvs, 0x12) {
            let buf = &mut &payload[..];
            self.meid = wire::read_string(buf);
        }
        Ok(())
    }

    fn operation_result(&self) -> Option<OperationResult> {
        Some(self.operation_result.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Device {
    /// Sends a DMS "Get IDs" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn dms_get_ids(&self, input: DmsGetIdsInput) -> Result<DmsGetIdsOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<DmsGetIdsOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Request for DMS "Get Time" (message 0x002F).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetTimeInput {}

/// Response for DMS "Get Time" (message 0x002F).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetTimeOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
    /// "Device Time" TLV (tag 0x01).
    pub device_time: DmsGetTimeOutputDeviceTime,
}

/// "Device Time" record of [`DmsGetTimeOutput`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmsGetTimeOutputDeviceTime {
    /// "Time Count" field.
    pub time_count: [u8; 6],
    /// "Time Source" field.
    pub time_source: u16,
}

impl DmsGetTimeOutputDeviceTime {
    /// Reads the record's fields from `buf` in declaration order.
    ///
    /// # Errors
    ///
    /// [`QmiError::TruncatedTlv`] if `buf` ends early.
    pub fn read_from(buf: &mut &[u8]) -> Result<Self, QmiError> {
        Ok(Self {
            time_count: wire::read_array(buf)?,
            time_source: wire::read_u16(buf)?,
        })
    }
}

impl Message for DmsGetTimeInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x002F
    }
}

impl Request for DmsGetTimeInput {
    fn write_tlvs(&self, _out: &mut Vec<u8>) -> Result<(), QmiError> {
        Ok(())
    }
}

impl Message for DmsGetTimeOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_DMS
    }

    fn message_id(&self) -> u16 {
        0x002F
    }
}

impl Response for DmsGetTimeOutput {
    fn read_tlvs(&mut self, tlvs: &[u8]) -> Result<(), QmiError> {
        match find_tag(tlvs, 0x02) {
            Some(payload) => {
                let buf = &mut &payload[..];
                self.operation_result = OperationResult::read_from(buf)?;
            }
            None => return Err(QmiError::MissingOperationResult),
        }
        if let Some(payload) = find_tag(tlvs, 0x01) {
            let buf = &mut &payload[..];
            self.device_time = DmsGetTimeOutputDeviceTime::read_from(buf)?;
        }
        Ok(())
    }

    fn operation_result(&self) -> Option<OperationResult> {
        Some(self.operation_result.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl Device {
    /// Sends a DMS "Get Time" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn dms_get_time(&self, input: DmsGetTimeInput) -> Result<DmsGetTimeOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<DmsGetTimeOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Installs this module's response factories into `reg`.
pub(crate) fn register(reg: &mut MessageRegistry) {
    reg.register(|| Box::new(DmsGetCapabilitiesOutput::default()));
    reg.register(|| Box::new(DmsGetManufacturerOutput::default()));
    reg.register(|| Box::new(DmsGetIdsOutput::default()));
    reg.register(|| Box::new(DmsGetTimeOutput::default()));
}
