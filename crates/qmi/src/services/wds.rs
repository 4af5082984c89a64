// @generated by qmi-codegen from qmi-service-wds.json. DO NOT EDIT.

//! Generated bindings for the QMI WDS service.

use std::any::Any;

use crate::error::QmiError;
use crate::frame::find_tag;
use crate::message::{Message, Request, Response};
use crate::registry::MessageRegistry;
use crate::service::Service;
use crate::services::common::{OperationResult, QMI_SERVICE_WDS};
use crate::transport::Device;
use crate::wire;

/// Request for WDS "Start Network" (message 0x0020).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WdsStartNetworkInput {
    /// "Apn" TLV (tag 0x14).
    pub apn: String,
    /// "Username" TLV (tag 0x17).
    pub username: String,
    /// "Password" TLV (tag 0x18).
    pub password: String,
}

/// Response for WDS "Start Network" (message 0x0020).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WdsStartNetworkOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
    /// "Packet Data Handle" TLV (tag 0x01).
    pub packet_data_handle: u32,
}

impl Message for WdsStartNetworkInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_WDS
    }

    fn message_id(&self) -> u16 {
        0x0020
    }
}

impl Request for WdsStartNetworkInput {
    fn write_tlvs(&self, out: &mut Vec<u8>) -> Result<(), QmiError> {
        let mut buf_apn = Vec::new();
        buf_apn.extend_from_slice(self.apn.as_bytes());
        out.push(0x14);
        out.extend_from_slice(&wire::tlv_len(&buf_apn)?.to_le_bytes());
        out.extend_from_slice(&buf_apn);
        let mut buf_username = Vec::new();
        buf_username.extend_from_slice(self.username.as_bytes());
        out.push(0x17);
        out.extend_from_slice(&wire::tlv_len(&buf_username)?.to_le_bytes());
        out.extend_from_slice(&buf_username);
        let mut buf_password = Vec::new();
        buf_password.extend_from_slice(self.password.as_bytes());
        out.push(0x18);
        out.extend_from_slice(&wire::tlv_len(&buf_password)?.to_le_bytes());
        out.extend_from_slice(&buf_password);
        Ok(())
    }
}

impl Message for WdsStartNetworkOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_WDS
    }

    fn message_id(&self) -> u16 {
        0x0020
    }
}

impl Response for WdsStartNetworkOutput {
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
            self.packet_data_handle = wire::read_u32(buf)?;
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
    /// Sends a WDS "Start Network" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn wds_start_network(
        &self,
        input: WdsStartNetworkInput,
    ) -> Result<WdsStartNetworkOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<WdsStartNetworkOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Request for WDS "Stop Network" (message 0x0021).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WdsStopNetworkInput {
    /// "Packet Data Handle" TLV (tag 0x01).
    pub packet_data_handle: u32,
}

/// Response for WDS "Stop Network" (message 0x0021).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WdsStopNetworkOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
}

impl Message for WdsStopNetworkInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_WDS
    }

    fn message_id(&self) -> u16 {
        0x0021
    }
}

impl Request for WdsStopNetworkInput {
    fn write_tlvs(&self, out: &mut Vec<u8>) -> Result<(), QmiError> {
        out.push(0x01);
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&self.packet_data_handle.to_le_bytes());
        Ok(())
    }
}

impl Message for WdsStopNetworkOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_WDS
    }

    fn message_id(&self) -> u16 {
        0x0021
    }
}

impl Response for WdsStopNetworkOutput {
    fn read_tlvs(&mut self, tlvs: &[u8]) -> Result<(), QmiError> {
        match find_tag(tlvs, 0x02) {
            Some(payload) => {
                let buf = &mut &payload[..];
                self.operation_result = OperationResult::read_from(buf)?;
            }
            None => return Err(QmiError::MissingOperationResult),
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
    /// Sends a WDS "Stop Network" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn wds_stop_network(
        &self,
        input: WdsStopNetworkInput,
    ) -> Result<WdsStopNetworkOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<WdsStopNetworkOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Request for WDS "Get Packet Service Status" (message 0x0022).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WdsGetPacketServiceStatusInput {}

/// Response for WDS "Get Packet Service Status" (message 0x0022).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WdsGetPacketServiceStatusOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
    /// "Connection Status" TLV (tag 0x01).
    pub connection_status: u8,
}

impl Message for WdsGetPacketServiceStatusInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_WDS
    }

    fn message_id(&self) -> u16 {
        0x0022
    }
}

impl Request for WdsGetPacketServiceStatusInput {
    fn write_tlvs(&self, _out: &mut Vec<u8>) -> Result<(), QmiError> {
        Ok(())
    }
}

impl Message for WdsGetPacketServiceStatusOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_WDS
    }

    fn message_id(&self) -> u16 {
        0x0022
    }
}

impl Response for WdsGetPacketServiceStatusOutput {
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
            self.connection_status = wire::read_u8(buf)?;
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
    /// Sends a WDS "Get Packet Service Status" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn wds_get_packet_service_status(
        &self,
        input: WdsGetPacketServiceStatusInput,
    ) -> Result<WdsGetPacketServiceStatusOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<WdsGetPacketServiceStatusOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Installs this module's response factories into `reg`.
pub(crate) fn register(reg: &mut MessageRegistry) {
    reg.register(|| Box::new(WdsStartNetworkOutput::default()));
    reg.register(|| Box::new(WdsStopNetworkOutput::default()));
    reg.register(|| Box::new(WdsGetPacketServiceStatusOutput::default()));
}
