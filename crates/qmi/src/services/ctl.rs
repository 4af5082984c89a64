// @generated by qmi-codegen from qmi-service-ctl.json. DO NOT EDIT.

//! Generated bindings for the QMI CTL service.

use std::any::Any;

use crate::error::QmiError;
use crate::frame::find_tag;
use crate::message::{Message, Request, Response};
use crate::registry::MessageRegistry;
use crate::service::Service;
use crate::services::common::{OperationResult, QMI_SERVICE_CTL};
use crate::transport::Device;
use crate::wire;

/// Request for CTL "Sync" (message 0x0027).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlSyncInput {}

/// Response for CTL "Sync" (message 0x0027).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlSyncOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
}

impl Message for CtlSyncInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_CTL
    }

    fn message_id(&self) -> u16 {
        0x0027
    }
}

impl Request for CtlSyncInput {
    fn write_tlvs(&self, _out: &mut Vec<u8>) -> Result<(), QmiError> {
        Ok(())
    }
}

impl Message for CtlSyncOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_CTL
    }

    fn message_id(&self) -> u16 {
        0x0027
    }
}

impl Response for CtlSyncOutput {
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
    /// Sends a CTL "Sync" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn ctl_sync(&self, input: CtlSyncInput) -> Result<CtlSyncOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<CtlSyncOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Request for CTL "Allocate CID" (message 0x0022).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlAllocateCidInput {
    /// "Service" TLV (tag 0x01).
    pub service: u8,
}

/// Response for CTL "Allocate CID" (message 0x0022).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlAllocateCidOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
    /// "Allocation Info" TLV (tag 0x01).
    pub allocation_info: CtlAllocateCidOutputAllocationInfo,
}

/// "Allocation Info" record of [`CtlAllocateCidOutput`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlAllocateCidOutputAllocationInfo {
    /// "Service" field.
    pub service: u8,
    /// "Cid" field.
    pub cid: u8,
}

impl CtlAllocateCidOutputAllocationInfo {
    /// Reads the record's fields from `buf` in declaration order.
    ///
    /// # Errors
    ///
    /// [`QmiError::TruncatedTlv`] if `buf` ends early.
    pub fn read_from(buf: &mut &[u8]) -> Result<Self, QmiError> {
        Ok(Self {
            service: wire::read_u8(buf)?,
            cid: wire::read_u8(buf)?,
        })
    }
}

impl Message for CtlAllocateCidInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_CTL
    }

    fn message_id(&self) -> u16 {
        0x0022
    }
}

impl Request for CtlAllocateCidInput {
    fn write_tlvs(&self, out: &mut Vec<u8>) -> Result<(), QmiError> {
        out.push(0x01);
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.service.to_le_bytes());
        Ok(())
    }
}

impl Message for CtlAllocateCidOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_CTL
    }

    fn message_id(&self) -> u16 {
        0x0022
    }
}

impl Response for CtlAllocateCidOutput {
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
            self.allocation_info = CtlAllocateCidOutputAllocationInfo::read_from(buf)?;
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
    /// Sends a CTL "Allocate CID" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn ctl_allocate_cid(
        &self,
        input: CtlAllocateCidInput,
    ) -> Result<CtlAllocateCidOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<CtlAllocateCidOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Request for CTL "Release CID" (message 0x0023).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlReleaseCidInput {
    /// "Release Info" TLV (tag 0x01).
    pub release_info: CtlReleaseCidInputReleaseInfo,
}

/// "Release Info" record of [`CtlReleaseCidInput`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlReleaseCidInputReleaseInfo {
    /// "Service" field.
    pub service: u8,
    /// "Cid" field.
    pub cid: u8,
}

impl CtlReleaseCidInputReleaseInfo {
    /// Appends the record's fields to `out` in declaration order.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.service.to_le_bytes());
        out.extend_from_slice(&self.cid.to_le_bytes());
    }
}

/// Response for CTL "Release CID" (message 0x0023).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtlReleaseCidOutput {
    /// "Operation Result" TLV (tag 0x02).
    pub operation_result: OperationResult,
}

impl Message for CtlReleaseCidInput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_CTL
    }

    fn message_id(&self) -> u16 {
        0x0023
    }
}

impl Request for CtlReleaseCidInput {
    fn write_tlvs(&self, out: &mut Vec<u8>) -> Result<(), QmiError> {
        out.push(0x01);
        out.extend_from_slice(&2u16.to_le_bytes());
        self.release_info.write_to(out);
        Ok(())
    }
}

impl Message for CtlReleaseCidOutput {
    fn service_id(&self) -> Service {
        QMI_SERVICE_CTL
    }

    fn message_id(&self) -> u16 {
        0x0023
    }
}

impl Response for CtlReleaseCidOutput {
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
    /// Sends a CTL "Release CID" request and awaits its response.
    ///
    /// # Errors
    ///
    /// Transport failures, decode failures, and [`QmiError::Protocol`] when
    /// the modem reports a nonzero operation status.
    pub async fn ctl_release_cid(
        &self,
        input: CtlReleaseCidInput,
    ) -> Result<CtlReleaseCidOutput, QmiError> {
        let response = self.send(&input).await?;
        Ok(*response
            .into_any()
            .downcast::<CtlReleaseCidOutput>()
            .expect("registry constructed a mismatched response type"))
    }
}

/// Installs this module's response factories into `reg`.
pub(crate) fn register(reg: &mut MessageRegistry) {
    reg.register(|| Box::new(CtlSyncOutput::default()));
    reg.register(|| Box::new(CtlAllocateCidOutput::default()));
    reg.register(|| Box::new(CtlReleaseCidOutput::default()));
}
