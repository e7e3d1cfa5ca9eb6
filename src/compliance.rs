use crate::objects::{ComplianceStatus, TokenizedAsset};
use std::fmt;

/// Evaluates an asset against compliance rules
///
/// The registry calls the engine while holding its lock, so implementations
/// must be quick and must not block on I/O.
pub trait ComplianceEngine: fmt::Debug + Send + Sync {
    /// Decide the compliance status an asset should move to
    fn evaluate(&self, asset: &TokenizedAsset) -> ComplianceStatus;
}

/// Placeholder engine that approves every asset it is shown
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApproveEngine;

impl ComplianceEngine for AutoApproveEngine {
    fn evaluate(&self, _asset: &TokenizedAsset) -> ComplianceStatus {
        ComplianceStatus::Approved
    }
}
