//! Installation
//!
//! Wraps the document's media capability APIs once per document. Each API
//! is patched on its own, so one that is missing or read-only does not stop
//! the others.

use std::sync::Arc;

use fos_media::{Api, CanPlayType, MediaWindow};

use crate::GuardError;
use crate::capabilities::GuardedDecodingInfo;
use crate::config::FlagSource;
use crate::rules::CodecPolicy;
use crate::wrap::GuardedTypeSupport;

/// Document marker set by the first installation attempt
pub const INJECTED_MARKER: &str = "__fosCodecGuardInjected";

/// Per-API patch results
#[derive(Debug, Clone, PartialEq)]
pub struct InstallReport {
    pub can_play_type: Result<(), GuardError>,
    pub is_type_supported: Result<(), GuardError>,
    pub decoding_info: Result<(), GuardError>,
}

impl InstallReport {
    pub fn results(&self) -> [(Api, &Result<(), GuardError>); 3] {
        [
            (Api::CanPlayType, &self.can_play_type),
            (Api::IsTypeSupported, &self.is_type_supported),
            (Api::DecodingInfo, &self.decoding_info),
        ]
    }

    /// Number of APIs now guarded
    pub fn installed(&self) -> usize {
        self.results().iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.installed() == 3
    }
}

/// What [`CodecGuard::install_if_enabled`] did
#[derive(Debug, Clone, PartialEq)]
pub enum InstallOutcome {
    /// An earlier run already handled this document
    AlreadyInjected,
    /// The master switch is off; nothing was touched
    Disabled,
    /// Battery-only mode and the device is on external power
    OnExternalPower,
    Installed(InstallReport),
}

/// Installs codec rules into a document's media APIs
#[derive(Debug, Clone)]
pub struct CodecGuard {
    policy: CodecPolicy,
}

impl CodecGuard {
    pub fn new(flags: Arc<dyn FlagSource>) -> Self {
        Self { policy: CodecPolicy::new(flags) }
    }

    pub fn policy(&self) -> &CodecPolicy {
        &self.policy
    }

    /// Entry point, run once when a document loads.
    ///
    /// In battery-only mode this waits for the battery query. A document
    /// without the Battery Status API, or a failed query, gets the rules
    /// installed regardless.
    pub async fn install_if_enabled(&self, window: &MediaWindow) -> InstallOutcome {
        if !window.claim_marker(INJECTED_MARKER) {
            tracing::debug!("Codec guard already injected");
            return InstallOutcome::AlreadyInjected;
        }

        let config = self.policy.snapshot();
        if !config.enabled {
            tracing::info!("Codec guard disabled");
            return InstallOutcome::Disabled;
        }

        if config.battery_only {
            if let Some(battery) = window.battery() {
                match battery.get_battery().await {
                    Ok(status) if status.charging => {
                        tracing::info!("Codec guard skipped: device is charging");
                        return InstallOutcome::OnExternalPower;
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Battery query failed, installing anyway: {}", e),
                }
            }
        }

        InstallOutcome::Installed(self.install(window))
    }

    /// Patch all three APIs unconditionally
    pub fn install(&self, window: &MediaWindow) -> InstallReport {
        let can_play_type = window
            .can_play_type
            .replace_with(|original| {
                GuardedTypeSupport::wrap(original, CanPlayType::Empty, self.policy.clone())
            })
            .map_err(|e| GuardError::patch(Api::CanPlayType, e));

        let is_type_supported = window
            .is_type_supported
            .replace_with(|original| GuardedTypeSupport::wrap(original, false, self.policy.clone()))
            .map_err(|e| GuardError::patch(Api::IsTypeSupported, e));

        let decoding_info = window
            .decoding_info
            .replace_with(|original| GuardedDecodingInfo::wrap(original, self.policy.clone()))
            .map_err(|e| GuardError::patch(Api::DecodingInfo, e));

        let report = InstallReport { can_play_type, is_type_supported, decoding_info };
        for (api, result) in report.results() {
            match result {
                Ok(()) => tracing::debug!("Guarded {}", api),
                Err(e) => tracing::debug!("Skipped {}: {}", api, e),
            }
        }
        tracing::info!("Codec guard installed on {}/3 APIs", report.installed());
        report
    }
}
