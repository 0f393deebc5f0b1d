//! Service configuration: compile-time constants plus environment overrides.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const APP_NAME: &str = "p2p-report";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,p2p_report=debug".into()
}

/// Runtime configuration, `Default` for the common local setup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// Directory under which per-request working directories are created.
    pub work_root: PathBuf,
    /// Grace period between the response and working-directory deletion —
    /// the window the download boundary has to serve the artifacts.
    pub cleanup_grace: Duration,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 8000).into(),
            work_root: PathBuf::from("."),
            cleanup_grace: Duration::from_secs(100),
            max_upload_bytes: 55 * 1024 * 1024, // 50 MB uploads + multipart overhead
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `P2P_REPORT_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(addr) = std::env::var("P2P_REPORT_ADDR") {
            match addr.parse() {
                Ok(parsed) => cfg.bind_addr = parsed,
                Err(e) => tracing::warn!(addr = %addr, error = %e, "Ignoring invalid P2P_REPORT_ADDR"),
            }
        }
        if let Ok(root) = std::env::var("P2P_REPORT_WORK_ROOT") {
            cfg.work_root = PathBuf::from(root);
        }
        if let Ok(secs) = std::env::var("P2P_REPORT_CLEANUP_GRACE_SECS") {
            match secs.parse::<u64>() {
                Ok(parsed) => cfg.cleanup_grace = Duration::from_secs(parsed),
                Err(e) => tracing::warn!(value = %secs, error = %e, "Ignoring invalid P2P_REPORT_CLEANUP_GRACE_SECS"),
            }
        }
        if let Ok(mb) = std::env::var("P2P_REPORT_MAX_UPLOAD_MB") {
            match mb.parse::<usize>() {
                Ok(parsed) => cfg.max_upload_bytes = parsed * 1024 * 1024,
                Err(e) => tracing::warn!(value = %mb, error = %e, "Ignoring invalid P2P_REPORT_MAX_UPLOAD_MB"),
            }
        }

        cfg
    }
}
