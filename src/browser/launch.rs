//! Browser launch-argument assembly
//!
//! The flags are an enumerated configuration passed through verbatim to the
//! browser engine. No validation happens here; a typo'd flag is the
//! engine's problem, same as it always was.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Toggles for browser launch arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchFlags {
    /// Required when running as root inside a container
    pub no_sandbox: bool,
    /// Avoids /dev/shm exhaustion in constrained containers
    pub disable_dev_shm_usage: bool,
    /// Skip GPU initialization
    pub disable_gpu: bool,
    /// Permit internally-signed HTTPS hosts
    pub ignore_certificate_errors: bool,
    /// Companion flag to the certificate toggle
    pub ignore_ssl_errors: bool,
    /// Disable same-origin policy enforcement
    pub disable_web_security: bool,
    /// Allow HTTP subresources on HTTPS pages
    pub allow_running_insecure_content: bool,
    /// Docker stability set: single-process, no-zygote, memory-pressure-off.
    /// Applied automatically when /.dockerenv exists.
    pub docker_stability: bool,
    /// Extra flags appended verbatim after the toggles
    #[serde(default)]
    pub extra: Vec<String>,
}

impl Default for LaunchFlags {
    fn default() -> Self {
        Self {
            no_sandbox: true,
            disable_dev_shm_usage: true,
            disable_gpu: true,
            ignore_certificate_errors: true,
            ignore_ssl_errors: true,
            disable_web_security: true,
            allow_running_insecure_content: true,
            docker_stability: in_container(),
            extra: Vec::new(),
        }
    }
}

/// Whether the process is running inside a Docker container
pub fn in_container() -> bool {
    Path::new("/.dockerenv").exists()
}

impl LaunchFlags {
    /// Assemble the launch-argument list
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.no_sandbox {
            args.push("--no-sandbox".to_string());
            args.push("--disable-setuid-sandbox".to_string());
        }
        if self.disable_dev_shm_usage {
            args.push("--disable-dev-shm-usage".to_string());
        }
        if self.disable_gpu {
            args.push("--disable-gpu".to_string());
        }
        if self.ignore_certificate_errors {
            args.push("--ignore-certificate-errors".to_string());
        }
        if self.ignore_ssl_errors {
            args.push("--ignore-ssl-errors".to_string());
        }
        if self.disable_web_security {
            args.push("--disable-web-security".to_string());
        }
        if self.allow_running_insecure_content {
            args.push("--allow-running-insecure-content".to_string());
        }
        if self.docker_stability {
            args.push("--single-process".to_string());
            args.push("--no-zygote".to_string());
            args.push("--memory-pressure-off".to_string());
        }

        args.extend(self.extra.iter().cloned());
        args
    }
}
