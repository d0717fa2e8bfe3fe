//! `memhook health`: the SessionStart hook.
//!
//! Always prints a status payload so the agent knows whether memory is
//! available this session.

use std::time::Duration;

use memhook_config::HookConfig;
use memhook_core::error::StoreError;
use memhook_core::hook::{HookOutput, SESSION_START};
use memhook_core::store::MemoryStore;
use memhook_store::HttpMemoryStore;
use tracing::warn;

use super::emit;

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

const DISABLED_NOTICE: &str = "Memory injection is disabled this session. \
Run `memhook config` to check the settings in ~/.config/memhook/config.env.";

pub async fn run() -> anyhow::Result<()> {
    let message = match HookConfig::load() {
        Ok(config) => {
            let result = match HttpMemoryStore::from_config(&config) {
                Ok(store) => store.health(HEALTH_TIMEOUT).await,
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                warn!(error = %e, unreachable = e.is_unreachable(), "Memory store health check failed");
            }
            health_message(&config, &result)
        }
        Err(e) => {
            warn!(error = %e, "Configuration invalid");
            format!("WARNING: memhook configuration is invalid ({e}). {DISABLED_NOTICE}")
        }
    };

    emit(&HookOutput::new(SESSION_START, message))
}

/// The status line reported for a health check result.
pub fn health_message(config: &HookConfig, result: &Result<(), StoreError>) -> String {
    let api = &config.api_url;
    match result {
        Ok(()) => format!(
            "MemOS memory connected ({api}, user: {}, cube: {})",
            config.user_id, config.cube_id
        ),
        Err(e) => match e.status_code() {
            Some(code) => format!("WARNING: MemOS returned HTTP {code} at {api}. {DISABLED_NOTICE}"),
            None => format!("WARNING: MemOS is NOT reachable at {api}. {DISABLED_NOTICE}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_message_names_target() {
        let message = health_message(&HookConfig::default(), &Ok(()));
        assert_eq!(
            message,
            "MemOS memory connected (http://127.0.0.1:8080, user: default, cube: memos)"
        );
    }

    #[test]
    fn status_failure_reports_code() {
        let result = Err(StoreError::Status {
            status_code: 502,
            body: "bad gateway".into(),
        });
        let message = health_message(&HookConfig::default(), &result);
        assert!(message.starts_with("WARNING: MemOS returned HTTP 502 at http://127.0.0.1:8080."));
        assert!(message.ends_with(DISABLED_NOTICE));
    }

    #[test]
    fn transport_failure_reports_unreachable() {
        for error in [
            StoreError::Timeout { timeout_ms: 3000 },
            StoreError::Network("connection refused".into()),
        ] {
            let message = health_message(&HookConfig::default(), &Err(error));
            assert!(message.starts_with("WARNING: MemOS is NOT reachable at http://127.0.0.1:8080."));
        }
    }

    #[test]
    fn disabled_notice_points_at_config_command() {
        assert!(DISABLED_NOTICE.contains("`memhook config`"));
        assert!(DISABLED_NOTICE.contains("~/.config/memhook/config.env"));
        assert!(!DISABLED_NOTICE.contains("setup.sh"));
    }
}
