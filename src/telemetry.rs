use tracing::Level;

use crate::AppConfig;

/// Installs the fmt subscriber on stderr so logs never interleave with rendered output.
pub fn init_tracing(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::WARN);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Sentry stays uninitialised (and `capture_message` a no-op) without a DSN.
pub fn init_sentry(cfg: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = match cfg.sentry_dsn.as_deref()?.parse::<sentry::types::Dsn>() {
        Ok(dsn) => dsn,
        Err(e) => {
            tracing::warn!("ignoring invalid sentry_dsn: {}", e);
            return None;
        }
    };

    Some(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentry_is_skipped_without_valid_dsn() {
        assert!(init_sentry(&AppConfig::default()).is_none());

        let cfg = AppConfig {
            sentry_dsn: Some("not a dsn".to_string()),
            ..AppConfig::default()
        };
        assert!(init_sentry(&cfg).is_none());
    }
}
