//! Parses the UEFI load-options string into SuperBoot's startup settings.
//!
//! The load-options string comes from [`LoadedImageProtocol::load_options`],
//! a wide (UCS-2) string that firmware or a parent bootloader may populate.
//! SuperBoot recognizes one token, matched as a substring: `verbose`, which
//! raises the log threshold from `Info` to `Debug`.

use superboot_core::log::LogLevel;

/// Startup settings derived from the firmware load-options string.
#[derive(Debug, Clone, Copy)]
pub struct StartupArgs {
    /// Log threshold to install before the orchestrator runs.
    pub log_level: LogLevel,
}

impl StartupArgs {
    /// Parses load options, defaulting to `Info` verbosity when `cmdline` is
    /// `None`, empty, or contains no recognized tokens.
    #[must_use]
    pub fn parse(cmdline: Option<&str>) -> Self {
        let mut args = Self {
            log_level: LogLevel::Info,
        };

        let Some(cmdline) = cmdline else {
            return args;
        };

        for token in cmdline.split_whitespace() {
            if token.eq_ignore_ascii_case("verbose") {
                args.log_level = LogLevel::Debug;
            }
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cmdline_defaults_to_info() {
        let args = StartupArgs::parse(None);
        assert_eq!(args.log_level, LogLevel::Info);
    }

    #[test]
    fn empty_cmdline_defaults_to_info() {
        let args = StartupArgs::parse(Some(""));
        assert_eq!(args.log_level, LogLevel::Info);
    }

    #[test]
    fn verbose_token_raises_threshold() {
        let args = StartupArgs::parse(Some("verbose"));
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn verbose_is_case_insensitive_and_ignores_other_tokens() {
        let args = StartupArgs::parse(Some("quiet VERBOSE extra=1"));
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn unrecognized_tokens_keep_default() {
        let args = StartupArgs::parse(Some("--nocapture --test-threads 4"));
        assert_eq!(args.log_level, LogLevel::Info);
    }
}
