#[cfg(test)]
mod tests {
    use crate::error::RustTdeError;
    use crate::scsi::SgStatus;

    #[test]
    fn test_error_creation() {
        let config_error = RustTdeError::config("config test error");
        assert!(matches!(config_error, RustTdeError::Config(_)));

        let parse_error = RustTdeError::parse("short page");
        assert!(matches!(parse_error, RustTdeError::Parse(_)));

        let validation = RustTdeError::parameter_validation("empty key");
        assert!(matches!(validation, RustTdeError::ParameterValidation(_)));
    }

    #[test]
    fn test_transport_error_names_fd() {
        let error = RustTdeError::Transport {
            fd: 3,
            source: std::io::Error::from_raw_os_error(libc::ENOTTY),
        };
        assert!(error.to_string().contains("fd 3"));
    }

    #[test]
    fn test_device_status_error_reports_fields() {
        let error = RustTdeError::DeviceStatus(SgStatus {
            info: 0x1,
            masked_status: 0x01,
            msg_status: 0x00,
            driver_status: 0x08,
            ..Default::default()
        });
        let text = error.to_string();
        assert!(text.contains("mask status 0x01"));
        assert!(text.contains("driver status 0x0008"));
    }

    #[test]
    fn test_boundary_reports_open_failure() {
        assert!(!crate::set_key("/nonexistent/rusttde-nst0", "mysecretkey0123"));
        assert!(!crate::clear_key("/nonexistent/rusttde-nst0"));
    }
}

#[cfg(test)]
mod integration_tests {
    use crate::cli::{Cli, Commands};
    use crate::logger::LogFormat;
    use clap::Parser;

    #[test]
    fn test_set_key_parsing() {
        let args = vec!["rusttde", "set-key", "/dev/nst0", "--key", "mysecretkey0123"];

        let cli = Cli::try_parse_from(args);
        assert!(cli.is_ok());

        if let Ok(cli) = cli {
            if let Commands::SetKey { device, key } = cli.command {
                assert_eq!(device, "/dev/nst0");
                assert_eq!(key, "mysecretkey0123");
            } else {
                panic!("expected set-key");
            }
        }
    }

    #[test]
    fn test_set_key_requires_key() {
        assert!(Cli::try_parse_from(vec!["rusttde", "set-key", "/dev/nst0"]).is_err());
    }

    #[test]
    fn test_clear_key_parsing() {
        let cli = Cli::try_parse_from(vec!["rusttde", "clear-key", "/dev/nst0", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::ClearKey { .. }));
    }

    #[test]
    fn test_device_is_required() {
        assert!(Cli::try_parse_from(vec!["rusttde", "clear-key"]).is_err());
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from(vec![
            "rusttde",
            "status",
            "/dev/sg1",
            "--json",
            "--log-format",
            "json",
            "--config",
            "/etc/rusttde.json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/etc/rusttde.json"))
        );
        assert!(matches!(cli.command, Commands::Status { json: true, .. }));
    }

    #[test]
    fn test_check_eod_parsing() {
        let cli = Cli::try_parse_from(vec!["rusttde", "check-eod", "/dev/nst0"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckEod { .. }));
    }
}
