use shortgate::errors::{Result, ShortgateError};
use std::error::Error;

mod error_creation_tests {
    use super::*;

    #[test]
    fn test_domain_errors() {
        let cases = [
            (ShortgateError::validation("bad url"), "E001", 400),
            (ShortgateError::conflict("taken"), "E002", 409),
            (ShortgateError::not_found("missing"), "E003", 404),
            (ShortgateError::gone("expired"), "E004", 410),
            (ShortgateError::forbidden("not yours"), "E005", 403),
            (ShortgateError::resource_exhausted("no codes left"), "E006", 503),
        ];

        for (error, code, status) in cases {
            assert_eq!(error.code(), code);
            assert_eq!(error.http_status(), status);
            assert!(error.is_domain_error());
        }
    }

    #[test]
    fn test_infrastructure_errors_map_to_500() {
        let cases = [
            ShortgateError::cache_connection("redis down"),
            ShortgateError::config("bad toml"),
            ShortgateError::database_config("bad url"),
            ShortgateError::database_connection("refused"),
            ShortgateError::database_operation("syntax"),
            ShortgateError::serialization("bad json"),
        ];

        for error in cases {
            assert_eq!(error.http_status(), 500);
            assert!(!error.is_domain_error());
            assert!(error.code().starts_with("E1"));
        }
    }

    #[test]
    fn test_display_includes_type_and_message() {
        let error = ShortgateError::gone("Link 'abc123' has expired");
        assert_eq!(error.to_string(), "Link Gone: Link 'abc123' has expired");
        assert_eq!(error.message(), "Link 'abc123' has expired");
    }

    #[test]
    fn test_colored_output_contains_code() {
        let error = ShortgateError::conflict("Short code 'abc' is already in use");
        let output = error.format_colored();
        assert!(output.contains("E002"));
        assert!(output.contains("Short code 'abc' is already in use"));
    }
}

mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: ShortgateError = json_err.into();
        assert!(matches!(error, ShortgateError::Serialization(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        let error: ShortgateError = io_err.into();
        assert!(matches!(error, ShortgateError::Config(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse(input: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(input)?)
        }

        assert!(parse("{}").is_ok());
        assert!(matches!(parse("{"), Err(ShortgateError::Serialization(_))));
    }

    #[test]
    fn test_is_std_error() {
        let error = ShortgateError::not_found("x");
        let boxed: Box<dyn Error> = Box::new(error);
        assert!(boxed.source().is_none());
    }
}
