pub mod extract;
pub mod ocr;

use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use serde::Serialize;

use crate::error::PdfTextError;
use crate::report::{self, FailureReport};

/// Print `record` and map the outcome to an exit code
fn finish<T: Serialize>(record: &T, code: u8) -> ExitCode {
    match report::emit(record) {
        Ok(()) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("Failed to write result: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn log_failure(err: &PdfTextError) {
    tracing::error!(kind = err.kind(), "{}", err);
}

fn missing_argument(message: &'static str) -> ExitCode {
    let err = PdfTextError::MissingArgument(message);
    log_failure(&err);
    finish(&FailureReport::new(err.to_string()), 1)
}

/// Parse the command line, printing a failure record with exit status 1 on
/// bad arguments. Help and version output keep clap's own behaviour.
pub fn parse_args<T, I, A>(args: I) -> Result<T, ExitCode>
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    T::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            let err = PdfTextError::Usage(usage_message(&e));
            log_failure(&err);
            finish(&FailureReport::new(err.to_string()), 1)
        }
    })
}

/// First line of clap's rendered error, without the usage block.
fn usage_message(err: &clap::Error) -> String {
    err.to_string()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ExtractCli, OcrCli};

    #[test]
    fn test_usage_message_is_single_line() {
        let err = ExtractCli::try_parse_from(["extract-pdf", "a.pdf", "extra"]).unwrap_err();
        let message = usage_message(&err);
        assert!(message.contains("unexpected argument 'extra'"));
        assert!(!message.contains('\n'));
        assert!(!message.contains("Usage"));
    }

    #[test]
    fn test_unknown_flag_message() {
        let err = OcrCli::try_parse_from(["ocr-pdf", "--dpi", "300"]).unwrap_err();
        assert!(usage_message(&err).contains("--dpi"));
    }

    #[test]
    fn test_parse_args_accepts_valid_command_line() {
        let cli: OcrCli = parse_args(["ocr-pdf", "scan.pdf", "-l", "eng"]).unwrap();
        assert_eq!(cli.lang.as_deref(), Some("eng"));
    }

    #[test]
    fn test_parse_args_rejects_extra_argument() {
        let result: Result<ExtractCli, ExitCode> = parse_args(["extract-pdf", "a.pdf", "b.pdf"]);
        assert!(result.is_err());
    }
}
