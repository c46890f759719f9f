use std::process::ExitCode;

use pdftext::cli::{self, OcrCli};

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_tracing();

    let args = match cli::commands::parse_args::<OcrCli, _, _>(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    cli::commands::ocr::run(args).await
}
