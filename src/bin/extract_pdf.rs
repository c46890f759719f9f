use std::process::ExitCode;

use pdftext::cli::{self, ExtractCli};

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_tracing();

    let args = match cli::commands::parse_args::<ExtractCli, _, _>(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    cli::commands::extract::run(args).await
}
