//! protoc plugin emitting Go srpc client stubs and server dispatchers.
//!
//! # Usage
//!
//! ```bash
//! protoc --plugin=protoc-gen-srpc --srpc_out=plugins=kite+ctx:./gen echo/echo.proto
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`; stdout carries
//! the encoded response.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("protoc-gen-srpc: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .map_err(|e| format!("failed to read request from stdin: {e}"))?;

    let request = CodeGeneratorRequest::decode(input.as_slice())
        .map_err(|e| format!("failed to decode CodeGeneratorRequest: {e}"))?;

    let response = srpc_codegen::plugin::respond(&request);
    if let Some(error) = &response.error {
        tracing::warn!(%error, "generation failed");
    }

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .and_then(|()| stdout.flush())
        .map_err(|e| format!("failed to write response to stdout: {e}"))
}
