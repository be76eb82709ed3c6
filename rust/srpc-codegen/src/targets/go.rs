//! Go stub generation.
//!
//! A generated file is assembled in two passes. [`emit::StubEmitter`] walks
//! the services of one proto file and produces a list of [`ir::Fragment`]s,
//! registering every package it references along the way. [`render_file`]
//! then writes the header, the import block and each fragment in order.

pub mod client;
pub mod emit;
pub mod ir;
pub mod server;

use std::fmt;

use crate::code_writer::CodeWriter;
use crate::descriptor::FileDescriptor;
use crate::error::Result;
use crate::gw_writeln;
use crate::mode::GenerationMode;
use crate::options::GeneratorOptions;

use emit::{StubEmitter, StubFile};
use ir::{Fragment, Runtime};

/// Name written into the "Code generated" header line.
pub const GENERATOR_NAME: &str = "protoc-gen-srpc";

/// Generate the stubs for `file` in `mode`. `None` when no service in the
/// file has methods.
pub fn generate(
    file: &FileDescriptor,
    mode: GenerationMode,
    options: &GeneratorOptions,
) -> Result<Option<String>> {
    let mut emitter = StubEmitter::new(file, mode, options);
    for service in file.generated_services() {
        emitter.emit_service(service)?;
    }

    let Some(stub) = emitter.finish() else {
        return Ok(None);
    };

    let mut out = String::new();
    render_file(&mut CodeWriter::new(&mut out), file, &stub, options)?;
    Ok(Some(out))
}

/// Write a complete Go source file.
pub fn render_file<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    file: &FileDescriptor,
    stub: &StubFile,
    options: &GeneratorOptions,
) -> fmt::Result {
    w.comment(&format!(
        "Code generated by {GENERATOR_NAME}. DO NOT EDIT.\nsource: {}",
        file.path
    ))?;
    w.blank_line()?;
    gw_writeln!(w, "package {}", file.go_package_name)?;

    if !stub.imports.is_empty() {
        w.blank_line()?;
        stub.imports.render(w, &options.import_rewrite)?;
    }

    for fragment in &stub.fragments {
        w.blank_line()?;
        render_fragment(w, fragment, &stub.runtime)?;
    }

    Ok(())
}

fn render_fragment<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    fragment: &Fragment,
    runtime: &Runtime,
) -> fmt::Result {
    match fragment {
        Fragment::ClientDecl(decl) => client::render_client_decl(w, decl),
        Fragment::ClientMethod(method) => client::render_client_method(w, method, runtime),
        Fragment::ServerInterface(interface) => {
            server::render_server_interface(w, interface, runtime)
        }
        Fragment::DispatchWrapper(wrapper) => server::render_dispatch_wrapper(w, wrapper),
        Fragment::Registration(registration) => {
            server::render_registration(w, registration, runtime)
        }
        Fragment::Multiplexer(mux) => server::render_multiplexer(w, mux, runtime),
        Fragment::DispatchHandler(handler) => {
            server::render_dispatch_handler(w, handler, runtime)
        }
    }
}
