#![deny(unsafe_code)]

//! Go code generation for srpc services, driven by protoc descriptors.
//!
//! `protoc` parses `.proto` files and hands this crate a
//! [`CodeGeneratorRequest`](prost_types::compiler::CodeGeneratorRequest).
//! For every service with at least one method we emit, in Go:
//!
//! - a client singleton whose methods marshal the request, call
//!   `srpc.Invoke`, and unmarshal the response;
//! - a `<Service>Server` interface for implementations;
//! - a `<Service>Service` dispatcher whose `Do` method routes a method name to
//!   the matching handler, plus a `Reg<Service>Server` registration function.
//!
//! Two shapes are available, selected with the `plugins=` parameter: plain
//! synchronous stubs (`kite`) and context-aware stubs (`ctx`) that thread a
//! `context.Context` through every layer. Both can be requested at once; each
//! lands in its own file.
//!
//! # Pipeline
//!
//! ```text
//! CodeGeneratorRequest → DescriptorSet → Generator → StubEmitter → Fragment IR → .srpc.go
//!   (from protoc)         (descriptor)    (driver)    (targets::go)   (client/server)
//! ```
//!
//! # Usage
//!
//! The `protoc-gen-srpc` binary is the usual entry point. Embedding the
//! generator directly:
//!
//! ```
//! use prost_types::compiler::CodeGeneratorRequest;
//!
//! let request = CodeGeneratorRequest {
//!     parameter: Some("plugins=kite".to_string()),
//!     ..Default::default()
//! };
//! let response = srpc_codegen::plugin::respond(&request);
//! assert!(response.error.is_none());
//! assert!(response.file.is_empty());
//! ```

pub mod code_writer;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod imports;
pub mod mode;
pub mod naming;
pub mod options;
pub mod plugin;
pub mod targets;

pub use driver::{GeneratedFile, Generator};
pub use error::{Error, Result};
pub use mode::GenerationMode;
pub use options::GeneratorOptions;
