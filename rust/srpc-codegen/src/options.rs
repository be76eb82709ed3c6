//! Generator configuration parsed from the protoc parameter string.
//!
//! protoc hands the plugin everything after `--srpc_out=` and before `:` as one
//! comma-separated string, e.g.
//! `plugins=kite+ctx,import_prefix=github.com/acme/,paths=source_relative`.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::imports::ImportRewrite;
use crate::mode::GenerationMode;

pub const DEFAULT_TRANSPORT_PATH: &str = "meta/pkg/srpc";
pub const DEFAULT_CODEC_PATH: &str = "meta/pkg/srpc/pb";

/// Where output files are placed relative to the output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathsMode {
    /// Under the Go import path of the file.
    #[default]
    Import,
    /// Next to the proto file, mirroring its relative path.
    SourceRelative,
}

/// How generated registration functions reach the service registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistryStyle {
    /// `RegXServer(handle XServer)` adding to `pb.ServiceDispatchObject`.
    #[default]
    Global,
    /// `RegXServer(registry pb.ServiceRegistry, handle XServer)`.
    Explicit,
}

/// Options for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Requested modes, deduplicated, in generation order.
    pub modes: Vec<GenerationMode>,
    pub import_rewrite: ImportRewrite,
    pub paths: PathsMode,
    pub registry: RegistryStyle,
    /// Import path of the transport package (`Invoke`, `Destination`, `Option`).
    pub transport_path: String,
    /// Import path of the codec package (`Marshal`, `Unmarshal`, registry).
    pub codec_path: String,
    /// `M` overrides: proto path to Go import path.
    pub go_import_map: BTreeMap<String, String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            modes: Vec::new(),
            import_rewrite: ImportRewrite::default(),
            paths: PathsMode::default(),
            registry: RegistryStyle::default(),
            transport_path: DEFAULT_TRANSPORT_PATH.to_string(),
            codec_path: DEFAULT_CODEC_PATH.to_string(),
            go_import_map: BTreeMap::new(),
        }
    }
}

impl GeneratorOptions {
    /// Parse a protoc parameter string. Any unknown key or value fails the
    /// whole parse.
    pub fn parse(parameter: &str) -> Result<Self> {
        let mut options = Self::default();

        for entry in parameter.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry.split_once('=').unwrap_or((entry, ""));

            if let Some(proto_path) = key.strip_prefix('M') {
                options
                    .go_import_map
                    .insert(proto_path.to_string(), value.to_string());
                continue;
            }

            match key {
                "plugins" => {
                    for name in value.split('+').filter(|name| !name.is_empty()) {
                        if let Some(mode) = GenerationMode::from_plugin_name(name)? {
                            if !options.modes.contains(&mode) {
                                options.modes.push(mode);
                            }
                        }
                    }
                }
                "import_prefix" => {
                    options.import_rewrite.prefix =
                        (!value.is_empty()).then(|| value.to_string());
                }
                "paths" => {
                    options.paths = match value {
                        "import" => PathsMode::Import,
                        "source_relative" => PathsMode::SourceRelative,
                        _ => return Err(invalid(key, value)),
                    }
                }
                "registry" => {
                    options.registry = match value {
                        "explicit" => RegistryStyle::Explicit,
                        "global" => RegistryStyle::Global,
                        _ => return Err(invalid(key, value)),
                    }
                }
                "srpc_path" | "pb_path" if value.is_empty() => return Err(invalid(key, value)),
                "srpc_path" => options.transport_path = value.to_string(),
                "pb_path" => options.codec_path = value.to_string(),
                _ => return Err(Error::UnknownParameter(key.to_string())),
            }
        }

        options.modes.sort();
        Ok(options)
    }
}

fn invalid(name: &str, value: &str) -> Error {
    Error::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    }
}
