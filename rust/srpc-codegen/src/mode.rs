use std::fmt;

use crate::error::{Error, Result};

/// Shape of the generated stubs.
///
/// Both modes share one emitter; they differ only in whether a
/// `context.Context` leads every client method, server interface method,
/// multiplexer and dispatch handler, and whether it is forwarded to
/// `Invoke` and the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenerationMode {
    Synchronous,
    ContextAware,
}

impl GenerationMode {
    /// Map a `plugins=` entry to a mode. `none` selects nothing; `grpc` is
    /// recognized but not generated.
    pub fn from_plugin_name(name: &str) -> Result<Option<Self>> {
        match name {
            "none" => Ok(None),
            "kite" | "sync" | "legacy-synchronous" => Ok(Some(Self::Synchronous)),
            "ctx" | "context-aware" => Ok(Some(Self::ContextAware)),
            "grpc" => Err(Error::UnsupportedPlugin(name.to_string())),
            other => Err(Error::UnknownPlugin(other.to_string())),
        }
    }

    pub fn is_context_aware(self) -> bool {
        matches!(self, Self::ContextAware)
    }

    /// Suffix appended to the output file prefix.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Synchronous => ".srpc.go",
            Self::ContextAware => "_ctx.srpc.go",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Synchronous => "synchronous",
            Self::ContextAware => "context-aware",
        })
    }
}
