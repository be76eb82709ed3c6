use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Generator-time failure. Any of these aborts the whole run; no files are
/// produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `plugins=` entry names no known generation mode.
    UnknownPlugin(String),
    /// A `plugins=` entry naming a generator this plugin does not provide.
    UnsupportedPlugin(String),
    /// A parameter key the generator does not understand.
    UnknownParameter(String),
    /// A known parameter with an unusable value.
    InvalidParameter { name: String, value: String },
    /// A descriptor is missing a name the front end must always supply.
    MissingName {
        kind: &'static str,
        parent: String,
    },
    /// A request or response type that no file in the request declares.
    UnresolvedType {
        method: String,
        type_name: String,
    },
    /// `file_to_generate` names a file absent from `proto_file`.
    MissingFile(String),
    /// Two methods of one service share a Go name.
    DuplicateMethod { service: String, method: String },
    /// A method name that collides with a generated declaration.
    ReservedMethod { service: String, method: String },
    /// Writing generated text failed.
    Format,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("protoc-gen-srpc: ")?;
        match self {
            Error::UnknownPlugin(name) => write!(f, "unknown plugin {name:?}"),
            Error::UnsupportedPlugin(name) => write!(
                f,
                "plugin {name:?} is not supported; generate gRPC stubs with protoc-gen-go-grpc"
            ),
            Error::UnknownParameter(name) => write!(f, "unknown parameter {name:?}"),
            Error::InvalidParameter { name, value } => {
                write!(f, "invalid value {value:?} for parameter {name:?}")
            }
            Error::MissingName { kind, parent } => {
                write!(f, "{kind} without a name in {parent}")
            }
            Error::UnresolvedType { method, type_name } => {
                write!(f, "method {method} refers to unknown message {type_name}")
            }
            Error::MissingFile(name) => {
                write!(f, "{name} is marked for generation but was not supplied")
            }
            Error::DuplicateMethod { service, method } => {
                write!(f, "service {service} declares method {method} more than once")
            }
            Error::ReservedMethod { service, method } => write!(
                f,
                "method {service}.{method} collides with the generated dispatcher"
            ),
            Error::Format => f.write_str("failed to write generated source"),
        }
    }
}

impl std::error::Error for Error {}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Format
    }
}
