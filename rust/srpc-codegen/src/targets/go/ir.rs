//! Fragments of a generated Go file.
//!
//! The emitter decides *what* is declared and with which names; the client and
//! server renderers decide how each fragment is laid out. Type references are
//! already qualified for the file they will be rendered into.

use crate::options::RegistryStyle;

/// Package qualifiers of the runtime dependencies, as registered in the
/// file's import set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    pub errors: String,
    pub transport: String,
    pub codec: String,
    /// Present only in context-aware files.
    pub context: Option<String>,
}

/// One logical block of generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    ClientDecl(ClientDecl),
    ClientMethod(ClientMethod),
    ServerInterface(ServerInterface),
    DispatchWrapper(DispatchWrapper),
    Registration(Registration),
    Multiplexer(Multiplexer),
    DispatchHandler(DispatchHandler),
}

/// `var Echo = &echo{}` and `type echo struct{}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDecl {
    pub service: String,
    pub instance: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMethod {
    pub instance: String,
    pub service: String,
    pub method: String,
    pub namespace: String,
    pub request: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInterface {
    pub name: String,
    pub service: String,
    pub methods: Vec<InterfaceMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub method: String,
    pub request: String,
    pub response: String,
}

/// Struct binding a server implementation to the dispatch logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchWrapper {
    pub name: String,
    pub service: String,
    pub interface: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub function: String,
    pub service: String,
    pub namespace: String,
    pub wrapper: String,
    pub interface: String,
    pub style: RegistryStyle,
}

/// The `Do` method: routes a method name to its dispatch handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiplexer {
    pub wrapper: String,
    pub service: String,
    /// Method names in descriptor order; each is also the name of its
    /// dispatch handler.
    pub routes: Vec<String>,
}

impl Multiplexer {
    /// The route a call for `function` takes: exact, case-sensitive match, as
    /// a Go `switch` on strings behaves.
    pub fn route(&self, function: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|route| route.as_str() == function)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchHandler {
    pub wrapper: String,
    pub method: String,
    pub request: String,
}
