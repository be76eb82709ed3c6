//! Builds the fragment list for every service of one (file, mode) pair.

use crate::descriptor::{FileDescriptor, ServiceDescriptor};
use crate::error::{Error, Result};
use crate::imports::ImportSet;
use crate::mode::GenerationMode;
use crate::naming::{NamingBundle, base_name};
use crate::options::GeneratorOptions;

use super::ir::{
    ClientDecl, ClientMethod, DispatchHandler, DispatchWrapper, Fragment, InterfaceMethod,
    Multiplexer, Registration, Runtime, ServerInterface,
};

/// Method name taken by the generated multiplexer.
const MULTIPLEXER_METHOD: &str = "Do";

/// Parameters, results and locals of the generated functions, plus the
/// builtin they call. A package qualifier with one of these names would be
/// shadowed inside the function bodies.
const LOCAL_NAMES: &[&str] = &[
    "c",
    "ctx",
    "destination",
    "err",
    "function",
    "handle",
    "new",
    "opts",
    "registry",
    "req",
    "reqPBData",
    "request",
    "res",
    "resPBData",
    "response",
    "s",
];

/// Everything emitted for one output file.
#[derive(Debug, Clone)]
pub struct StubFile {
    pub imports: ImportSet,
    pub runtime: Runtime,
    pub fragments: Vec<Fragment>,
}

/// Accumulates fragments for one output file.
///
/// Runtime imports are registered by the first service that actually emits
/// something, so a file whose services have no methods ends up with an empty
/// import set and no output.
pub struct StubEmitter<'a> {
    file: &'a FileDescriptor,
    mode: GenerationMode,
    options: &'a GeneratorOptions,
    imports: ImportSet,
    runtime: Option<Runtime>,
    fragments: Vec<Fragment>,
}

impl<'a> StubEmitter<'a> {
    pub fn new(
        file: &'a FileDescriptor,
        mode: GenerationMode,
        options: &'a GeneratorOptions,
    ) -> Self {
        let mut imports = ImportSet::new(file.go_import_path.clone());
        for name in LOCAL_NAMES {
            imports.reserve(*name);
        }
        Self {
            file,
            mode,
            options,
            imports,
            runtime: None,
            fragments: Vec::new(),
        }
    }

    /// Emit every block for `service`, in order. A service without methods
    /// emits nothing.
    pub fn emit_service(&mut self, service: &ServiceDescriptor) -> Result<()> {
        if service.methods.is_empty() {
            tracing::trace!(service = %service.name, "no methods, skipping");
            return Ok(());
        }

        self.require_runtime();

        let mut requests = Vec::with_capacity(service.methods.len());
        for method in &service.methods {
            let request = self.imports.qualify(&method.input);
            let response = self.imports.qualify(&method.output);
            requests.push((method.name.clone(), request, response));
        }

        // Every qualifier this service refers to is registered by now.
        let taken: Vec<&str> = self.imports.taken().collect();
        let naming = NamingBundle::new(&service.name, &self.file.path, &taken);
        for declared in [
            naming.instance.clone(),
            naming.service.clone(),
            naming.server_interface(),
            naming.dispatch_wrapper(),
            naming.register_fn(),
        ] {
            self.imports.reserve(declared);
        }
        let mux = self.multiplexer(service, &naming)?;

        tracing::trace!(
            service = %naming.service,
            namespace = %naming.namespace,
            methods = service.methods.len(),
            mode = %self.mode,
            "emitting stubs"
        );

        self.fragments.push(Fragment::ClientDecl(ClientDecl {
            service: naming.service.clone(),
            instance: naming.instance.clone(),
        }));

        for (method, request, response) in &requests {
            self.fragments.push(Fragment::ClientMethod(ClientMethod {
                instance: naming.instance.clone(),
                service: naming.service.clone(),
                method: method.clone(),
                namespace: naming.namespace.clone(),
                request: request.clone(),
                response: response.clone(),
            }));
        }

        self.fragments.push(Fragment::ServerInterface(ServerInterface {
            name: naming.server_interface(),
            service: naming.service.clone(),
            methods: requests
                .iter()
                .map(|(method, request, response)| InterfaceMethod {
                    method: method.clone(),
                    request: request.clone(),
                    response: response.clone(),
                })
                .collect(),
        }));

        self.fragments.push(Fragment::DispatchWrapper(DispatchWrapper {
            name: naming.dispatch_wrapper(),
            service: naming.service.clone(),
            interface: naming.server_interface(),
        }));

        self.fragments.push(Fragment::Registration(Registration {
            function: naming.register_fn(),
            service: naming.service.clone(),
            namespace: naming.namespace.clone(),
            wrapper: naming.dispatch_wrapper(),
            interface: naming.server_interface(),
            style: self.options.registry,
        }));

        self.fragments.push(Fragment::Multiplexer(mux));

        for (method, request, _) in requests {
            self.fragments.push(Fragment::DispatchHandler(DispatchHandler {
                wrapper: naming.dispatch_wrapper(),
                method,
                request,
            }));
        }

        Ok(())
    }

    /// `None` when no service emitted anything.
    pub fn finish(self) -> Option<StubFile> {
        let runtime = self.runtime?;
        Some(StubFile {
            imports: self.imports,
            runtime,
            fragments: self.fragments,
        })
    }

    /// Register the runtime packages. Repeated calls keep the same
    /// qualifiers without adding imports.
    fn require_runtime(&mut self) {
        let transport_name = base_name(&self.options.transport_path).to_string();
        let codec_name = base_name(&self.options.codec_path).to_string();

        let runtime = Runtime {
            errors: self.imports.require("errors", "errors"),
            transport: self
                .imports
                .require(&self.options.transport_path, &transport_name),
            codec: self.imports.require(&self.options.codec_path, &codec_name),
            context: self
                .mode
                .is_context_aware()
                .then(|| self.imports.require("context", "context")),
        };
        self.runtime = Some(runtime);
    }

    /// Build the route table, rejecting names that would make the generated
    /// switch or method set invalid.
    fn multiplexer(
        &self,
        service: &ServiceDescriptor,
        naming: &NamingBundle,
    ) -> Result<Multiplexer> {
        let mut mux = Multiplexer {
            wrapper: naming.dispatch_wrapper(),
            service: naming.service.clone(),
            routes: Vec::with_capacity(service.methods.len()),
        };

        for method in &service.methods {
            if method.name == MULTIPLEXER_METHOD {
                return Err(Error::ReservedMethod {
                    service: service.name.clone(),
                    method: method.name.clone(),
                });
            }
            if mux.route(&method.name).is_some() {
                return Err(Error::DuplicateMethod {
                    service: service.name.clone(),
                    method: method.name.clone(),
                });
            }
            mux.routes.push(method.name.clone());
        }

        Ok(mux)
    }
}
