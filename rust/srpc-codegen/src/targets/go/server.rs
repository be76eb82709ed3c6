//! Server side: the handler interface, the dispatch wrapper, registration and
//! the per-method routing.

use std::fmt;

use crate::code_writer::CodeWriter;
use crate::gw_writeln;
use crate::options::RegistryStyle;

use super::ir::{
    DispatchHandler, DispatchWrapper, Multiplexer, Registration, Runtime, ServerInterface,
};

/// Error text returned by `Do` for an unknown method name.
pub const NOT_FOUND_ERROR: &str = "function is not found";

/// `ctx context.Context, ` in context-aware files, empty otherwise.
fn ctx_param(runtime: &Runtime) -> String {
    runtime
        .context
        .as_ref()
        .map(|context| format!("ctx {context}.Context, "))
        .unwrap_or_default()
}

fn ctx_arg(runtime: &Runtime) -> &'static str {
    if runtime.context.is_some() { "ctx, " } else { "" }
}

pub fn render_server_interface<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    interface: &ServerInterface,
    runtime: &Runtime,
) -> fmt::Result {
    let ctx_type = runtime
        .context
        .as_ref()
        .map(|context| format!("{context}.Context, "))
        .unwrap_or_default();

    w.comment(&format!(
        "{} is the server API for the {} service.",
        interface.name, interface.service
    ))?;
    w.block(&format!("type {} interface", interface.name), |w| {
        for method in &interface.methods {
            gw_writeln!(
                w,
                "{}({ctx_type}*{}) (*{}, error)",
                method.method,
                method.request,
                method.response
            )?;
        }
        Ok(())
    })
}

pub fn render_dispatch_wrapper<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    wrapper: &DispatchWrapper,
) -> fmt::Result {
    w.comment(&format!(
        "{} routes {} calls to handle.",
        wrapper.name, wrapper.service
    ))?;
    w.block(&format!("type {} struct", wrapper.name), |w| {
        gw_writeln!(w, "handle {}", wrapper.interface)
    })
}

pub fn render_registration<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    registration: &Registration,
    runtime: &Runtime,
) -> fmt::Result {
    let pb = &runtime.codec;
    let Registration {
        function,
        service,
        namespace,
        wrapper,
        interface,
        style,
    } = registration;

    match style {
        RegistryStyle::Explicit => {
            w.comment(&format!(
                "{function} registers handle with registry as {namespace:?}/{service:?}."
            ))?;
            w.block(
                &format!("func {function}(registry {pb}.ServiceRegistry, handle {interface})"),
                |w| {
                    gw_writeln!(
                        w,
                        "registry.Register({namespace:?}, {service:?}, &{wrapper}{{handle: handle}})"
                    )
                },
            )
        }
        RegistryStyle::Global => {
            w.comment(&format!(
                "{function} registers handle with the process-wide dispatcher."
            ))?;
            w.block(&format!("func {function}(handle {interface})"), |w| {
                gw_writeln!(
                    w,
                    "{pb}.ServiceDispatchObject.AddService({namespace:?}, {service:?}, &{wrapper}{{handle: handle}})"
                )
            })
        }
    }
}

pub fn render_multiplexer<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    mux: &Multiplexer,
    runtime: &Runtime,
) -> fmt::Result {
    let ctx_param = ctx_param(runtime);
    let ctx_arg = ctx_arg(runtime);
    let errors = &runtime.errors;

    w.comment(&format!(
        "Do routes a call for function to its {} handler.",
        mux.service
    ))?;
    let header = format!(
        "func (s *{}) Do({ctx_param}function string, reqPBData []byte) (resPBData []byte, err error)",
        mux.wrapper
    );
    w.block(&header, |w| {
        w.block("switch function", |w| {
            for route in &mux.routes {
                w.case(&format!("case {route:?}:"), |w| {
                    gw_writeln!(w, "return s.{route}({ctx_arg}function, reqPBData)")
                })?;
            }
            w.case("default:", |w| {
                gw_writeln!(w, "err = {errors}.New({NOT_FOUND_ERROR:?})")
            })
        })?;
        w.writeln("return")
    })
}

pub fn render_dispatch_handler<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    handler: &DispatchHandler,
    runtime: &Runtime,
) -> fmt::Result {
    let ctx_param = ctx_param(runtime);
    let ctx_arg = ctx_arg(runtime);
    let pb = &runtime.codec;

    let header = format!(
        "func (s *{}) {}({ctx_param}function string, reqPBData []byte) (resPBData []byte, err error)",
        handler.wrapper, handler.method
    );
    w.block(&header, |w| {
        gw_writeln!(w, "req := new({})", handler.request)?;
        // TODO: surface request decode failures once the registry contract
        // defines an error for malformed payloads.
        gw_writeln!(w, "{pb}.Unmarshal(reqPBData, req)")?;
        gw_writeln!(w, "res, err := s.handle.{}({ctx_arg}req)", handler.method)?;
        w.block("if err == nil", |w| {
            gw_writeln!(w, "resPBData, err = {pb}.Marshal(res)")
        })?;
        w.writeln("return")
    })
}
