//! Client side: the per-service instance and one calling method per RPC.

use std::fmt;

use crate::code_writer::CodeWriter;
use crate::gw_writeln;

use super::ir::{ClientDecl, ClientMethod, Runtime};

/// Error text returned when the request cannot be encoded.
pub const MARSHAL_ERROR: &str = "request marshal err";

pub fn render_client_decl<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    decl: &ClientDecl,
) -> fmt::Result {
    w.comment(&format!(
        "{} is the client for the {} service.",
        decl.service, decl.service
    ))?;
    gw_writeln!(w, "var {} = &{}{{}}", decl.service, decl.instance)?;
    w.blank_line()?;
    gw_writeln!(w, "type {} struct{{}}", decl.instance)
}

pub fn render_client_method<W: fmt::Write>(
    w: &mut CodeWriter<W>,
    method: &ClientMethod,
    runtime: &Runtime,
) -> fmt::Result {
    let srpc = &runtime.transport;
    let pb = &runtime.codec;
    let errors = &runtime.errors;

    let (ctx_param, ctx_arg) = match &runtime.context {
        Some(context) => (format!("ctx {context}.Context, "), "ctx, "),
        None => (String::new(), ""),
    };

    w.comment(&format!(
        "{} calls {}.{} on destination.",
        method.method, method.service, method.method
    ))?;
    let header = format!(
        "func (c *{instance}) {name}({ctx_param}destination {srpc}.Destination, request *{req}, opts ...{srpc}.Option) (response *{res}, err error)",
        instance = method.instance,
        name = method.method,
        req = method.request,
        res = method.response,
    );
    w.block(&header, |w| {
        gw_writeln!(w, "reqPBData, err := {pb}.Marshal(request)")?;
        w.block("if err != nil", |w| {
            gw_writeln!(w, "return nil, {errors}.New({MARSHAL_ERROR:?})")
        })?;
        gw_writeln!(
            w,
            "resPBData, err := {srpc}.Invoke({ctx_arg}destination, {:?}, {:?}, {:?}, reqPBData, opts...)",
            method.namespace,
            method.service,
            method.method
        )?;
        w.block("if err != nil", |w| w.writeln("return nil, err"))?;
        gw_writeln!(w, "response = new({})", method.response)?;
        gw_writeln!(w, "err = {pb}.Unmarshal(resPBData, response)")?;
        w.writeln("return")
    })
}
