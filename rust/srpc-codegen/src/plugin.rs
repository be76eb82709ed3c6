//! protoc plugin protocol: one `CodeGeneratorRequest` in, one
//! `CodeGeneratorResponse` out.

use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::descriptor::DescriptorSet;
use crate::driver::{GeneratedFile, Generator};
use crate::error::Result;

/// Answer a request. Failures are reported in the response's `error` field
/// with no files, which makes protoc abort without writing anything.
pub fn respond(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    let supported_features = Some(Feature::Proto3Optional as u64);

    match generate(request) {
        Ok(files) => CodeGeneratorResponse {
            supported_features,
            file: files
                .into_iter()
                .map(|generated| File {
                    name: Some(generated.name),
                    content: Some(generated.content),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        },
        Err(error) => {
            tracing::debug!(%error, "generation failed");
            CodeGeneratorResponse {
                error: Some(error.to_string()),
                supported_features,
                ..Default::default()
            }
        }
    }
}

/// Parse options before touching descriptors, so a bad parameter fails
/// regardless of the input files.
pub fn generate(request: &CodeGeneratorRequest) -> Result<Vec<GeneratedFile>> {
    let generator = Generator::from_parameter(request.parameter())?;
    tracing::debug!(
        parameter = request.parameter(),
        files = request.file_to_generate.len(),
        modes = generator.options().modes.len(),
        "received request"
    );

    let descriptors = DescriptorSet::from_request(request, generator.options())?;
    generator.generate(&descriptors)
}
