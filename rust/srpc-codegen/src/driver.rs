//! Generation driver: decides which (file, mode) pairs produce output and
//! where each output lands.

use crate::descriptor::{DescriptorSet, FileDescriptor};
use crate::error::Result;
use crate::mode::GenerationMode;
use crate::naming::{PROTO_SUFFIX, base_name};
use crate::options::{GeneratorOptions, PathsMode};
use crate::targets::go;

/// One output file, named relative to the protoc output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn from_parameter(parameter: &str) -> Result<Self> {
        GeneratorOptions::parse(parameter).map(Self::new)
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate every requested mode for every file marked for generation.
    ///
    /// Output is ordered by file (request order), then by mode. The first
    /// error aborts the run.
    pub fn generate(&self, descriptors: &DescriptorSet) -> Result<Vec<GeneratedFile>> {
        if self.options.modes.is_empty() {
            tracing::debug!("no plugin selected, nothing to generate");
            return Ok(Vec::new());
        }
        if self.options.modes.len() > 1 {
            tracing::warn!(
                "generating synchronous and context-aware stubs together; \
                 they declare the same identifiers and cannot share a Go package"
            );
        }

        let mut generated = Vec::new();
        for file in descriptors.generated_files() {
            for &mode in &self.options.modes {
                if let Some(output) = self.generate_file(file, mode)? {
                    generated.push(output);
                }
            }
        }

        tracing::debug!(files = generated.len(), "generation finished");
        Ok(generated)
    }

    /// Generate one file in one mode. `None` when the file has no service
    /// with methods.
    pub fn generate_file(
        &self,
        file: &FileDescriptor,
        mode: GenerationMode,
    ) -> Result<Option<GeneratedFile>> {
        let Some(content) = go::generate(file, mode, &self.options)? else {
            tracing::trace!(file = %file.path, %mode, "no services with methods");
            return Ok(None);
        };

        let name = format!("{}{}", self.output_prefix(file), mode.file_suffix());
        tracing::debug!(file = %file.path, %mode, output = %name, "generated");
        Ok(Some(GeneratedFile { name, content }))
    }

    /// Output path without the mode suffix.
    fn output_prefix(&self, file: &FileDescriptor) -> String {
        let stem = file.path.strip_suffix(PROTO_SUFFIX).unwrap_or(&file.path);
        match self.options.paths {
            PathsMode::SourceRelative => stem.to_string(),
            PathsMode::Import if file.go_import_path == "." => base_name(stem).to_string(),
            PathsMode::Import => format!("{}/{}", file.go_import_path, base_name(stem)),
        }
    }
}
