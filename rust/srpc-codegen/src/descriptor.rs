//! Read-only view of the files, services and methods protoc hands us, with Go
//! names and import paths already resolved.

use std::collections::{HashMap, HashSet};

use prost_types::compiler::CodeGeneratorRequest;
use prost_types::{DescriptorProto, FileDescriptorProto};

use crate::error::{Error, Result};
use crate::imports::GoIdent;
use crate::naming::{PROTO_SUFFIX, base_name, go_camel_case, go_sanitized};
use crate::options::GeneratorOptions;

/// One `.proto` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Path relative to the protoc include root, e.g. `echo/echo.proto`.
    pub path: String,
    pub proto_package: String,
    pub go_import_path: String,
    pub go_package_name: String,
    pub services: Vec<ServiceDescriptor>,
    /// Listed in `file_to_generate`; other files are dependencies only.
    pub generate: bool,
}

impl FileDescriptor {
    /// Services that produce stubs, i.e. those with at least one method.
    pub fn generated_services(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter().filter(|s| !s.methods.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Go name of the service.
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
    /// Path of the owning file.
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Go name of the method; also its dispatch key.
    pub name: String,
    pub input: GoIdent,
    pub output: GoIdent,
}

/// Every file of one request, in `proto_file` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSet {
    pub files: Vec<FileDescriptor>,
}

/// Go location of a file, computed before services are resolved.
struct GoLocation {
    import_path: String,
    package_name: String,
}

impl DescriptorSet {
    pub fn from_request(
        request: &CodeGeneratorRequest,
        options: &GeneratorOptions,
    ) -> Result<Self> {
        let to_generate: HashSet<&str> =
            request.file_to_generate.iter().map(String::as_str).collect();
        let supplied: HashSet<&str> = request.proto_file.iter().map(|f| f.name()).collect();
        if let Some(missing) = request
            .file_to_generate
            .iter()
            .find(|name| !supplied.contains(name.as_str()))
        {
            return Err(Error::MissingFile(missing.clone()));
        }

        let mut locations = Vec::with_capacity(request.proto_file.len());
        let mut messages = HashMap::new();
        for file in &request.proto_file {
            if file.name().is_empty() {
                return Err(Error::MissingName {
                    kind: "file",
                    parent: "the request".to_string(),
                });
            }
            let location = go_location(file, options);
            index_messages(file, &location, &mut messages)?;
            locations.push(location);
        }

        let mut files = Vec::with_capacity(request.proto_file.len());
        for (file, location) in request.proto_file.iter().zip(locations) {
            let services = file
                .service
                .iter()
                .map(|service| {
                    if service.name().is_empty() {
                        return Err(Error::MissingName {
                            kind: "service",
                            parent: file.name().to_string(),
                        });
                    }
                    let name = go_camel_case(service.name());
                    let methods = service
                        .method
                        .iter()
                        .map(|method| resolve_method(&name, method, &messages))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(ServiceDescriptor {
                        name,
                        methods,
                        file: file.name().to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            files.push(FileDescriptor {
                path: file.name().to_string(),
                proto_package: file.package().to_string(),
                go_import_path: location.import_path,
                go_package_name: location.package_name,
                services,
                generate: to_generate.contains(file.name()),
            });
        }

        Ok(Self { files })
    }

    /// Files marked for generation, in request order.
    pub fn generated_files(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.files.iter().filter(|f| f.generate)
    }
}

fn resolve_method(
    service: &str,
    method: &prost_types::MethodDescriptorProto,
    messages: &HashMap<String, GoIdent>,
) -> Result<MethodDescriptor> {
    if method.name().is_empty() {
        return Err(Error::MissingName {
            kind: "method",
            parent: service.to_string(),
        });
    }
    let name = go_camel_case(method.name());
    if method.client_streaming() || method.server_streaming() {
        tracing::warn!(
            service,
            method = %name,
            "srpc has no streaming calls; generating a unary stub"
        );
    }

    let lookup = |type_name: &str| {
        messages
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::UnresolvedType {
                method: format!("{service}.{name}"),
                type_name: type_name.to_string(),
            })
    };

    Ok(MethodDescriptor {
        input: lookup(method.input_type())?,
        output: lookup(method.output_type())?,
        name,
    })
}

/// Register every message of `file`, nested ones included, under its fully
/// qualified proto name (`.pkg.Outer.Inner`).
fn index_messages(
    file: &FileDescriptorProto,
    location: &GoLocation,
    messages: &mut HashMap<String, GoIdent>,
) -> Result<()> {
    fn visit(
        scope: &str,
        descriptors: &[DescriptorProto],
        file: &FileDescriptorProto,
        location: &GoLocation,
        messages: &mut HashMap<String, GoIdent>,
    ) -> Result<()> {
        for message in descriptors {
            if message.name().is_empty() {
                return Err(Error::MissingName {
                    kind: "message",
                    parent: file.name().to_string(),
                });
            }
            let relative = if scope.is_empty() {
                message.name().to_string()
            } else {
                format!("{scope}.{}", message.name())
            };
            let full = if file.package().is_empty() {
                format!(".{relative}")
            } else {
                format!(".{}.{relative}", file.package())
            };
            messages.insert(
                full,
                GoIdent::new(
                    go_camel_case(&relative),
                    location.import_path.clone(),
                    location.package_name.clone(),
                ),
            );
            visit(&relative, &message.nested_type, file, location, messages)?;
        }
        Ok(())
    }

    visit("", &file.message_type, file, location, messages)
}

/// Import path and package name, following protoc-gen-go's precedence:
/// `M` mapping, then `go_package`, then the file's directory.
fn go_location(file: &FileDescriptorProto, options: &GeneratorOptions) -> GoLocation {
    let go_package = file
        .options
        .as_ref()
        .map(|o| o.go_package())
        .unwrap_or_default();
    let (declared_path, declared_name) = match go_package.split_once(';') {
        Some((path, name)) => (path, Some(name)),
        None => (go_package, None),
    };

    let import_path = match options.go_import_map.get(file.name()) {
        Some(mapped) => Some(mapped.clone()),
        None if !declared_path.is_empty() => Some(declared_path.to_string()),
        None => None,
    };

    let package_name = match (declared_name, &import_path) {
        (Some(name), _) if !name.is_empty() => go_sanitized(name),
        (_, Some(path)) => go_sanitized(base_name(path)),
        (_, None) if !file.package().is_empty() => go_sanitized(&file.package().replace('.', "_")),
        (_, None) => {
            let stem = file.name().strip_suffix(PROTO_SUFFIX).unwrap_or(file.name());
            go_sanitized(base_name(stem))
        }
    };

    let import_path = import_path.unwrap_or_else(|| match file.name().rfind('/') {
        Some(idx) => file.name()[..idx].to_string(),
        None => ".".to_string(),
    });

    GoLocation {
        import_path,
        package_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{FileOptions, MethodDescriptorProto, ServiceDescriptorProto};

    fn message(name: &str, nested: Vec<DescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            nested_type: nested,
            ..Default::default()
        }
    }

    fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
        MethodDescriptorProto {
            name: Some(name.to_string()),
            input_type: Some(input.to_string()),
            output_type: Some(output.to_string()),
            ..Default::default()
        }
    }

    fn echo_file() -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("echo/echo.proto".to_string()),
            package: Some("echo".to_string()),
            message_type: vec![
                message("EchoRequest", vec![]),
                message("EchoResponse", vec![message("Meta", vec![])]),
            ],
            service: vec![ServiceDescriptorProto {
                name: Some("Echo".to_string()),
                method: vec![
                    method("Say", ".echo.EchoRequest", ".echo.EchoResponse"),
                    method("say_meta", ".echo.EchoRequest", ".echo.EchoResponse.Meta"),
                ],
                ..Default::default()
            }],
            options: Some(FileOptions {
                go_package: Some("example.com/echo;echo".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn request(files: Vec<FileDescriptorProto>, generate: &[&str]) -> CodeGeneratorRequest {
        CodeGeneratorRequest {
            file_to_generate: generate.iter().map(|s| s.to_string()).collect(),
            proto_file: files,
            ..Default::default()
        }
    }

    #[test]
    fn resolves_services_and_messages() {
        let set = DescriptorSet::from_request(
            &request(vec![echo_file()], &["echo/echo.proto"]),
            &GeneratorOptions::default(),
        )
        .unwrap();

        let file = &set.files[0];
        assert!(file.generate);
        assert_eq!(file.go_import_path, "example.com/echo");
        assert_eq!(file.go_package_name, "echo");

        let service = &file.services[0];
        assert_eq!(service.name, "Echo");
        assert_eq!(service.file, "echo/echo.proto");
        assert_eq!(service.methods[0].name, "Say");
        assert_eq!(service.methods[0].input.name, "EchoRequest");
        assert_eq!(service.methods[1].name, "SayMeta");
        assert_eq!(service.methods[1].output.name, "EchoResponse_Meta");
        assert_eq!(service.methods[1].output.import_path, "example.com/echo");
    }

    #[test]
    fn dependency_files_are_not_generated() {
        let dependency = FileDescriptorProto {
            name: Some("common/types.proto".to_string()),
            package: Some("common.types".to_string()),
            message_type: vec![message("Empty", vec![])],
            ..Default::default()
        };
        let set = DescriptorSet::from_request(
            &request(vec![dependency, echo_file()], &["echo/echo.proto"]),
            &GeneratorOptions::default(),
        )
        .unwrap();

        let generated: Vec<_> = set.generated_files().map(|f| f.path.as_str()).collect();
        assert_eq!(generated, ["echo/echo.proto"]);
        assert_eq!(set.files[0].go_import_path, "common");
        assert_eq!(set.files[0].go_package_name, "common_types");
    }

    #[test]
    fn import_map_overrides_go_package() {
        let mut options = GeneratorOptions::default();
        options
            .go_import_map
            .insert("echo/echo.proto".to_string(), "github.com/acme/echopb".to_string());
        let set = DescriptorSet::from_request(&request(vec![echo_file()], &[]), &options).unwrap();

        assert_eq!(set.files[0].go_import_path, "github.com/acme/echopb");
        assert_eq!(set.files[0].go_package_name, "echo");
        assert_eq!(set.generated_files().count(), 0);
    }

    #[test]
    fn unknown_message_is_an_error() {
        let mut file = echo_file();
        file.service[0]
            .method
            .push(method("Lost", ".echo.Nowhere", ".echo.EchoResponse"));

        let err = DescriptorSet::from_request(
            &request(vec![file], &["echo/echo.proto"]),
            &GeneratorOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::UnresolvedType {
                method: "Echo.Lost".to_string(),
                type_name: ".echo.Nowhere".to_string(),
            }
        );
    }

    #[test]
    fn unnamed_method_is_an_error() {
        let mut file = echo_file();
        file.service[0].method.push(MethodDescriptorProto::default());

        let err = DescriptorSet::from_request(
            &request(vec![file], &["echo/echo.proto"]),
            &GeneratorOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingName { kind: "method", .. }));
    }

    #[test]
    fn missing_generate_target_is_an_error() {
        let err = DescriptorSet::from_request(
            &request(vec![echo_file()], &["other.proto"]),
            &GeneratorOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, Error::MissingFile("other.proto".to_string()));
    }

    #[test]
    fn package_name_falls_back_to_file_stem() {
        let file = FileDescriptorProto {
            name: Some("ping.proto".to_string()),
            ..Default::default()
        };
        let set =
            DescriptorSet::from_request(&request(vec![file], &[]), &GeneratorOptions::default())
                .unwrap();
        assert_eq!(set.files[0].go_import_path, ".");
        assert_eq!(set.files[0].go_package_name, "ping");
    }
}
