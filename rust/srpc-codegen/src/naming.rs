//! Identifier derivation for generated stubs.
//!
//! Everything here is a pure function of descriptor names and file paths, so
//! the same service always yields the same bundle regardless of the mode it is
//! generated in.

/// Suffix stripped from proto paths when deriving a namespace token.
pub const PROTO_SUFFIX: &str = ".proto";

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Identifiers derived for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingBundle {
    /// Public Go name of the service, also the client singleton variable.
    pub service: String,
    /// Unexported client struct name.
    pub instance: String,
    /// Routing namespace passed to the transport and the registry.
    pub namespace: String,
}

impl NamingBundle {
    /// `reserved` lists package qualifiers the output file imports; an
    /// instance name equal to one of them gets a trailing underscore.
    pub fn new(service: &str, proto_path: &str, reserved: &[&str]) -> Self {
        let mut instance = instance_name(service);
        if is_go_keyword(&instance) || reserved.contains(&instance.as_str()) {
            instance.push('_');
        }
        Self {
            service: service.to_string(),
            instance,
            namespace: namespace_token(proto_path),
        }
    }

    pub fn server_interface(&self) -> String {
        format!("{}Server", self.service)
    }

    pub fn dispatch_wrapper(&self) -> String {
        format!("{}Service", self.service)
    }

    pub fn register_fn(&self) -> String {
        format!("Reg{}Server", self.service)
    }
}

/// Lowercase the first character and keep the rest.
pub fn instance_name(service: &str) -> String {
    let mut chars = service.chars();
    match chars.next() {
        Some(first) => {
            let mut name = String::with_capacity(service.len());
            name.push(first.to_ascii_lowercase());
            name.push_str(chars.as_str());
            name
        }
        None => String::new(),
    }
}

/// Namespace token for a proto path.
///
/// `.proto` is stripped, then everything up to and including the *first* `/`
/// is dropped when a `/` occurs past the first byte. `a/b/c.proto` therefore
/// yields `b/c`. Paths without the suffix are returned unchanged.
pub fn namespace_token(proto_path: &str) -> String {
    let Some(stem) = proto_path.strip_suffix(PROTO_SUFFIX) else {
        return proto_path.to_string();
    };
    match (stem.find('/'), stem.rfind('/')) {
        (Some(first), Some(last)) if last > 0 => stem[first + 1..].to_string(),
        _ => stem.to_string(),
    }
}

/// Convert a proto identifier to the Go name protoc-gen-go gives it.
///
/// `.` before a lowercase letter is dropped and otherwise becomes `_`; a
/// leading `_` becomes `X`; `_` before a lowercase letter is dropped; a
/// lowercase run is capitalized at its start.
pub fn go_camel_case(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len() + 1);
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let next_is_lower = bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase);
        match c {
            b'.' if next_is_lower => {}
            b'.' => out.push('_'),
            b'_' if i == 0 || bytes[i - 1] == b'.' => out.push('X'),
            b'_' if next_is_lower => {}
            c if c.is_ascii_digit() => out.push(c as char),
            c => {
                out.push(c.to_ascii_uppercase() as char);
                while bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase) {
                    i += 1;
                    out.push(bytes[i] as char);
                }
            }
        }
        i += 1;
    }
    out
}

/// Make `name` usable as a Go package name: invalid characters become `_`,
/// and a leading digit or a keyword gets a `_` prefix.
pub fn go_sanitized(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty()
        || out.starts_with(|c: char| c.is_ascii_digit())
        || is_go_keyword(&out)
    {
        out.insert(0, '_');
    }
    out
}

pub fn is_go_keyword(name: &str) -> bool {
    GO_KEYWORDS.contains(&name)
}

/// Last `/`-separated segment of an import path.
pub fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_lowercases_only_the_first_letter() {
        assert_eq!(instance_name("Echo"), "echo");
        assert_eq!(instance_name("UserHTTPService"), "userHTTPService");
        assert_eq!(instance_name("already"), "already");
    }

    #[test]
    fn namespace_strips_suffix() {
        assert_eq!(namespace_token("echo.proto"), "echo");
        assert_eq!(namespace_token("echo/echo.proto"), "echo");
    }

    // Keeps everything after the first separator, not the last one.
    #[test]
    fn namespace_keeps_after_first_separator() {
        assert_eq!(namespace_token("a/b/c.proto"), "b/c");
        assert_eq!(namespace_token("pkg/echo/echo.proto"), "echo/echo");
    }

    #[test]
    fn namespace_without_suffix_is_unchanged() {
        assert_eq!(namespace_token("pkg/echo/echo.txt"), "pkg/echo/echo.txt");
        assert_eq!(namespace_token("echo"), "echo");
    }

    #[test]
    fn namespace_leading_separator_only() {
        assert_eq!(namespace_token("/echo.proto"), "/echo");
    }

    #[test]
    fn bundle_is_deterministic() {
        let a = NamingBundle::new("Echo", "echo/echo.proto", &[]);
        let b = NamingBundle::new("Echo", "echo/echo.proto", &[]);
        assert_eq!(a, b);
        assert_eq!(a.service, "Echo");
        assert_eq!(a.instance, "echo");
        assert_eq!(a.namespace, "echo");
        assert_eq!(a.server_interface(), "EchoServer");
        assert_eq!(a.dispatch_wrapper(), "EchoService");
        assert_eq!(a.register_fn(), "RegEchoServer");
    }

    #[test]
    fn bundle_escapes_keywords_and_imports() {
        assert_eq!(NamingBundle::new("Type", "t.proto", &[]).instance, "type_");
        assert_eq!(
            NamingBundle::new("Errors", "e.proto", &["errors", "srpc"]).instance,
            "errors_"
        );
    }

    #[test]
    fn camel_case_matches_protoc_gen_go() {
        assert_eq!(go_camel_case("echo_request"), "EchoRequest");
        assert_eq!(go_camel_case("EchoRequest"), "EchoRequest");
        assert_eq!(go_camel_case("say_hello"), "SayHello");
        assert_eq!(go_camel_case("_private"), "XPrivate");
        assert_eq!(go_camel_case("v2_api"), "V2Api");
        assert_eq!(go_camel_case("HTTPGet"), "HTTPGet");
        assert_eq!(go_camel_case("foo_Bar"), "Foo_Bar");
        assert_eq!(go_camel_case("a.b"), "AB");
        assert_eq!(go_camel_case("A.B"), "A_B");
    }

    #[test]
    fn sanitized_package_names() {
        assert_eq!(go_sanitized("echo"), "echo");
        assert_eq!(go_sanitized("echo-v1"), "echo_v1");
        assert_eq!(go_sanitized("1api"), "_1api");
        assert_eq!(go_sanitized("func"), "_func");
    }

    #[test]
    fn base_name_of_import_path() {
        assert_eq!(base_name("meta/pkg/srpc/pb"), "pb");
        assert_eq!(base_name("errors"), "errors");
    }
}
