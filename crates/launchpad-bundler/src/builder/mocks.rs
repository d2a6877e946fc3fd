//! Module aliasing for runtimes with and without node built-ins.

use indexmap::IndexMap;

/// Node.js built-in module ids.
pub const NODE_BUILTINS: &[&str] = &[
    "_http_agent",
    "_http_client",
    "_http_common",
    "_http_incoming",
    "_http_outgoing",
    "_http_server",
    "_stream_duplex",
    "_stream_passthrough",
    "_stream_readable",
    "_stream_transform",
    "_stream_wrap",
    "_stream_writable",
    "_tls_common",
    "_tls_wrap",
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

pub(crate) const GENERIC_MOCK: &str = "~mocks/generic";

/// Userland packages that are unusable in a server bundle and replaced by
/// the generic mock on every target.
const SERVER_UNUSABLE: &[&str] = &[
    "consola",
    "encoding",
    "stream",
    "he",
    "resolve",
    "source-map",
    "lodash.template",
    "serialize-javascript",
    "@babel/parser",
    "@vue/compiler-core",
    "@vue/compiler-dom",
    "@vue/compiler-ssr",
];

/// Aliases applied on every target.
pub(crate) fn generic_aliases() -> IndexMap<String, String> {
    SERVER_UNUSABLE
        .iter()
        .map(|id| (id.to_string(), GENERIC_MOCK.to_string()))
        .collect()
}

/// Aliases redirecting built-ins and node-only packages to stand-ins.
///
/// Every built-in (bare and `node:`-prefixed) gets an entry; specific mocks
/// and browser polyfills override the generic one.
pub(crate) fn node_free_aliases() -> IndexMap<String, String> {
    let mut aliases = IndexMap::new();

    for id in NODE_BUILTINS {
        aliases.insert(id.to_string(), GENERIC_MOCK.to_string());
        aliases.insert(format!("node:{id}"), GENERIC_MOCK.to_string());
    }

    let specific = [
        ("http", "~mocks/node/http"),
        ("fs", "~mocks/node/fs"),
        ("process", "~mocks/node/process"),
        ("node-process", "process/browser.js"),
        ("util", "util/util.js"),
        ("events", "events/events.js"),
        ("inherits", "inherits/inherits_browser.js"),
        // custom
        ("node-fetch", "~mocks/custom/node-fetch"),
        ("depd", "~mocks/custom/depd"),
        ("etag", "~mocks/generic/noop"),
        // express
        ("serve-static", GENERIC_MOCK),
        ("iconv-lite", GENERIC_MOCK),
        // mime
        ("mime-db", "~mocks/custom/mime-db"),
        ("mime/lite", "mime/lite.js"),
        ("mime", "~mocks/custom/mime"),
    ];
    for (id, target) in specific {
        aliases.insert(id.to_string(), target.to_string());
        if NODE_BUILTINS.contains(&id) {
            aliases.insert(format!("node:{id}"), target.to_string());
        }
    }

    aliases
}

/// Global identifiers provided by injected modules on node-free targets.
pub(crate) fn node_free_injects() -> IndexMap<String, String> {
    IndexMap::from([("process".to_string(), "~mocks/node/process".to_string())])
}

/// Built-ins left for the node runtime to provide.
pub(crate) fn node_externals() -> Vec<String> {
    NODE_BUILTINS
        .iter()
        .flat_map(|id| [id.to_string(), format!("node:{id}")])
        .collect()
}
