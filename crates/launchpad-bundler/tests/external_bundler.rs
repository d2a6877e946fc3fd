//! The external-process bundler.

mod common;

use common::{project, resolve};
use launchpad_bundler::{Bundler, Error, ExternalBundler, build_bundle_config};
use launchpad_config::{BundleConfig, ContextInput};

#[tokio::test]
async fn writes_config_without_a_command() {
    let root = project();
    let ctx = resolve(root.path(), ContextInput::with_preset("node"));
    let config = build_bundle_config(&ctx).expect("config");
    let bundler = ExternalBundler::for_context(&ctx);

    let output = bundler.bundle(&config).await.expect("bundle");
    assert!(output.files.is_empty());

    let written: BundleConfig = serde_json::from_slice(
        &std::fs::read(bundler.config_path()).expect("config written"),
    )
    .expect("valid json");
    assert_eq!(written, config);
    assert_eq!(
        bundler.config_path(),
        root.path().join(".nuxt/launchpad/bundle.json")
    );
}

#[cfg(unix)]
#[tokio::test]
async fn command_receives_config_path() {
    let root = project();
    let ctx = resolve(root.path(), ContextInput::with_preset("node"));
    let config = build_bundle_config(&ctx).expect("config");
    let out = config.output.file.display().to_string();

    let script = format!(
        "mkdir -p \"$(dirname '{out}')\" && test -f \"$1\" && test \"$1\" = \"$LAUNCHPAD_BUNDLE_CONFIG\" && echo built > '{out}'"
    );
    let bundler =
        ExternalBundler::for_context(&ctx).with_command(["sh", "-c", script.as_str(), "bundle"]);

    let output = bundler.bundle(&config).await.expect("bundle");
    assert_eq!(output.files, vec![config.output.file.clone()]);
}

#[cfg(unix)]
#[tokio::test]
async fn failing_command_is_a_compilation_error() {
    let root = project();
    let ctx = resolve(root.path(), ContextInput::with_preset("node"));
    let config = build_bundle_config(&ctx).expect("config");
    let bundler = ExternalBundler::for_context(&ctx)
        .with_command(["sh", "-c", "echo 'SyntaxError: Unexpected token' >&2; exit 1", "bundle"]);

    let err = bundler.bundle(&config).await.unwrap_err();
    assert!(matches!(err, Error::Compilation(ref message) if message.contains("Unexpected token")));
    assert!(err.is_recoverable());
}
