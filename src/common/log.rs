use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, registry};
use tracing_tree::HierarchicalLayer;

/// Installs the global subscriber: `RUST_LOG` filtering (default `info`)
/// and an indented tree of spans on stderr. Only binaries call this.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let tree = HierarchicalLayer::new(2)
        .with_writer(std::io::stderr)
        .with_targets(true)
        .with_bracketed_fields(true);
    // A second init (e.g. in tests sharing a process) is harmless.
    let _ = registry().with(filter).with(tree).try_init();
}
