use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

const DEFAULT_FILTER: &str = "pip_on_top=info";
const VERBOSE_FILTER: &str = "pip_on_top=debug";

/// Installs the global subscriber, logging to stderr. `RUST_LOG` wins over `verbose` when set.
/// Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true),
        )
        .try_init();
}
