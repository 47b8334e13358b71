

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the stderr subscriber used by binaries embedding the deleter.
///
/// `RUST_LOG` is honoured; `default_directive` (e.g. `"table_truncate=info"`) is
/// layered on top. Calling this twice returns an error instead of panicking.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .try_init()?;

    Ok(())
}
