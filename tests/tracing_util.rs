use tracing_subscriber::EnvFilter;

/// Installs a default subscriber for the duration of one test.
///
/// Output goes through the test writer so it only shows up for failing
/// tests; the filter honors `RUST_LOG`.
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Self { _guard: guard }
    }
}
