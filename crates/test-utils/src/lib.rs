pub mod builders;
pub mod fake_orchestrator;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

pub use fake_orchestrator::{FakeOrchestrator, FakeResult, RecordingNotifier};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Output goes through `with_test_writer()`, so it only shows for failing
/// tests unless run with `-- --nocapture`. Set `RESWATCH_LOG` (e.g.
/// `reswatch=debug`) for more detail.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("RESWATCH_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn,reswatch=info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if `f` does not finish within five seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("test timed out after 5 seconds")
}

/// Let spawned tasks run until they block again.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
