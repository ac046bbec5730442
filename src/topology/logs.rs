//! Forward container output to `tracing`.

use futures::future::{BoxFuture, FutureExt};
use testcontainers::core::logs::LogFrame;
use testcontainers::core::logs::consumer::LogConsumer;
use tracing::{info, warn};

/// Log consumer that emits one tracing event per line of container output.
#[derive(Debug, Clone)]
pub struct TracingLogConsumer {
    container: String,
}

impl TracingLogConsumer {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }
}

impl LogConsumer for TracingLogConsumer {
    fn accept<'a>(&'a self, record: &'a LogFrame) -> BoxFuture<'a, ()> {
        async move {
            let text = String::from_utf8_lossy(record.bytes());
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                match record {
                    LogFrame::StdOut(_) => {
                        info!(container = %self.container, stream = "stdout", "{}", line)
                    }
                    LogFrame::StdErr(_) => {
                        warn!(container = %self.container, stream = "stderr", "{}", line)
                    }
                }
            }
        }
        .boxed()
    }
}
