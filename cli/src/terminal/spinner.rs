use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use scoper_core::database::Fetcher;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub fn start(msg: &str) -> ProgressBar {
    let pb: ProgressBar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(TICKS));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Shows a spinner for as long as the wrapped download runs.
pub struct SpinnerFetcher<F> {
    inner: F,
    visible: bool,
}

impl<F: Fetcher> SpinnerFetcher<F> {
    pub fn new(inner: F, visible: bool) -> Self {
        Self { inner, visible }
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for SpinnerFetcher<F> {
    async fn fetch(&self) -> anyhow::Result<Vec<u8>> {
        if !self.visible {
            return self.inner.fetch().await;
        }

        let pb: ProgressBar = start("Downloading the scope database...");
        let body = self.inner.fetch().await;
        pb.finish_and_clear();
        body
    }
}
