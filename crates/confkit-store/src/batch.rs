//! Concurrent loading of many configs

use std::future::Future;
use std::path::PathBuf;

use futures::future::join_all;
use tracing::warn;

use crate::{Error, Result};

/// Outcome of loading several configs at once.
///
/// Each path lands in exactly one of the three lists, in input order.
#[derive(Debug)]
pub struct BatchReport<H> {
    pub loaded: Vec<(PathBuf, H)>,
    /// Paths where no config file exists
    pub missing: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, Error)>,
}

impl<H> BatchReport<H> {
    /// Await every load; one failing doesn't stop the others.
    pub(crate) async fn collect<I, Fut>(loads: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, Fut)>,
        Fut: Future<Output = Result<Option<H>>>,
    {
        let (paths, futures): (Vec<_>, Vec<_>) = loads.into_iter().unzip();
        let results = join_all(futures).await;

        let mut report = Self {
            loaded: Vec::new(),
            missing: Vec::new(),
            failures: Vec::new(),
        };
        for (path, result) in paths.into_iter().zip(results) {
            match result {
                Ok(Some(handle)) => report.loaded.push((path, handle)),
                Ok(None) => report.missing.push(path),
                Err(error) => {
                    warn!(path = %path.display(), %error, "Config failed to load");
                    report.failures.push((path, error));
                }
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.loaded.len() + self.missing.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// One paragraph per failing path, `None` when nothing failed.
    pub fn summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let paragraphs: Vec<String> = self
            .failures
            .iter()
            .map(|(path, error)| format!("{}: {error}", path.display()))
            .collect();
        Some(paragraphs.join("\n\n"))
    }

    /// Loaded handles, or one [`Error::Batch`] naming every failure.
    pub fn into_result(self) -> Result<Vec<(PathBuf, H)>> {
        match self.summary() {
            None => Ok(self.loaded),
            Some(report) => Err(Error::Batch {
                failed: self.failures.len(),
                total: self.total(),
                report,
            }),
        }
    }
}
