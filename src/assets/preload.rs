use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::assets::decode::decode_image;
use crate::assets::image::ImageResource;
use crate::assets::source::ImageSource;
use crate::foundation::error::{DissolveError, DissolveResult};

/// Advisory progress report emitted after each image finishes loading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    /// Images loaded so far (including the one just completed).
    pub loaded: usize,
    /// Images in the batch.
    pub total: usize,
}

impl LoadProgress {
    /// `loaded / total`, in `[0, 1]`.
    pub fn fraction(self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.loaded as f64 / self.total as f64
    }
}

/// Batch image loader with all-or-nothing semantics.
///
/// There is no cache: every call fetches and decodes again. Callers that want memoization keep the
/// returned map around.
#[derive(Clone, Debug)]
pub struct Preloader<S> {
    source: S,
}

impl<S: ImageSource> Preloader<S> {
    /// Create a preloader reading from `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Borrow the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load every locator, returning a map keyed by the requested locator strings.
    ///
    /// Fails with [`DissolveError::LoadFailure`] naming the first locator that could not be
    /// fetched or decoded; nothing loaded so far is returned in that case.
    pub fn load<L>(&self, locators: &[L]) -> DissolveResult<HashMap<String, ImageResource>>
    where
        L: AsRef<str> + Sync,
    {
        self.load_with_progress(locators, |_| {})
    }

    /// Like [`Preloader::load`], reporting progress after each completed image.
    ///
    /// Reports are serialized, so `loaded` strictly increases from one call to the next.
    #[tracing::instrument(skip_all, fields(requested = locators.len()))]
    pub fn load_with_progress<L, F>(
        &self,
        locators: &[L],
        on_progress: F,
    ) -> DissolveResult<HashMap<String, ImageResource>>
    where
        L: AsRef<str> + Sync,
        F: Fn(LoadProgress) + Sync,
    {
        let mut seen = HashSet::with_capacity(locators.len());
        let unique: Vec<&str> = locators
            .iter()
            .map(AsRef::as_ref)
            .filter(|l| seen.insert(*l))
            .collect();
        let total = unique.len();
        if total == 0 {
            return Ok(HashMap::new());
        }

        let loaded = Mutex::new(0usize);
        let images = unique
            .par_iter()
            .map(|&locator| -> DissolveResult<(String, ImageResource)> {
                let img = self.load_one(locator)?;
                let mut n = loaded.lock().unwrap_or_else(PoisonError::into_inner);
                *n += 1;
                tracing::debug!(locator, loaded = *n, total, "image loaded");
                on_progress(LoadProgress { loaded: *n, total });
                Ok((locator.to_owned(), img))
            })
            .collect::<DissolveResult<Vec<_>>>()
            .inspect_err(|e| tracing::warn!(error = %e, "preload batch aborted"))?;

        tracing::debug!(loaded = images.len(), "preload batch complete");
        Ok(images.into_iter().collect())
    }

    fn load_one(&self, locator: &str) -> DissolveResult<ImageResource> {
        let bytes = self
            .source
            .fetch(locator)
            .map_err(|e| DissolveError::load_failure(locator, e))?;
        decode_image(locator, &bytes).map_err(|e| DissolveError::load_failure(locator, e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/preload.rs"]
mod tests;
