//! Noise filtering over ranked candidates.
//!
//! Boilerplate such as license headers and copyright notices tends to embed
//! close to many queries. [`CandidateFilter`] therefore looks past the first
//! `top_k` candidates, up to a fixed look-ahead window, skipping every record
//! whose text contains a denylisted marker.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::QueryConfig;
use crate::document::{Candidate, Hit, RecordId, UnresolvedHit};
use crate::resolver::RecordResolver;

/// A denylist of case-sensitive substrings that mark a text as boilerplate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoiseFilter {
    markers: Vec<String>,
}

impl NoiseFilter {
    /// Create a filter from a list of markers.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { markers: markers.into_iter().map(Into::into).collect() }
    }

    /// Return the first marker contained in `text`, if any.
    pub fn matching_marker(&self, text: &str) -> Option<&str> {
        self.markers.iter().map(String::as_str).find(|marker| text.contains(*marker))
    }

    /// Returns `true` if `text` contains any marker.
    pub fn is_noise(&self, text: &str) -> bool {
        self.matching_marker(text).is_some()
    }

    /// The configured markers.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

/// The result of filtering one ranked list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Accepted results in rank order, at most `top_k`.
    pub accepted: Vec<Hit>,
    /// Candidates inside the window whose records could not be resolved.
    pub unresolved: Vec<UnresolvedHit>,
    /// Number of candidates rejected as noise.
    pub rejected: usize,
    /// Number of candidates skipped because their id was already accepted.
    pub duplicates: usize,
    /// Number of candidates examined.
    pub examined: usize,
}

/// Scans ranked candidates up to a look-ahead window, rejecting noise.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    noise: NoiseFilter,
    lookahead: usize,
}

impl CandidateFilter {
    /// Create a filter that examines at most `lookahead` candidates per query.
    pub fn new(noise: NoiseFilter, lookahead: usize) -> Self {
        Self { noise, lookahead }
    }

    /// Create a filter from the query section of the configuration.
    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(NoiseFilter::new(config.noise_markers.iter().cloned()), config.lookahead)
    }

    /// The window used when `top_k` results are requested.
    ///
    /// Never smaller than `top_k`, so a large request is not cut short by the
    /// configured look-ahead.
    pub fn window(&self, top_k: usize) -> usize {
        self.lookahead.max(top_k)
    }

    /// The denylist in use.
    pub fn noise(&self) -> &NoiseFilter {
        &self.noise
    }

    /// Walk `ranked` in order, accepting up to `top_k` non-noise records.
    ///
    /// Stops when `top_k` records are accepted or the window is exhausted.
    /// Never pads the result with rejected candidates. Candidates whose
    /// identifier does not resolve are reported in
    /// [`FilterOutcome::unresolved`] and do not count toward `top_k`. A
    /// store holding the same id twice yields that record once.
    pub fn filter(
        &self,
        ranked: &[Candidate],
        top_k: usize,
        resolver: &dyn RecordResolver,
    ) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        let mut seen: HashSet<&RecordId> = HashSet::new();

        for (index, candidate) in ranked.iter().take(self.window(top_k)).enumerate() {
            if outcome.accepted.len() >= top_k {
                break;
            }
            outcome.examined += 1;
            let rank = index + 1;

            match resolver.resolve(&candidate.id) {
                Ok(_) if seen.contains(&candidate.id) => {
                    debug!(id = %candidate.id, rank, "skipped duplicate candidate");
                    outcome.duplicates += 1;
                }
                Ok(record) => {
                    if let Some(marker) = self.noise.matching_marker(&record.text) {
                        debug!(id = %candidate.id, rank, marker, "rejected noise candidate");
                        outcome.rejected += 1;
                    } else {
                        seen.insert(&candidate.id);
                        outcome.accepted.push(Hit {
                            record: record.clone(),
                            score: candidate.score,
                            rank,
                        });
                    }
                }
                Err(e) => {
                    warn!(id = %candidate.id, rank, error = %e, "candidate could not be resolved");
                    outcome.unresolved.push(UnresolvedHit {
                        id: candidate.id.clone(),
                        score: candidate.score,
                        rank,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected,
            duplicates = outcome.duplicates,
            unresolved = outcome.unresolved.len(),
            examined = outcome.examined,
            "filtered candidates"
        );
        outcome
    }
}
