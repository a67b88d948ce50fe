//! Module filter contract
//!
//! Filters transform the module a request is dispatched to, either before
//! (`Pre`) or after (`Post`) it runs. Running the pipeline is the caller's
//! job; this module defines the contract and a simple ordered chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// When a filter runs relative to the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Pre,
    Post,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Pre => "pre",
            FilterType::Post => "post",
        }
    }
}

impl FromStr for FilterType {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`FilterType::Pre`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("post") {
            FilterType::Post
        } else {
            FilterType::Pre
        })
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transformation applied to module `M`
pub trait Filter<M>: Send + Sync {
    fn execute(&self, module: M) -> M;
}

impl<M, F> Filter<M> for F
where
    F: Fn(M) -> M + Send + Sync,
{
    fn execute(&self, module: M) -> M {
        self(module)
    }
}

/// Filters of one type, applied in insertion order
pub struct FilterChain<M> {
    filter_type: FilterType,
    filters: Vec<Arc<dyn Filter<M>>>,
}

impl<M> FilterChain<M> {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            filter_type,
            filters: Vec::new(),
        }
    }

    pub fn with<F>(mut self, filter: F) -> Self
    where
        F: Filter<M> + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Pass `module` through every filter in order
    pub fn apply(&self, module: M) -> M {
        self.filters
            .iter()
            .fold(module, |module, filter| filter.execute(module))
    }
}

impl<M> Clone for FilterChain<M> {
    fn clone(&self) -> Self {
        Self {
            filter_type: self.filter_type,
            filters: self.filters.clone(),
        }
    }
}

impl<M> fmt::Debug for FilterChain<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filter_type", &self.filter_type)
            .field("filters", &self.filters.len())
            .finish()
    }
}
