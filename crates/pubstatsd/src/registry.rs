//! Static registry of aggregation dimensions.
//!
//! Each wire operation that returns facet counts is declared exactly once in
//! the `dimension_registry!` invocation at the bottom of this module. The
//! macro emits both the lookup table used by the router and the typed entry
//! points on [`Dispatcher`], so the two can never drift apart. Adding a
//! dimension is a one-line change here; error mapping and result shaping live
//! in [`Dispatcher::forward`] and are shared by every entry.

use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

use pubstats_types::{Aggregation, Filter, RpcError};

use crate::dispatch::Dispatcher;
use crate::engine::StatsEngine;

/// Entity type aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Scope {
    /// Journals (serial titles).
    Journal,
    /// Articles published in those journals.
    Article,
}

/// Attribute whose distinct values are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Facet {
    /// Subject areas assigned to the record.
    SubjectAreas,
    /// Collection (national site) holding the record.
    Collection,
    /// Editorial status of a journal.
    Status,
    /// Year a journal entered the collection.
    IncludedAtYear,
    /// Year an article was published.
    PublicationYear,
    /// Languages an article is available in.
    Languages,
    /// Countries of the authors' affiliations.
    AffCountries,
    /// Article type (research article, review, ...).
    DocumentType,
}

/// A (scope, facet) pair identifying one countable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    /// Entity aggregated over.
    pub scope: Scope,
    /// Attribute counted.
    pub facet: Facet,
}

impl Dimension {
    /// Pairs a scope with a facet.
    #[must_use]
    pub const fn new(scope: Scope, facet: Facet) -> Self {
        Self { scope, facet }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}", self.scope, self.facet)
    }
}

/// Binds a wire operation name to the dimension it aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Method name clients send.
    pub operation: &'static str,
    /// Dimension forwarded to the engine.
    pub dimension: Dimension,
}

/// Resolves an operation name to its dimension.
#[must_use]
pub fn lookup(operation: &str) -> Option<Dimension> {
    DIMENSIONS
        .iter()
        .find(|registration| registration.operation == operation)
        .map(|registration| registration.dimension)
}

macro_rules! dimension_registry {
    ($($(#[$doc:meta])* $operation:ident => ($scope:ident, $facet:ident);)+) => {
        /// Every aggregation operation exposed over the wire, in declaration order.
        pub const DIMENSIONS: &[Registration] = &[
            $(Registration {
                operation: stringify!($operation),
                dimension: Dimension::new(Scope::$scope, Facet::$facet),
            },)+
        ];

        impl<E: StatsEngine> Dispatcher<E> {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Returns [`RpcError::ValidationError`] when the engine rejects the
                /// filters and [`RpcError::BackendError`] when it fails to run.
                pub fn $operation(
                    &self,
                    filters: Option<&Filter>,
                ) -> Result<Vec<Aggregation>, RpcError> {
                    self.forward(Dimension::new(Scope::$scope, Facet::$facet), filters)
                }
            )+
        }
    };
}

dimension_registry! {
    /// Journal counts per subject area.
    journal_subject_areas => (Journal, SubjectAreas);
    /// Journal counts per collection.
    journal_collections => (Journal, Collection);
    /// Journal counts per editorial status.
    journal_statuses => (Journal, Status);
    /// Journal counts per year of inclusion.
    journal_inclusion_years => (Journal, IncludedAtYear);
    /// Article counts per subject area.
    document_subject_areas => (Article, SubjectAreas);
    /// Article counts per collection.
    document_collections => (Article, Collection);
    /// Article counts per publication year.
    document_publication_years => (Article, PublicationYear);
    /// Article counts per language.
    document_languages => (Article, Languages);
    /// Article counts per affiliation country.
    document_affiliation_countries => (Article, AffCountries);
    /// Article counts per document type.
    document_types => (Article, DocumentType);
}
