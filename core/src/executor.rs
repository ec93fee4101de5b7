//! The executor contract consumed by callers.
//!
//! # Design
//! Callers pass a `RequestDescriptor`, the status code they consider a
//! success for this endpoint, and for result-bearing calls a witness of the
//! expected shape. Implementations decide how the call is made (pooling,
//! circuit breaking, URL resolution from the service marker) but must report
//! every outcome through `RestError` exactly once per call.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

use serde::de::DeserializeOwned;

use crate::error::RestError;
use crate::object_type::ObjectType;
use crate::request::RequestDescriptor;

/// Runtime shape of a collection result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Deque,
    Set,
    SortedSet,
}

/// Collection types an executor can fill with deserialized elements.
pub trait ResultCollection<E>: FromIterator<E> {
    const KIND: CollectionKind;
}

impl<E> ResultCollection<E> for Vec<E> {
    const KIND: CollectionKind = CollectionKind::List;
}

impl<E> ResultCollection<E> for VecDeque<E> {
    const KIND: CollectionKind = CollectionKind::Deque;
}

impl<E: Eq + Hash> ResultCollection<E> for HashSet<E> {
    const KIND: CollectionKind = CollectionKind::Set;
}

impl<E: Ord> ResultCollection<E> for BTreeSet<E> {
    const KIND: CollectionKind = CollectionKind::SortedSet;
}

/// Executes REST calls described by `RequestDescriptor`s.
///
/// Implementations are shared between callers and must tolerate concurrent
/// invocations.
pub trait RequestExecutor: Send + Sync {
    /// Run a call that returns no result.
    fn execute_no_result(
        &self,
        request: &RequestDescriptor,
        success_status: u16,
    ) -> Result<(), RestError>;

    /// Run a call that returns exactly one object of the shape described by
    /// `object_type`. A successful call without a body is a failure.
    fn execute_single_result<T>(
        &self,
        request: &RequestDescriptor,
        success_status: u16,
        object_type: &ObjectType,
    ) -> Result<T, RestError>
    where
        T: DeserializeOwned + 'static;

    /// Run a call that returns a collection `C` whose elements have the shape
    /// described by `element_type`.
    fn execute_collection_result<C, E>(
        &self,
        request: &RequestDescriptor,
        success_status: u16,
        element_type: &ObjectType,
    ) -> Result<C, RestError>
    where
        C: ResultCollection<E>,
        E: DeserializeOwned + 'static;
}
