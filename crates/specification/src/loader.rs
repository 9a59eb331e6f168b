//! Specification loader and cache.
//!
//! # Load Contract
//!
//! 1. A type is introspected at most once per entry lifetime, no matter how
//!    many threads request it.
//! 2. A thread that re-enters a type it is itself introspecting receives the
//!    in-progress specification instead of recursing.
//! 3. A thread requesting a type another thread is introspecting blocks until
//!    that introspection ends, unless blocking would close a wait cycle
//!    across threads; then it receives the in-progress specification.
//! 4. A failed introspection is cached and returned to every later request
//!    until the entry is evicted or the loader reset.
//! 5. A specification that finished while linked to a type that later fails
//!    within the same cycle is failed with it; it is never served as
//!    introspected.
//!
//! - Enforced in: [`SpecificationLoader::load_specification`], [`WaitGraph`]
//! - Tested by: `tests/integration/{cycles,concurrency,failures}.rs`
//! - Failure symptom: stack overflow on self-referential types, threads
//!   deadlocked on mutually-referential types, or duplicate specifications.
//!
//! Locking order is monitor, then entry progress. Every state transition
//! happens while holding the monitor so waiters never miss a wakeup.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ThreadId};

use metaspec_facets::TypeKey;
use parking_lot::{Condvar, Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::introspect::Introspector;
use crate::object::Phase;
use crate::{
	IntrospectionState, MetamodelConfig, MetamodelError, MetamodelResult, ObjectSpecification,
	ProgrammingModel, TypeCatalog,
};

/// Which thread waits for which specification.
#[derive(Debug, Default)]
struct WaitGraph {
	waiting: FxHashMap<ThreadId, Arc<ObjectSpecification>>,
	/// Introspections failed so far. A run that sees this change may have
	/// linked a type that has since failed.
	failures: usize,
}

impl WaitGraph {
	/// Whether `me` blocking on `target` would wait, transitively, on `me`.
	///
	/// Follows target owner -> the specification that owner waits for -> its owner,
	/// until the chain ends or returns to `me`.
	fn would_deadlock(&self, me: ThreadId, target: &ObjectSpecification) -> bool {
		let mut owner = target.phase.lock().owner();
		for _ in 0..=self.waiting.len() {
			let Some(thread) = owner else {
				return false;
			};
			if thread == me {
				return true;
			}
			let Some(awaited) = self.waiting.get(&thread) else {
				return false;
			};
			owner = awaited.phase.lock().owner();
		}
		false
	}
}

/// Publishes the outcome of an introspection and wakes every waiter.
///
/// Dropped without [`Self::succeed`] or [`Self::fail`] (introspection
/// unwound), the entry goes back to pending so a waiter can take it over.
struct Completion<'a> {
	loader: &'a SpecificationLoader,
	spec: &'a ObjectSpecification,
	/// `WaitGraph::failures` when the run started.
	failures_at_start: usize,
	done: bool,
}

impl Completion<'_> {
	/// Marks the specification introspected, unless a type it links to failed
	/// while it was being built. It then fails with that type.
	fn succeed(mut self) -> Result<(), Arc<MetamodelError>> {
		self.done = true;
		let mut graph = self.loader.monitor.lock();
		let inherited = if graph.failures == self.failures_at_start {
			None
		} else {
			self.loader.failed_dependency(self.spec)
		};
		match inherited {
			None => {
				*self.spec.phase.lock() = Phase::Done;
				self.loader.changed.notify_all();
				Ok(())
			}
			Some(failure) => {
				self.loader.record_failure(&mut graph, self.spec, &failure);
				Err(failure)
			}
		}
	}

	fn fail(mut self, failure: &Arc<MetamodelError>) {
		self.done = true;
		let mut graph = self.loader.monitor.lock();
		self.loader.record_failure(&mut graph, self.spec, failure);
	}
}

impl Drop for Completion<'_> {
	fn drop(&mut self) {
		if !self.done {
			let _graph = self.loader.monitor.lock();
			*self.spec.phase.lock() = Phase::Pending;
			self.loader.changed.notify_all();
		}
	}
}

/// Memoizes one [`ObjectSpecification`] per type.
///
/// Passed explicitly to whoever needs specifications; there is no global
/// instance.
pub struct SpecificationLoader {
	catalog: Arc<TypeCatalog>,
	model: ProgrammingModel,
	config: MetamodelConfig,
	arena: RwLock<FxHashMap<TypeKey, Arc<ObjectSpecification>>>,
	monitor: Mutex<WaitGraph>,
	changed: Condvar,
	introspections: AtomicUsize,
}

impl SpecificationLoader {
	pub fn new(catalog: Arc<TypeCatalog>, model: ProgrammingModel, config: MetamodelConfig) -> Self {
		Self {
			catalog,
			model,
			config,
			arena: RwLock::new(FxHashMap::default()),
			monitor: Mutex::new(WaitGraph::default()),
			changed: Condvar::new(),
			introspections: AtomicUsize::new(0),
		}
	}

	pub fn catalog(&self) -> &Arc<TypeCatalog> {
		&self.catalog
	}

	pub fn model(&self) -> &ProgrammingModel {
		&self.model
	}

	pub fn config(&self) -> &MetamodelConfig {
		&self.config
	}

	/// Returns the specification for `key`, introspecting it on first use.
	///
	/// Proxy types resolve to the type they stand for. The returned
	/// specification is `Introspected`, except on a cycle (see the module
	/// docs), where it may still be `Introspecting`.
	pub fn load_specification(&self, key: &TypeKey) -> MetamodelResult<Arc<ObjectSpecification>> {
		let descriptor = self.catalog.resolve(key)?;
		let key = &descriptor.key;
		if self.config.is_excluded(key) {
			return Err(MetamodelError::ExcludedType(key.clone()));
		}

		if let Some(spec) = self.arena.read().get(key)
			&& spec.is_introspected()
		{
			return Ok(Arc::clone(spec));
		}

		let spec = Arc::clone(
			self.arena
				.write()
				.entry(key.clone())
				.or_insert_with(|| Arc::new(ObjectSpecification::new(key.clone()))),
		);

		let me = thread::current().id();
		let mut graph = self.monitor.lock();
		let failures_at_start = loop {
			let mut phase = spec.phase.lock();
			match &*phase {
				Phase::Done => return Ok(Arc::clone(&spec)),
				Phase::Failed(source) => {
					return Err(MetamodelError::Introspection {
						ty: key.clone(),
						source: Arc::clone(source),
					});
				}
				Phase::Pending => {
					*phase = Phase::Running(me);
					break graph.failures;
				}
				Phase::Running(owner) if *owner == me => {
					tracing::trace!(ty = %key, "re-entered type under introspection");
					return Ok(Arc::clone(&spec));
				}
				Phase::Running(_) => {
					drop(phase);
					if graph.would_deadlock(me, &spec) {
						tracing::debug!(ty = %key, "cross-thread cycle, linking in-progress type");
						return Ok(spec);
					}
					tracing::debug!(ty = %key, "waiting for introspection on another thread");
					graph.waiting.insert(me, Arc::clone(&spec));
					self.changed.wait(&mut graph);
					graph.waiting.remove(&me);
				}
			}
		};
		drop(graph);

		self.introspections.fetch_add(1, Ordering::Relaxed);
		let completion = Completion {
			loader: self,
			spec: &spec,
			failures_at_start,
			done: false,
		};
		let outcome = match Introspector::new(self, &spec, &descriptor).run() {
			Ok(()) => completion.succeed(),
			Err(err) => {
				let source = Arc::new(err);
				completion.fail(&source);
				Err(source)
			}
		};
		match outcome {
			Ok(()) => Ok(spec),
			Err(source) => Err(MetamodelError::Introspection {
				ty: key.clone(),
				source,
			}),
		}
	}

	/// Failure of the first failed specification `spec` links to, wrapped as
	/// seen from `spec`.
	fn failed_dependency(&self, spec: &ObjectSpecification) -> Option<Arc<MetamodelError>> {
		let failed = spec.find_linked(|linked| linked.failure().is_some())?;
		let source = failed.failure()?;
		Some(Arc::new(MetamodelError::Introspection {
			ty: failed.key().clone(),
			source,
		}))
	}

	/// Caches `failure` on `spec` and fails every introspected specification
	/// that links to it. Those finished against `spec` while it was still in
	/// progress, so their links would expose it half-built.
	///
	/// Called with the monitor held.
	fn record_failure(
		&self,
		graph: &mut WaitGraph,
		spec: &ObjectSpecification,
		failure: &Arc<MetamodelError>,
	) {
		tracing::warn!(ty = %spec.key(), error = %failure, "introspection failed, caching failure");
		*spec.phase.lock() = Phase::Failed(Arc::clone(failure));
		graph.failures += 1;

		let inherited = Arc::new(MetamodelError::Introspection {
			ty: spec.key().clone(),
			source: Arc::clone(failure),
		});
		for dependent in self.arena.read().values() {
			if dependent.is_introspected()
				&& dependent
					.find_linked(|linked| std::ptr::eq(linked, spec))
					.is_some()
			{
				tracing::warn!(
					ty = %dependent.key(),
					failed = %spec.key(),
					"introspected type linked a failed type, failing it too"
				);
				*dependent.phase.lock() = Phase::Failed(Arc::clone(&inherited));
			}
		}
		self.changed.notify_all();
	}

	/// Introspected specification for `key`, without loading.
	pub fn lookup(&self, key: &TypeKey) -> Option<Arc<ObjectSpecification>> {
		self.arena
			.read()
			.get(key)
			.filter(|spec| spec.is_introspected())
			.cloned()
	}

	/// State of the entry for `key`; `None` when nothing was ever requested
	/// or the entry was evicted.
	pub fn state(&self, key: &TypeKey) -> Option<IntrospectionState> {
		self.arena.read().get(key).map(|spec| spec.state())
	}

	/// Every introspected specification, sorted by key.
	pub fn specifications(&self) -> Vec<Arc<ObjectSpecification>> {
		let mut specs: Vec<_> = self
			.arena
			.read()
			.values()
			.filter(|spec| spec.is_introspected())
			.cloned()
			.collect();
		specs.sort_unstable_by(|a, b| a.key().cmp(b.key()));
		specs
	}

	/// Number of entries in any state.
	pub fn len(&self) -> usize {
		self.arena.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.arena.read().is_empty()
	}

	/// Drops the entry for `key` unless it is being introspected.
	///
	/// Returns whether an entry was removed. Links held by other
	/// specifications go stale once no caller holds the evicted one.
	pub fn evict(&self, key: &TypeKey) -> bool {
		let _graph = self.monitor.lock();
		let mut arena = self.arena.write();
		let evictable = arena
			.get(key)
			.is_some_and(|spec| spec.state() != IntrospectionState::Introspecting);
		if evictable {
			arena.remove(key);
			tracing::debug!(ty = %key, "specification evicted");
		}
		evictable
	}

	/// Drops every entry not currently being introspected, including cached
	/// failures.
	pub fn reset(&self) {
		let _graph = self.monitor.lock();
		let mut arena = self.arena.write();
		arena.retain(|_, spec| spec.state() == IntrospectionState::Introspecting);
		tracing::debug!(remaining = arena.len(), "specification loader reset");
	}

	/// Number of introspection runs started since construction.
	pub fn introspection_count(&self) -> usize {
		self.introspections.load(Ordering::Relaxed)
	}
}

impl std::fmt::Debug for SpecificationLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpecificationLoader")
			.field("model", &self.model)
			.field("entries", &self.len())
			.field("introspections", &self.introspection_count())
			.finish()
	}
}
