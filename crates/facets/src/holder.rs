//! Facet holders and override resolution.

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::precedence::challenger_wins;
use crate::{Facet, FacetError, FacetKind, FacetType, HolderId, Precedence};


/// A facet proposed by a contributor, not yet installed.
#[derive(Debug, Clone)]
pub struct FacetCandidate {
	facet: Arc<dyn Facet>,
	precedence: Precedence,
	replaceable: bool,
}

impl FacetCandidate {
	pub fn new<F: Facet>(facet: F, precedence: Precedence) -> Self {
		Self {
			facet: Arc::new(facet),
			precedence,
			replaceable: true,
		}
	}

	pub fn fallback<F: Facet>(facet: F) -> Self {
		Self::new(facet, Precedence::Fallback)
	}

	pub fn at_default<F: Facet>(facet: F) -> Self {
		Self::new(facet, Precedence::Default)
	}

	pub fn inferred<F: Facet>(facet: F) -> Self {
		Self::new(facet, Precedence::Inferred)
	}

	pub fn high<F: Facet>(facet: F) -> Self {
		Self::new(facet, Precedence::High)
	}

	/// Marks the facet so that later contributions at the same precedence
	/// cannot replace it. Strictly higher precedence still wins.
	pub fn non_replaceable(mut self) -> Self {
		self.replaceable = false;
		self
	}

	pub fn kind(&self) -> FacetKind {
		self.facet.kind()
	}

	pub fn precedence(&self) -> Precedence {
		self.precedence
	}
}

/// A facet installed on a holder.
#[derive(Debug, Clone)]
pub struct InstalledFacet {
	facet: Arc<dyn Facet>,
	precedence: Precedence,
	replaceable: bool,
	holder: HolderId,
}

impl InstalledFacet {
	pub fn facet(&self) -> &dyn Facet {
		&*self.facet
	}

	pub fn kind(&self) -> FacetKind {
		self.facet.kind()
	}

	pub fn precedence(&self) -> Precedence {
		self.precedence
	}

	pub fn is_replaceable(&self) -> bool {
		self.replaceable
	}

	/// The holder this facet belongs to.
	pub fn holder(&self) -> &HolderId {
		&self.holder
	}

	pub fn downcast<F: FacetType>(&self) -> Option<&F> {
		let any: &dyn Any = &*self.facet;
		any.downcast_ref::<F>()
	}
}

/// Result of [`FacetHolder::add_facet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
	/// No facet of the kind existed.
	InsertedNew,
	/// The incumbent won; the candidate was discarded.
	KeptExisting,
	/// The candidate replaced the incumbent.
	ReplacedExisting,
}

/// Outcome of a contention between an incumbent and a challenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	KeptExisting,
	ReplacedExisting,
}

/// Diagnostic record of two contributions competing for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetContention {
	pub kind: FacetKind,
	pub incumbent: Precedence,
	pub challenger: Precedence,
	pub resolution: Resolution,
}

/// Named container of facets keyed by [`FacetKind`].
///
/// Mutated only while its owner is being introspected, then sealed.
#[derive(Debug, Clone)]
pub struct FacetHolder {
	id: HolderId,
	facets: FxHashMap<FacetKind, InstalledFacet>,
	contention: Vec<FacetContention>,
	sealed: bool,
}

impl FacetHolder {
	pub fn new(id: HolderId) -> Self {
		Self {
			id,
			facets: FxHashMap::default(),
			contention: Vec::new(),
			sealed: false,
		}
	}

	pub fn id(&self) -> &HolderId {
		&self.id
	}

	/// Installs `candidate` or discards it according to the precedence rule.
	pub fn add_facet(&mut self, candidate: FacetCandidate) -> Result<InstallAction, FacetError> {
		let kind = candidate.kind();
		if self.sealed {
			return Err(FacetError::Sealed {
				holder: self.id.clone(),
				kind,
			});
		}

		let Some((incumbent, replaceable)) = self
			.facets
			.get(&kind)
			.map(|installed| (installed.precedence, installed.replaceable))
		else {
			self.install(kind, candidate);
			return Ok(InstallAction::InsertedNew);
		};

		let new_wins = challenger_wins(incumbent, replaceable, candidate.precedence);
		let contention = FacetContention {
			kind,
			incumbent,
			challenger: candidate.precedence,
			resolution: if new_wins {
				Resolution::ReplacedExisting
			} else {
				Resolution::KeptExisting
			},
		};
		tracing::trace!(
			holder = %self.id,
			%kind,
			incumbent = %contention.incumbent,
			challenger = %contention.challenger,
			resolution = ?contention.resolution,
			"facet contention"
		);
		self.contention.push(contention);

		if new_wins {
			self.install(kind, candidate);
			Ok(InstallAction::ReplacedExisting)
		} else {
			Ok(InstallAction::KeptExisting)
		}
	}

	fn install(&mut self, kind: FacetKind, candidate: FacetCandidate) {
		self.facets.insert(
			kind,
			InstalledFacet {
				facet: candidate.facet,
				precedence: candidate.precedence,
				replaceable: candidate.replaceable,
				holder: self.id.clone(),
			},
		);
	}

	pub fn facet<F: FacetType>(&self) -> Option<&F> {
		self.facets.get(&F::KIND)?.downcast::<F>()
	}

	pub fn installed(&self, kind: FacetKind) -> Option<&InstalledFacet> {
		self.facets.get(&kind)
	}

	pub fn contains_facet<F: FacetType>(&self) -> bool {
		self.facets.contains_key(&F::KIND)
	}

	pub fn contains_kind(&self, kind: FacetKind) -> bool {
		self.facets.contains_key(&kind)
	}

	/// `true` only if a facet of the kind exists with precedence above fallback.
	///
	/// Contributors use this to avoid clobbering an intentional choice with a
	/// generic default.
	pub fn contains_non_fallback_facet<F: FacetType>(&self) -> bool {
		self.contains_non_fallback_kind(F::KIND)
	}

	pub fn contains_non_fallback_kind(&self, kind: FacetKind) -> bool {
		self.facets
			.get(&kind)
			.is_some_and(|installed| !installed.precedence.is_fallback())
	}

	pub fn facet_precedence<F: FacetType>(&self) -> Option<Precedence> {
		self.facets.get(&F::KIND).map(|installed| installed.precedence)
	}

	/// Installed kinds, sorted by name.
	pub fn kinds(&self) -> Vec<FacetKind> {
		let mut kinds: Vec<_> = self.facets.keys().copied().collect();
		kinds.sort_unstable();
		kinds
	}

	pub fn iter(&self) -> impl Iterator<Item = &InstalledFacet> {
		self.facets.values()
	}

	pub fn len(&self) -> usize {
		self.facets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.facets.is_empty()
	}

	/// Every contention recorded while the holder was mutable, in order.
	pub fn contention(&self) -> &[FacetContention] {
		&self.contention
	}

	/// Freezes the facet set. Later [`Self::add_facet`] calls fail.
	pub fn seal(&mut self) {
		self.sealed = true;
	}

	pub fn is_sealed(&self) -> bool {
		self.sealed
	}
}
