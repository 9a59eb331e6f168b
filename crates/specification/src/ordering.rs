//! Member ordering.
//!
//! Members are bucketed into layout groups, then sorted within each group:
//!
//! 1. The default group comes first, followed by the other groups in order of
//!    their first appearance in declaration order.
//! 2. Inside a group, members with a sequence come first, ascending by Dewey
//!    order, ties broken by declaration order.
//! 3. Members without a sequence follow, in declaration order.

use metaspec_facets::{DeweySequence, MemberOrderFacet};


/// One named layout group and its ordered members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedGroup<T> {
	pub name: String,
	pub members: Vec<T>,
}

/// Groups and sorts `items`, which must be given in declaration order.
pub fn order_members<T>(
	items: Vec<T>,
	default_group: &str,
	member_order: impl Fn(&T) -> Option<&MemberOrderFacet>,
) -> Vec<OrderedGroup<T>> {
	struct Keyed<T> {
		sequence: Option<DeweySequence>,
		index: usize,
		item: T,
	}

	let mut groups: Vec<(String, Vec<Keyed<T>>)> = vec![(default_group.to_string(), Vec::new())];
	for (index, item) in items.into_iter().enumerate() {
		let order = member_order(&item);
		let group = order
			.and_then(MemberOrderFacet::group)
			.unwrap_or(default_group)
			.to_string();
		let sequence = order.and_then(|o| o.sequence().cloned());

		let keyed = Keyed {
			sequence,
			index,
			item,
		};
		match groups.iter_mut().find(|(name, _)| *name == group) {
			Some((_, members)) => members.push(keyed),
			None => groups.push((group, vec![keyed])),
		}
	}

	groups
		.into_iter()
		.filter(|(_, members)| !members.is_empty())
		.map(|(name, mut members)| {
			// `None` sorts before `Some`, so sequenced members are keyed on
			// `is_none()` first.
			members.sort_by(|a, b| {
				(a.sequence.is_none(), &a.sequence, a.index).cmp(&(
					b.sequence.is_none(),
					&b.sequence,
					b.index,
				))
			});
			OrderedGroup {
				name,
				members: members.into_iter().map(|k| k.item).collect(),
			}
		})
		.collect()
}
