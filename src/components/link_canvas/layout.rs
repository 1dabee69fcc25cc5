//! PM-centred star layout for the link canvas.
//!
//! The PM sits at a fixed anchor; every other participant sits on one row
//! beneath it. Links are grouped per participant by normalized status and each
//! non-empty group becomes one edge, fanned out so parallel edges between the
//! same pair of nodes stay apart.

use super::status::LinkStatus;
use super::types::{Layout, LayoutEdge, LayoutNode, Link, LinkRole, NodeKind, NodeSize, Participant};

/// Node palette for non-PM participants.
pub const PALETTE: [&str; 8] = [
	"#3b82f6", "#8b5cf6", "#ec4899", "#14b8a6", "#f59e0b", "#6366f1", "#84cc16", "#06b6d4",
];

pub const PM_COLOR: &str = "#64748b";

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub anchor_x: f64,
	pub anchor_y: f64,
	pub row_offset: f64,
	pub row_pitch: f64,
	/// Lateral offset of the outermost edge in a fan.
	pub fan_spacing: f64,
	pub node_offset_ratio: f64,
	pub base_width: f64,
	pub max_width: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			anchor_x: 400.0,
			anchor_y: 80.0,
			row_offset: 280.0,
			row_pitch: 180.0,
			fan_spacing: 40.0,
			node_offset_ratio: 0.3,
			base_width: 2.0,
			max_width: 10.0,
		}
	}
}

/// Deterministic palette color for a department (or any other key).
pub fn department_color(key: &str) -> &'static str {
	let hash = key
		.chars()
		.fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32));
	PALETTE[hash as usize % PALETTE.len()]
}

/// Links between the PM and one participant, grouped by normalized status in
/// input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusBuckets<'a> {
	buckets: [Vec<&'a Link>; 3],
}

impl<'a> StatusBuckets<'a> {
	pub fn get(&self, status: LinkStatus) -> &[&'a Link] {
		&self.buckets[status.index()]
	}

	fn push(&mut self, status: LinkStatus, link: &'a Link) {
		self.buckets[status.index()].push(link);
	}

	/// Non-empty buckets in fan-out priority order.
	pub fn present(&self) -> impl Iterator<Item = (LinkStatus, &[&'a Link])> + '_ {
		LinkStatus::PRIORITY
			.into_iter()
			.map(move |status| (status, self.get(status)))
			.filter(|(_, links)| !links.is_empty())
	}

	pub fn is_empty(&self) -> bool {
		self.buckets.iter().all(Vec::is_empty)
	}
}

/// Splits off the PM and returns the row: every later participant whose id is
/// neither the PM's nor already taken by an earlier row participant.
pub fn row_participants(participants: &[Participant]) -> Option<(&Participant, Vec<&Participant>)> {
	let (pm, rest) = participants.split_first()?;
	let mut row: Vec<&Participant> = Vec::with_capacity(rest.len());
	for p in rest {
		if p.id != pm.id && row.iter().all(|seen| seen.id != p.id) {
			row.push(p);
		}
	}
	Some((pm, row))
}

/// Buckets for every row participant (see [`row_participants`]), in row order.
///
/// Links whose single initiator is not `participants[0]` are ignored, as are
/// link sides that reference no row participant. A link lands at most once in
/// a participant's buckets even if it names that participant twice.
pub fn build_status_buckets<'a>(participants: &[Participant], links: &'a [Link]) -> Vec<StatusBuckets<'a>> {
	let Some((pm, row)) = row_participants(participants) else {
		return Vec::new();
	};
	let mut buckets = vec![StatusBuckets::default(); row.len()];
	let mut bucketed: Vec<usize> = Vec::new();

	for link in links {
		if link.initiator() != Some(pm.id.as_str()) {
			continue;
		}
		let status = link.normalized_status();
		bucketed.clear();
		for side in link.participants.iter().filter(|p| p.role != LinkRole::Initiator) {
			let Some(reference) = side.participant_ref.as_deref() else {
				continue;
			};
			if reference == pm.id {
				continue;
			}
			let Some(i) = row.iter().position(|p| p.id == reference) else {
				continue;
			};
			if !bucketed.contains(&i) {
				bucketed.push(i);
				buckets[i].push(status, link);
			}
		}
	}
	buckets
}

/// Symmetric lateral offset for rank `i` of `n` present buckets, spanning
/// `[-spacing, spacing]`.
pub fn fan_offset(i: usize, n: usize, spacing: f64) -> f64 {
	if n <= 1 {
		return 0.0;
	}
	(2.0 * i as f64 / (n - 1) as f64 - 1.0) * spacing
}

fn node_label(participant: &Participant, kind: NodeKind) -> String {
	let name = participant.display_name();
	match kind {
		NodeKind::Initiator => format!("{name} (PM)"),
		NodeKind::Participant => format!("{name} ({})", participant.classifier().unwrap_or("PARTICIPANT")),
	}
}

fn edge_width(config: &LayoutConfig, status: LinkStatus, count: usize) -> f64 {
	match status {
		LinkStatus::Complete => (config.base_width + count.saturating_sub(1) as f64).min(config.max_width),
		_ => config.base_width,
	}
}

/// Layout with the default configuration.
pub fn compute_layout(participants: &[Participant], links: &[Link]) -> Layout {
	compute_layout_with(&LayoutConfig::default(), participants, links)
}

/// Lays out the PM star. Links are assumed to be in chronological order; the
/// last link of each bucket supplies the edge label and nudge text.
pub fn compute_layout_with(config: &LayoutConfig, participants: &[Participant], links: &[Link]) -> Layout {
	if links.is_empty() {
		return Layout::default();
	}
	let Some((pm, row)) = row_participants(participants) else {
		return Layout::default();
	};
	if row.is_empty() {
		return Layout::default();
	}

	let mut nodes = Vec::with_capacity(row.len() + 1);
	nodes.push(LayoutNode {
		id: pm.id.clone(),
		x: config.anchor_x,
		y: config.anchor_y,
		label: node_label(pm, NodeKind::Initiator),
		color: PM_COLOR.to_string(),
		kind: NodeKind::Initiator,
		size: NodeSize::Standard,
	});

	let centre = (row.len() - 1) as f64 / 2.0;
	nodes.extend(row.iter().enumerate().map(|(i, p)| LayoutNode {
		id: p.id.clone(),
		x: config.anchor_x + (i as f64 - centre) * config.row_pitch,
		y: config.anchor_y + config.row_offset,
		label: node_label(p, NodeKind::Participant),
		color: department_color(p.color_key()).to_string(),
		kind: NodeKind::Participant,
		size: NodeSize::Standard,
	}));

	let mut edges = Vec::new();
	for (participant, buckets) in row.iter().zip(build_status_buckets(participants, links)) {
		let present: Vec<_> = buckets.present().collect();
		let n = present.len();
		for (i, (status, bucket)) in present.into_iter().enumerate() {
			let Some(latest) = bucket.last() else {
				continue;
			};
			let offset = fan_offset(i, n, config.fan_spacing);
			edges.push(LayoutEdge {
				id: format!("{}-{}-{}", pm.id, participant.id, status.as_str().to_ascii_lowercase()),
				source: pm.id.clone(),
				target: participant.id.clone(),
				status,
				color: status.color(),
				width: edge_width(config, status, bucket.len()),
				label: latest.title.clone(),
				link_count: bucket.len(),
				offset,
				node_offset: offset * config.node_offset_ratio,
				last_nudge: latest.last_nudge_label.clone(),
			});
		}
	}

	Layout { nodes, edges }
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::components::link_canvas::types::LinkParticipant;

	const K: f64 = 40.0;

	fn team() -> Vec<Participant> {
		vec![
			Participant::new("ravi", "Ravi").with_department("PM"),
			Participant::new("vivek", "Vivek").with_department("Dev"),
			Participant::new("shraddha", "Shraddha").with_department("Legal"),
		]
	}

	fn edges_to<'a>(layout: &'a Layout, target: &str) -> Vec<&'a LayoutEdge> {
		layout.edges.iter().filter(|e| e.target == target).collect()
	}

	#[rstest]
	#[case(vec![], vec![])]
	#[case(vec![Participant::new("p1", "One")], vec![])]
	#[case(vec![Participant::new("p1", "One"), Participant::new("p2", "Two")], vec![])]
	#[case(vec![Participant::new("p1", "One")], vec![Link::between("l", "p1", &["p1"], "PENDING")])]
	fn degenerate_inputs_yield_empty_layout(#[case] participants: Vec<Participant>, #[case] links: Vec<Link>) {
		assert_eq!(compute_layout(&participants, &links), Layout::default());
	}

	#[test]
	fn end_to_end_scenario() {
		let links = vec![
			Link::between("l1", "ravi", &["vivek"], "COMPLETE").titled("API review"),
			Link::between("l2", "ravi", &["vivek"], "COMPLETE").titled("Release sync").nudged("today"),
			Link::between("l3", "ravi", &["shraddha"], "PENDING").titled("Contract draft"),
			Link::between("l4", "ravi", &["shraddha"], "DELAYED").titled("NDA sign-off"),
		];
		let layout = compute_layout(&team(), &links);

		assert_eq!(layout.nodes.len(), 3);
		assert_eq!(layout.nodes[0].label, "Ravi (PM)");
		assert_eq!(layout.nodes[1].label, "Vivek (Dev)");

		let vivek = edges_to(&layout, "vivek");
		assert_eq!(vivek.len(), 1);
		assert_eq!(vivek[0].color, "green");
		assert_eq!(vivek[0].width, 3.0);
		assert_eq!(vivek[0].offset, 0.0);
		assert_eq!(vivek[0].label, "Release sync");
		assert_eq!(vivek[0].last_nudge.as_deref(), Some("today"));
		assert_eq!(vivek[0].link_count, 2);

		let shraddha = edges_to(&layout, "shraddha");
		assert_eq!(shraddha.len(), 2);
		assert_eq!((shraddha[0].color, shraddha[0].offset), ("orange", -K));
		assert_eq!((shraddha[1].color, shraddha[1].offset), ("red", K));
		assert_eq!(shraddha[0].width, 2.0);
		assert_eq!(shraddha[1].id, "ravi-shraddha-delayed");
		assert!(layout.edges.iter().all(|e| e.source == "ravi"));
	}

	#[test]
	fn only_pm_initiated_links_reach_buckets() {
		let participants = vec![Participant::new("P", "Pat"), Participant::new("A", "Ann")];
		let links = vec![
			Link::between("first", "P", &["A"], "COMPLETE"),
			Link::between("second", "P", &["A"], "completed"),
			Link::between("third", "A", &["P"], "delayed"),
		];
		let buckets = build_status_buckets(&participants, &links);

		assert_eq!(buckets.len(), 1);
		let complete: Vec<_> = buckets[0].get(LinkStatus::Complete).iter().map(|l| l.id.as_str()).collect();
		assert_eq!(complete, ["first", "second"]);
		assert!(buckets[0].get(LinkStatus::Pending).is_empty());
		assert!(buckets[0].get(LinkStatus::Delayed).is_empty());
	}

	#[test]
	fn each_link_lands_in_one_bucket_per_participant() {
		let participants = team();
		let links = vec![
			Link::between("l1", "ravi", &["vivek", "shraddha"], "DELAYED"),
			Link::between("l2", "ravi", &["vivek"], "bogus"),
		];
		let buckets = build_status_buckets(&participants, &links);

		for bucket in &buckets {
			let total: usize = LinkStatus::PRIORITY.iter().map(|s| bucket.get(*s).len()).sum();
			let distinct: std::collections::HashSet<_> = LinkStatus::PRIORITY
				.iter()
				.flat_map(|s| bucket.get(*s).iter().map(|l| l.id.as_str()))
				.collect();
			assert_eq!(total, distinct.len());
		}
		assert_eq!(buckets[0].get(LinkStatus::Pending)[0].id, "l2");
		assert_eq!(buckets[1].get(LinkStatus::Delayed)[0].id, "l1");
	}

	#[test]
	fn ambiguous_initiators_and_dangling_refs_are_skipped() {
		let participants = team();
		let mut two_initiators = Link::between("two", "ravi", &["vivek"], "PENDING");
		two_initiators.participants[1].role = LinkRole::Initiator;
		let mut dangling = Link::between("dangling", "ravi", &["ghost", "shraddha"], "PENDING");
		dangling.participants.push(LinkParticipant {
			role: LinkRole::Participant,
			participant_ref: None,
		});
		let no_initiator = Link {
			participants: vec![LinkParticipant {
				role: LinkRole::Participant,
				participant_ref: Some("vivek".into()),
			}],
			..Link::between("none", "ravi", &[], "PENDING")
		};

		let layout = compute_layout(&participants, &[two_initiators, dangling, no_initiator]);

		assert_eq!(layout.nodes.len(), 3);
		assert_eq!(layout.edges.len(), 1);
		assert_eq!(layout.edges[0].target, "shraddha");
	}

	#[test]
	fn at_most_three_edges_per_participant() {
		let statuses = ["COMPLETE", "pending", "Delayed", "unknown", "COMPLETED", "delayed", "PENDING"];
		let links: Vec<_> = statuses
			.iter()
			.enumerate()
			.map(|(i, s)| Link::between(format!("l{i}"), "ravi", &["vivek"], s))
			.collect();
		let layout = compute_layout(&team(), &links);

		let vivek = edges_to(&layout, "vivek");
		assert_eq!(vivek.len(), 3);
		let offsets: Vec<_> = vivek.iter().map(|e| e.offset).collect();
		assert_eq!(offsets, [-K, 0.0, K]);
		let statuses: Vec<_> = vivek.iter().map(|e| e.status).collect();
		assert_eq!(statuses, LinkStatus::PRIORITY);
		assert_eq!(vivek[1].link_count, 3);
		assert_eq!(vivek[1].node_offset, 0.0);
		assert_eq!(vivek[0].node_offset, -K * 0.3);
		assert!(edges_to(&layout, "shraddha").is_empty());
	}

	#[test]
	fn layout_is_deterministic() {
		let links = vec![
			Link::between("l1", "ravi", &["vivek"], "PENDING"),
			Link::between("l2", "ravi", &["shraddha"], "COMPLETE"),
			Link::between("l3", "ravi", &["shraddha"], "DELAYED"),
		];
		assert_eq!(compute_layout(&team(), &links), compute_layout(&team(), &links));
	}

	#[test]
	fn row_is_centred_under_the_pm() {
		let mut participants = team();
		participants.push(Participant::new("smruti", "Smruti").with_department("Security"));
		let links = vec![Link::between("l", "ravi", &["vivek"], "PENDING")];
		let config = LayoutConfig::default();
		let layout = compute_layout_with(&config, &participants, &links);

		assert_eq!((layout.nodes[0].x, layout.nodes[0].y), (400.0, 80.0));
		let xs: Vec<_> = layout.nodes[1..].iter().map(|n| n.x).collect();
		assert_eq!(xs, [220.0, 400.0, 580.0]);
		assert!(layout.nodes[1..].iter().all(|n| n.y == 360.0));
		assert_eq!(layout.nodes[0].color, PM_COLOR);
		assert_eq!(layout.nodes[3].label, "Smruti (Security)");
	}

	#[test]
	fn complete_width_is_capped() {
		let links: Vec<_> = (0..20)
			.map(|i| Link::between(format!("l{i}"), "ravi", &["vivek"], "COMPLETE"))
			.collect();
		let layout = compute_layout(&team(), &links);
		assert_eq!(layout.edges[0].width, LayoutConfig::default().max_width);
	}

	#[test]
	fn repeated_side_counts_the_link_once() {
		let links = vec![Link::between("only", "ravi", &["vivek", "vivek"], "COMPLETE")];
		let buckets = build_status_buckets(&team(), &links);
		let ids: Vec<_> = buckets[0].get(LinkStatus::Complete).iter().map(|l| l.id.as_str()).collect();
		assert_eq!(ids, ["only"]);

		let layout = compute_layout(&team(), &links);
		assert_eq!(layout.edges.len(), 1);
		assert_eq!(layout.edges[0].link_count, 1);
		assert_eq!(layout.edges[0].width, 2.0);
	}

	#[test]
	fn duplicate_participant_ids_get_one_node() {
		let participants = vec![
			Participant::new("ravi", "Ravi"),
			Participant::new("ravi", "Ravi again"),
			Participant::new("vivek", "Vivek").with_department("Dev"),
			Participant::new("vivek", "Vivek twin"),
		];
		let links = vec![Link::between("l", "ravi", &["vivek"], "PENDING")];
		let layout = compute_layout(&participants, &links);

		let ids: Vec<_> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["ravi", "vivek"]);
		assert_eq!(layout.nodes[1].label, "Vivek (Dev)");
		assert_eq!(layout.nodes[1].x, 400.0);
		assert_eq!(build_status_buckets(&participants, &links).len(), 1);
		assert_eq!(layout.edges.len(), 1);
	}

	#[test]
	fn pm_repeated_in_row_only_is_degenerate() {
		let participants = vec![Participant::new("ravi", "Ravi"), Participant::new("ravi", "Ravi again")];
		let links = vec![Link::between("l", "ravi", &["ravi"], "PENDING")];
		assert_eq!(compute_layout(&participants, &links), Layout::default());
	}

	#[test]
	fn nodes_share_the_standard_size() {
		let links = vec![Link::between("l", "ravi", &["vivek"], "PENDING")];
		let layout = compute_layout(&team(), &links);
		assert!(layout.nodes.iter().all(|n| n.size == NodeSize::Standard));
	}

	#[rstest]
	#[case("Security")]
	#[case("Dev")]
	#[case("")]
	#[case("Ünïcödé")]
	fn department_color_is_stable_and_from_palette(#[case] key: &str) {
		let color = department_color(key);
		assert_eq!(color, department_color(key));
		assert!(PALETTE.contains(&color));
	}

	#[rstest]
	#[case(0, 1, 0.0)]
	#[case(0, 2, -K)]
	#[case(1, 2, K)]
	#[case(0, 3, -K)]
	#[case(1, 3, 0.0)]
	#[case(2, 3, K)]
	fn fan_offsets_are_symmetric(#[case] i: usize, #[case] n: usize, #[case] expected: f64) {
		assert_eq!(fan_offset(i, n, K), expected);
	}
}
