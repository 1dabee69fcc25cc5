use leptos::prelude::*;

use crate::components::link_canvas::{CanvasData, Link, LinkCanvas, Participant};

/// Sample team used when the page carries no canvas data.
pub fn demo_data() -> CanvasData {
	let participants = vec![
		Participant::new("ravi", "Ravi").with_department("PM"),
		Participant::new("vivek", "Vivek").with_department("Dev"),
		Participant::new("avinash", "Avinash").with_department("Design"),
		Participant::new("shraddha", "Shraddha").with_department("Legal"),
		Participant::new("smruti", "Smruti").with_department("Security"),
		Participant::new("aparna", "Aparna").with_department("Business"),
	];

	let links = vec![
		Link::between("l1", "ravi", &["vivek"], "COMPLETE").titled("API contract").nudged("5 days ago").at(1),
		Link::between("l2", "ravi", &["vivek"], "COMPLETE").titled("Release handoff").nudged("2 days ago").at(2),
		Link::between("l3", "ravi", &["vivek"], "PENDING").titled("Perf review").nudged("today").at(3),
		Link::between("l4", "ravi", &["avinash"], "COMPLETE").titled("Design sync").nudged("3 days ago").at(4),
		Link::between("l5", "ravi", &["avinash"], "PENDING").titled("Onboarding flow").at(5),
		Link::between("l6", "ravi", &["shraddha"], "COMPLETE").titled("Legal approval").nudged("5 days ago").at(6),
		Link::between("l7", "ravi", &["shraddha"], "PENDING").titled("Contract draft").nudged("1 day ago").at(7),
		Link::between("l8", "ravi", &["shraddha"], "DELAYED").titled("NDA sign-off").nudged("3 days ago").at(8),
		Link::between("l9", "ravi", &["smruti", "shraddha"], "DELAYED").titled("Security review").nudged("yesterday").at(9),
		Link::between("l10", "ravi", &["aparna"], "COMPLETED").titled("Biz strategy").nudged("today").at(10),
		Link::between("l11", "smruti", &["aparna"], "PENDING").titled("Threat model").at(11),
	];

	CanvasData { participants, links }
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let data = crate::load_canvas_data().unwrap_or_else(demo_data);
	let (canvas_data, _) = signal(data);

	view! {
		<div class="fullscreen-graph">
			<LinkCanvas data=canvas_data fullscreen=true />
			<div class="graph-overlay">
				<h1>"Link Canvas"</h1>
				<p class="subtitle">"Hover an edge for its latest link. Drag nodes to rearrange, scroll to zoom, double-click to fit."</p>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::link_canvas::compute_layout;

	#[test]
	fn demo_data_lays_out_every_participant() {
		let data = demo_data().into_chronological();
		let layout = compute_layout(&data.participants, &data.links);
		assert_eq!(layout.nodes.len(), 6);
		assert_eq!(layout.edges.iter().filter(|e| e.target == "shraddha").count(), 3);
		// The smruti-initiated link belongs to another PM's canvas.
		assert!(layout.edges.iter().all(|e| e.label != "Threat model"));
	}
}
