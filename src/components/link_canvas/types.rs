use serde::{Deserialize, Serialize};

use super::status::LinkStatus;

/// A team member that can appear on the canvas.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub department: Option<String>,
	#[serde(default)]
	pub role: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Participant {
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: Some(name.into()),
			..Default::default()
		}
	}

	pub fn with_department(mut self, department: impl Into<String>) -> Self {
		self.department = Some(department.into());
		self
	}

	/// Name, else email, else id.
	pub fn display_name(&self) -> &str {
		non_blank(&self.name)
			.or_else(|| non_blank(&self.email))
			.unwrap_or(&self.id)
	}

	/// Department, else role.
	pub fn classifier(&self) -> Option<&str> {
		non_blank(&self.department).or_else(|| non_blank(&self.role))
	}

	/// String hashed into the node palette.
	pub fn color_key(&self) -> &str {
		self.classifier()
			.or_else(|| non_blank(&self.name))
			.unwrap_or(&self.id)
	}
}

/// Role a participant plays on a single link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkRole {
	Initiator,
	#[default]
	Participant,
}

impl From<String> for LinkRole {
	fn from(raw: String) -> Self {
		if raw.trim().eq_ignore_ascii_case("INITIATOR") {
			Self::Initiator
		} else {
			Self::Participant
		}
	}
}

impl From<LinkRole> for String {
	fn from(role: LinkRole) -> Self {
		match role {
			LinkRole::Initiator => "INITIATOR".into(),
			LinkRole::Participant => "PARTICIPANT".into(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkParticipant {
	#[serde(default)]
	pub role: LinkRole,
	#[serde(default)]
	pub participant_ref: Option<String>,
}

/// A logged collaboration between a PM and one or more participants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub last_nudge_label: Option<String>,
	/// Epoch milliseconds.
	#[serde(default)]
	pub created_at: Option<u64>,
	#[serde(default)]
	pub participants: Vec<LinkParticipant>,
}

impl Link {
	/// A link initiated by `initiator` with one plain participant per entry of `others`.
	pub fn between(id: impl Into<String>, initiator: &str, others: &[&str], status: &str) -> Self {
		let mut participants = vec![LinkParticipant {
			role: LinkRole::Initiator,
			participant_ref: Some(initiator.to_string()),
		}];
		participants.extend(others.iter().map(|other| LinkParticipant {
			role: LinkRole::Participant,
			participant_ref: Some(other.to_string()),
		}));
		let id = id.into();
		Self {
			title: id.clone(),
			id,
			status: Some(status.to_string()),
			participants,
			..Default::default()
		}
	}

	pub fn titled(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	pub fn nudged(mut self, label: impl Into<String>) -> Self {
		self.last_nudge_label = Some(label.into());
		self
	}

	pub fn at(mut self, created_at: u64) -> Self {
		self.created_at = Some(created_at);
		self
	}

	pub fn normalized_status(&self) -> LinkStatus {
		LinkStatus::normalize(self.status.as_deref())
	}

	/// The single initiator reference, or `None` when there are zero or several.
	pub fn initiator(&self) -> Option<&str> {
		let mut initiators = self
			.participants
			.iter()
			.filter(|p| p.role == LinkRole::Initiator);
		match (initiators.next(), initiators.next()) {
			(Some(only), None) => only.participant_ref.as_deref(),
			_ => None,
		}
	}
}

/// Everything one canvas instance is drawn from. The first participant is the PM.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasData {
	#[serde(default)]
	pub participants: Vec<Participant>,
	#[serde(default)]
	pub links: Vec<Link>,
}

impl CanvasData {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// Stable-sorts links oldest first. Links without `createdAt` sort ahead of
	/// timestamped ones and keep their relative order.
	pub fn into_chronological(mut self) -> Self {
		self.links.sort_by_key(|link| link.created_at);
		self
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Initiator,
	Participant,
}

/// Visual size class of a node box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeSize {
	#[default]
	Standard,
}

impl NodeSize {
	pub fn width(self) -> f64 {
		match self {
			Self::Standard => 150.0,
		}
	}

	pub fn height(self) -> f64 {
		match self {
			Self::Standard => 40.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub label: String,
	pub color: String,
	pub kind: NodeKind,
	pub size: NodeSize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub status: LinkStatus,
	pub color: &'static str,
	pub width: f64,
	pub label: String,
	pub link_count: usize,
	/// Lateral bow of the curve's control point.
	pub offset: f64,
	/// Separation of the curve's endpoints on the shared nodes.
	pub node_offset: f64,
	pub last_nudge: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	pub nodes: Vec<LayoutNode>,
	pub edges: Vec<LayoutEdge>,
}

impl Layout {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	pub fn element_count(&self) -> usize {
		self.nodes.len() + self.edges.len()
	}
}
