use std::fmt;

/// Canonical link statuses, in the fixed fan-out priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkStatus {
	Complete,
	Pending,
	Delayed,
}

impl LinkStatus {
	/// Fan-out priority: edges for a participant are ranked in this order.
	pub const PRIORITY: [LinkStatus; 3] = [LinkStatus::Complete, LinkStatus::Pending, LinkStatus::Delayed];

	/// Parses a raw status, case-insensitively. `COMPLETED` is accepted as `COMPLETE`.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_uppercase().as_str() {
			"COMPLETE" | "COMPLETED" => Some(Self::Complete),
			"PENDING" => Some(Self::Pending),
			"DELAYED" => Some(Self::Delayed),
			_ => None,
		}
	}

	/// Missing or unrecognized statuses fall back to `Pending`.
	pub fn normalize(raw: Option<&str>) -> Self {
		raw.and_then(Self::parse).unwrap_or(Self::Pending)
	}

	pub fn index(self) -> usize {
		match self {
			Self::Complete => 0,
			Self::Pending => 1,
			Self::Delayed => 2,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Self::Complete => "green",
			Self::Pending => "orange",
			Self::Delayed => "red",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Complete => "COMPLETE",
			Self::Pending => "PENDING",
			Self::Delayed => "DELAYED",
		}
	}
}

impl fmt::Display for LinkStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(Some("COMPLETE"), LinkStatus::Complete)]
	#[case(Some("completed"), LinkStatus::Complete)]
	#[case(Some(" Complete "), LinkStatus::Complete)]
	#[case(Some("pending"), LinkStatus::Pending)]
	#[case(Some("Delayed"), LinkStatus::Delayed)]
	#[case(Some("awaiting_response"), LinkStatus::Pending)]
	#[case(Some(""), LinkStatus::Pending)]
	#[case(None, LinkStatus::Pending)]
	fn normalizes_raw_status(#[case] raw: Option<&str>, #[case] expected: LinkStatus) {
		assert_eq!(LinkStatus::normalize(raw), expected);
	}

	#[test]
	fn priority_matches_index() {
		for (i, status) in LinkStatus::PRIORITY.iter().enumerate() {
			assert_eq!(status.index(), i);
		}
	}
}
