//! Expiry expressions for generated auth codes.
//!
//! An expression is either an RFC 3339 timestamp or a relative offset such as `+1 day`,
//! `+ 2 hours 30 minutes`, `+1 month`, or `tomorrow +8 hours`. Relative expressions start
//! from "now" unless they open with `today`, `midnight`, `tomorrow`, or `yesterday`, which
//! anchor them at the start of that day. Month and year terms move the calendar date and
//! clamp the day to the length of the target month. Every expression must resolve to an
//! instant strictly after the current time; anything else is rejected when configured and
//! again each time a code is generated.

// crates.io
use time::{Date, Month, Time, format_description::well_known::Rfc3339};
// self
use crate::{_prelude::*, error::ConfigError};

const DEFAULT_EXPRESSION: &str = "+1 day";
const OUT_OF_RANGE: &str = "the offset is out of range";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExpiryKind {
	Relative(RelativeOffset),
	Absolute(OffsetDateTime),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RelativeOffset {
	/// Days from today's midnight the expression is anchored at; `None` anchors at now.
	anchor_days: Option<i64>,
	months: i64,
	offset: Duration,
}
impl RelativeOffset {
	fn of(offset: Duration) -> Self {
		Self { offset, ..Default::default() }
	}

	fn apply(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
		let start = match self.anchor_days {
			Some(days) => now.replace_time(Time::MIDNIGHT).checked_add(Duration::days(days))?,
			None => now,
		};

		add_months(start, self.months)?.checked_add(self.offset)
	}
}

/// Validated expiry expression for newly generated auth codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpiryTime {
	expression: String,
	kind: ExpiryKind,
}
impl ExpiryTime {
	/// Parses the expression and checks that it resolves to an instant after `now`.
	pub fn new(expression: impl Into<String>, now: OffsetDateTime) -> Result<Self, ConfigError> {
		let expiry = Self::parse(expression.into())?;

		expiry.resolve(now)?;

		Ok(expiry)
	}

	/// Relative expiry of `duration` from the moment of generation.
	pub fn after(duration: Duration) -> Result<Self, ConfigError> {
		let expression = format!("{:+} seconds", duration.whole_seconds());

		if !duration.is_positive() {
			return Err(ConfigError::invalid_expiry(expression, "the expiry time must be in the future"));
		}

		Ok(Self { expression, kind: ExpiryKind::Relative(RelativeOffset::of(duration)) })
	}

	/// The expression as configured.
	pub fn expression(&self) -> &str {
		&self.expression
	}

	/// Resolves the instant codes generated at `now` stay valid until.
	pub fn resolve(&self, now: OffsetDateTime) -> Result<OffsetDateTime, ConfigError> {
		let valid_until = match self.kind {
			ExpiryKind::Relative(relative) => relative
				.apply(now)
				.ok_or_else(|| ConfigError::invalid_expiry(&self.expression, OUT_OF_RANGE))?,
			ExpiryKind::Absolute(instant) => instant,
		};

		if valid_until <= now {
			return Err(ConfigError::invalid_expiry(
				&self.expression,
				"the expiry time must be in the future",
			));
		}

		Ok(valid_until)
	}

	fn parse(expression: String) -> Result<Self, ConfigError> {
		let trimmed = expression.trim();
		let kind = match OffsetDateTime::parse(trimmed, &Rfc3339) {
			Ok(instant) => ExpiryKind::Absolute(instant),
			Err(_) => ExpiryKind::Relative(
				parse_relative(trimmed)
					.map_err(|reason| ConfigError::invalid_expiry(trimmed, reason))?,
			),
		};

		Ok(Self { expression, kind })
	}
}
impl Default for ExpiryTime {
	fn default() -> Self {
		Self {
			expression: DEFAULT_EXPRESSION.into(),
			kind: ExpiryKind::Relative(RelativeOffset::of(Duration::DAY)),
		}
	}
}
impl Display for ExpiryTime {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.expression)
	}
}
impl FromStr for ExpiryTime {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s, OffsetDateTime::now_utc())
	}
}
impl TryFrom<String> for ExpiryTime {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value, OffsetDateTime::now_utc())
	}
}
impl From<ExpiryTime> for String {
	fn from(value: ExpiryTime) -> Self {
		value.expression
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Unit {
	Seconds(i64),
	Months(i64),
}

fn parse_relative(expression: &str) -> Result<RelativeOffset, String> {
	let lowered = expression.to_ascii_lowercase();
	let mut rest = lowered.as_str();
	let mut relative = RelativeOffset::default();
	let mut terms = 0_usize;

	for (keyword, anchor_days) in [
		("now", None),
		("today", Some(0)),
		("midnight", Some(0)),
		("tomorrow", Some(1)),
		("yesterday", Some(-1)),
	] {
		if let Some(stripped) = rest.strip_prefix(keyword) {
			rest = stripped;
			relative.anchor_days = anchor_days;
			terms += 1;

			break;
		}
	}

	loop {
		rest = rest.trim_start();

		if rest.is_empty() {
			break;
		}

		let (negative, unsigned) = match rest.strip_prefix('-') {
			Some(after) => (true, after),
			None => (false, rest.strip_prefix('+').unwrap_or(rest)),
		};
		let unsigned = unsigned.trim_start();
		let digits = unsigned.find(|c: char| !c.is_ascii_digit()).unwrap_or(unsigned.len());

		if digits == 0 {
			return Err(format!("expected a number at `{rest}`"));
		}

		let amount = unsigned[..digits]
			.parse::<i64>()
			.map_err(|_| format!("`{}` is out of range", &unsigned[..digits]))?;
		let amount = if negative { -amount } else { amount };
		let after_amount = unsigned[digits..].trim_start();
		let unit_len =
			after_amount.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(after_amount.len());
		let unit = &after_amount[..unit_len];

		match parse_unit(unit).ok_or_else(|| format!("unknown time unit `{unit}`"))? {
			Unit::Seconds(scale) => {
				let seconds = amount.checked_mul(scale).ok_or_else(|| OUT_OF_RANGE.to_owned())?;

				relative.offset = relative
					.offset
					.checked_add(Duration::seconds(seconds))
					.ok_or_else(|| OUT_OF_RANGE.to_owned())?;
			},
			Unit::Months(scale) => {
				relative.months = amount
					.checked_mul(scale)
					.and_then(|months| relative.months.checked_add(months))
					.ok_or_else(|| OUT_OF_RANGE.to_owned())?;
			},
		}

		terms += 1;
		rest = &after_amount[unit_len..];
	}

	if terms == 0 {
		return Err("the expression is empty".into());
	}

	Ok(relative)
}

fn parse_unit(unit: &str) -> Option<Unit> {
	match unit {
		"s" | "sec" | "secs" | "second" | "seconds" => Some(Unit::Seconds(1)),
		"min" | "mins" | "minute" | "minutes" => Some(Unit::Seconds(60)),
		"h" | "hour" | "hours" => Some(Unit::Seconds(3_600)),
		"d" | "day" | "days" => Some(Unit::Seconds(86_400)),
		"w" | "week" | "weeks" => Some(Unit::Seconds(604_800)),
		"month" | "months" => Some(Unit::Months(1)),
		"y" | "year" | "years" => Some(Unit::Months(12)),
		_ => None,
	}
}

/// Moves `instant` by whole calendar months, clamping the day to the target month's length.
fn add_months(instant: OffsetDateTime, months: i64) -> Option<OffsetDateTime> {
	if months == 0 {
		return Some(instant);
	}

	let index = i64::from(instant.year())
		.checked_mul(12)?
		.checked_add(i64::from(u8::from(instant.month())) - 1)?
		.checked_add(months)?;
	let year = i32::try_from(index.div_euclid(12)).ok()?;
	let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
	let date = (28..=instant.day())
		.rev()
		.find_map(|day| Date::from_calendar_date(year, month, day).ok())
		.or_else(|| Date::from_calendar_date(year, month, instant.day()).ok())?;

	Some(instant.replace_date(date))
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	const NOW: OffsetDateTime = macros::datetime!(2025-11-10 12:00 UTC);

	#[test]
	fn relative_expressions_resolve_against_now() {
		let cases = [
			("+1 day", macros::datetime!(2025-11-11 12:00 UTC)),
			("+ 1 day", macros::datetime!(2025-11-11 12:00 UTC)),
			("2 hours 30 minutes", macros::datetime!(2025-11-10 14:30 UTC)),
			("now +1 week -1 day", macros::datetime!(2025-11-16 12:00 UTC)),
			("+90sec", macros::datetime!(2025-11-10 12:01:30 UTC)),
		];

		for (expression, expected) in cases {
			let expiry = ExpiryTime::new(expression, NOW)
				.unwrap_or_else(|e| panic!("`{expression}` should parse: {e}"));

			assert_eq!(expiry.resolve(NOW).expect("Expiry should resolve."), expected);
			assert_eq!(expiry.expression(), expression);
		}
	}

	#[test]
	fn past_or_present_expressions_are_rejected() {
		for expression in ["-1 day", "now", "+0 seconds", "2025-11-10T11:00:00Z"] {
			let err = ExpiryTime::new(expression, NOW)
				.expect_err("Non-future expiry should be rejected at configuration time.");

			assert!(
				matches!(err, ConfigError::InvalidExpiry { .. }),
				"`{expression}` produced {err:?}"
			);
		}
	}

	#[test]
	fn malformed_expressions_are_rejected() {
		for expression in ["", "someday", "+1 fortnight", "+ day", "1 day and", "tomorrow 3"] {
			assert!(ExpiryTime::new(expression, NOW).is_err(), "`{expression}` should not parse");
		}
	}

	#[test]
	fn calendar_units_and_day_anchors_resolve() {
		let cases = [
			("+1 month", NOW, macros::datetime!(2025-12-10 12:00 UTC)),
			("+2 months", NOW, macros::datetime!(2026-01-10 12:00 UTC)),
			("+1 year", NOW, macros::datetime!(2026-11-10 12:00 UTC)),
			("+1 year -1 month", NOW, macros::datetime!(2026-10-10 12:00 UTC)),
			(
				"+1 month",
				macros::datetime!(2025-01-31 08:00 UTC),
				macros::datetime!(2025-02-28 08:00 UTC),
			),
			(
				"+1 year",
				macros::datetime!(2024-02-29 08:00 UTC),
				macros::datetime!(2025-02-28 08:00 UTC),
			),
			("tomorrow", NOW, macros::datetime!(2025-11-11 00:00 UTC)),
			("Tomorrow +8 hours", NOW, macros::datetime!(2025-11-11 08:00 UTC)),
			("midnight +1 day", NOW, macros::datetime!(2025-11-11 00:00 UTC)),
		];

		for (expression, now, expected) in cases {
			let expiry = ExpiryTime::new(expression, now)
				.unwrap_or_else(|e| panic!("`{expression}` should parse: {e}"));

			assert_eq!(expiry.resolve(now).expect("Expiry should resolve."), expected, "{expression}");
		}

		for expression in ["today", "yesterday +1 day", "-1 month"] {
			assert!(ExpiryTime::new(expression, NOW).is_err(), "`{expression}` is not in the future");
		}
	}

	#[test]
	fn absolute_expiry_is_checked_again_on_resolve() {
		let expiry = ExpiryTime::new("2025-11-10T13:00:00Z", NOW)
			.expect("Future absolute expiry should be accepted.");

		assert_eq!(expiry.resolve(NOW).expect("Expiry should resolve."), NOW + Duration::HOUR);
		assert!(expiry.resolve(NOW + Duration::hours(2)).is_err());
	}

	#[test]
	fn default_is_one_day_and_after_rejects_non_positive() {
		let expiry = ExpiryTime::default();

		assert_eq!(expiry.expression(), "+1 day");
		assert_eq!(expiry.resolve(NOW).expect("Default should resolve."), NOW + Duration::DAY);
		assert!(ExpiryTime::after(Duration::ZERO).is_err());
		assert_eq!(
			ExpiryTime::after(Duration::minutes(5))
				.expect("Positive duration should be accepted.")
				.resolve(NOW)
				.expect("Relative expiry should resolve."),
			NOW + Duration::minutes(5)
		);
	}

	#[test]
	fn serde_validates_expression() {
		let expiry: ExpiryTime =
			serde_json::from_str("\"+2 days\"").expect("Expression should deserialize.");

		assert_eq!(expiry.expression(), "+2 days");
		assert!(serde_json::from_str::<ExpiryTime>("\"-2 days\"").is_err());
		assert_eq!(serde_json::to_string(&expiry).expect("Expiry should serialize."), "\"+2 days\"");
	}
}
