//! Per-request context
//!
//! The acting user and organization settings are passed explicitly into
//! every engine operation. Nothing here is thread-local or ambient, which
//! keeps timezone-dependent formatting and audit attribution deterministic
//! under test.

use crate::ids::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Organization-wide settings that affect rendering and formatting.
#[derive(Debug, Clone)]
pub struct OrganizationSettings {
	/// Display name of the organization
	pub name: String,
	/// Public website URL
	pub website_url: String,
	/// Timezone dates and datetimes are rendered in
	pub timezone: Tz,
	/// `chrono` format string for date-only values
	pub date_format: String,
	/// `chrono` format string for datetime values
	pub datetime_format: String,
}

impl Default for OrganizationSettings {
	fn default() -> Self {
		Self {
			name: String::new(),
			website_url: String::new(),
			timezone: Tz::UTC,
			date_format: "%Y-%m-%d".to_string(),
			datetime_format: "%Y-%m-%d %H:%M".to_string(),
		}
	}
}

impl OrganizationSettings {
	/// Render a date-only value with the organization's date format.
	pub fn format_date(&self, date: NaiveDate) -> String {
		date.format(&self.date_format).to_string()
	}

	/// Render an instant in the organization's timezone and datetime format.
	pub fn format_datetime(&self, instant: DateTime<Utc>) -> String {
		instant
			.with_timezone(&self.timezone)
			.format(&self.datetime_format)
			.to_string()
	}
}

/// Context for one engine operation: who is acting, under which organization.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
	/// The acting user, absent for system-initiated operations
	pub user_id: Option<UserId>,
	/// Organization settings in effect for this request
	pub organization: OrganizationSettings,
}

impl RequestContext {
	/// A context with no acting user and default organization settings.
	pub fn system() -> Self {
		Self::default()
	}

	/// A context acting as the given user.
	pub fn for_user(user_id: UserId) -> Self {
		Self {
			user_id: Some(user_id),
			organization: OrganizationSettings::default(),
		}
	}

	/// Replace the organization settings.
	pub fn with_organization(mut self, organization: OrganizationSettings) -> Self {
		self.organization = organization;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use rstest::rstest;

	#[rstest]
	fn test_format_date_uses_org_format() {
		let org = OrganizationSettings {
			date_format: "%d/%m/%Y".to_string(),
			..Default::default()
		};
		let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
		assert_eq!(org.format_date(date), "09/03/2024");
	}

	#[rstest]
	fn test_format_datetime_converts_timezone() {
		let org = OrganizationSettings {
			timezone: chrono_tz::America::New_York,
			datetime_format: "%Y-%m-%d %H:%M".to_string(),
			..Default::default()
		};
		// 15:00 UTC in winter is 10:00 in New York
		let instant = Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap();
		assert_eq!(org.format_datetime(instant), "2024-01-15 10:00");
	}
}
