//! Request parameters and their validated forms.
//!
//! Every `*Params` struct is deserialized straight from the query string
//! with all fields optional, so axum never rejects a request on its own.
//! Converting into the typed query is where the error taxonomy applies.
//! Empty strings count as absent, which is what the dashboard's filter
//! forms send for untouched inputs.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{ datetime::parse_date, error::DashboardError, models::{ Order, Restaurant } };

const MAX_HOUR: u32 = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
	pub start: NaiveDate,
	pub end: NaiveDate,
}

impl DateRange {
	pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
		if start > end {
			return Err(DashboardError::InvalidRange { start, end });
		}
		Ok(Self { start, end })
	}

	pub fn contains(&self, date: NaiveDate) -> bool {
		self.start <= date && date <= self.end
	}

	fn from_params(
		start: &Option<String>,
		end: &Option<String>
	) -> Result<Self, DashboardError> {
		let start = required("start_date", start)?;
		let end = required("end_date", end)?;
		Self::new(parse_date("start_date", start)?, parse_date("end_date", end)?)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendParams {
	pub restaurant_id: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendQuery {
	pub restaurant_id: i64,
	pub range: DateRange,
}

impl TryFrom<TrendParams> for TrendQuery {
	type Error = DashboardError;

	fn try_from(params: TrendParams) -> Result<Self, Self::Error> {
		let restaurant_id = required("restaurant_id", &params.restaurant_id)?;
		required("start_date", &params.start_date)?;
		required("end_date", &params.end_date)?;

		Ok(Self {
			restaurant_id: parse_id("restaurant_id", restaurant_id)?,
			range: DateRange::from_params(&params.start_date, &params.end_date)?,
		})
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingParams {
	pub start_date: Option<String>,
	pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingQuery {
	pub range: DateRange,
}

impl TryFrom<RankingParams> for RankingQuery {
	type Error = DashboardError;

	fn try_from(params: RankingParams) -> Result<Self, Self::Error> {
		Ok(Self {
			range: DateRange::from_params(&params.start_date, &params.end_date)?,
		})
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilterParams {
	pub restaurant_id: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub min_amount: Option<String>,
	pub max_amount: Option<String>,
	pub start_hour: Option<String>,
	pub end_hour: Option<String>,
}

/// Independent, optional order predicates. `None` means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderFilter {
	pub restaurant_id: Option<i64>,
	pub start_date: Option<NaiveDate>,
	pub end_date: Option<NaiveDate>,
	pub min_amount: Option<f64>,
	pub max_amount: Option<f64>,
	pub start_hour: Option<u32>,
	pub end_hour: Option<u32>,
}

impl OrderFilter {
	pub fn matches(&self, order: &Order) -> bool {
		let hour = order.hour();

		self.restaurant_id.map_or(true, |id| order.restaurant_id == id) &&
			self.start_date.map_or(true, |start| order.order_date >= start) &&
			self.end_date.map_or(true, |end| order.order_date <= end) &&
			self.min_amount.map_or(true, |min| order.amount >= min) &&
			self.max_amount.map_or(true, |max| order.amount <= max) &&
			self.start_hour.map_or(true, |start| hour >= start) &&
			self.end_hour.map_or(true, |end| hour <= end)
	}

	/// The subset of this filter a store can push down into its reads.
	pub fn scope(&self) -> OrderScope {
		OrderScope {
			restaurant_id: self.restaurant_id,
			start_date: self.start_date,
			end_date: self.end_date,
		}
	}
}

impl TryFrom<OrderFilterParams> for OrderFilter {
	type Error = DashboardError;

	fn try_from(params: OrderFilterParams) -> Result<Self, Self::Error> {
		Ok(Self {
			restaurant_id: optional(&params.restaurant_id, |v| parse_id("restaurant_id", v))?,
			start_date: optional(&params.start_date, |v| parse_date("start_date", v))?,
			end_date: optional(&params.end_date, |v| parse_date("end_date", v))?,
			min_amount: optional(&params.min_amount, |v| parse_number("min_amount", v))?,
			max_amount: optional(&params.max_amount, |v| parse_number("max_amount", v))?,
			start_hour: optional(&params.start_hour, |v| parse_hour("start_hour", v))?,
			end_hour: optional(&params.end_hour, |v| parse_hour("end_hour", v))?,
		})
	}
}

/// Coarse order selection a store may apply while reading.
///
/// Report code re-applies its full predicate afterwards, so a store that
/// ignores some or all of the scope still produces correct reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderScope {
	pub restaurant_id: Option<i64>,
	pub start_date: Option<NaiveDate>,
	pub end_date: Option<NaiveDate>,
}

impl OrderScope {
	pub fn all() -> Self {
		Self::default()
	}

	pub fn between(range: DateRange) -> Self {
		Self { restaurant_id: None, start_date: Some(range.start), end_date: Some(range.end) }
	}

	pub fn for_restaurant(restaurant_id: i64, range: DateRange) -> Self {
		Self { restaurant_id: Some(restaurant_id), ..Self::between(range) }
	}

	pub fn matches(&self, order: &Order) -> bool {
		self.restaurant_id.map_or(true, |id| order.restaurant_id == id) &&
			self.start_date.map_or(true, |start| order.order_date >= start) &&
			self.end_date.map_or(true, |end| order.order_date <= end)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantParams {
	pub search: Option<String>,
	pub cuisine: Option<String>,
	pub city: Option<String>,
	/// Legacy name for `city`.
	pub location: Option<String>,
	pub min_rating: Option<String>,
	pub sort_by: Option<String>,
	pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
	Id,
	#[default]
	Name,
	Cuisine,
	City,
	Rating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
	#[default]
	Asc,
	Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantQuery {
	pub search: Option<String>,
	pub cuisine: Option<String>,
	pub city: Option<String>,
	pub min_rating: Option<f64>,
	pub sort_by: SortField,
	pub sort_order: SortOrder,
}

impl RestaurantQuery {
	pub fn matches(&self, restaurant: &Restaurant) -> bool {
		let search_hit = self.search.as_deref().map_or(true, |term| {
			let term = term.to_lowercase();
			restaurant.name.to_lowercase().contains(&term) ||
				restaurant.cuisine.to_lowercase().contains(&term)
		});

		search_hit &&
			self.cuisine.as_deref().map_or(true, |c| restaurant.cuisine == c) &&
			self.city.as_deref().map_or(true, |c| restaurant.city == c) &&
			self.min_rating.map_or(true, |min| restaurant.rating >= min)
	}
}

impl TryFrom<RestaurantParams> for RestaurantQuery {
	type Error = DashboardError;

	fn try_from(params: RestaurantParams) -> Result<Self, Self::Error> {
		let sort_by = match present(&params.sort_by).map(str::to_ascii_lowercase).as_deref() {
			None | Some("name") => SortField::Name,
			Some("id") => SortField::Id,
			Some("cuisine") => SortField::Cuisine,
			Some("city") | Some("location") => SortField::City,
			Some("rating") => SortField::Rating,
			Some(other) =>
				return Err(DashboardError::invalid("sort_by", format!("unknown field '{}'", other))),
		};

		let sort_order = match present(&params.sort_order).map(str::to_ascii_lowercase).as_deref() {
			None | Some("asc") => SortOrder::Asc,
			Some("desc") => SortOrder::Desc,
			Some(other) =>
				return Err(
					DashboardError::invalid("sort_order", format!("expected asc or desc, got '{}'", other))
				),
		};

		Ok(Self {
			search: present(&params.search).map(str::to_string),
			cuisine: present(&params.cuisine).map(str::to_string),
			city: present(&params.city).or(present(&params.location)).map(str::to_string),
			min_rating: optional(&params.min_rating, |v| parse_number("min_rating", v))?,
			sort_by,
			sort_order,
		})
	}
}

pub fn parse_id(field: &'static str, value: &str) -> Result<i64, DashboardError> {
	value
		.trim()
		.parse::<i64>()
		.map_err(|_| DashboardError::invalid(field, format!("'{}' is not an integer id", value)))
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, DashboardError> {
	match value.trim().parse::<f64>() {
		Ok(number) if number.is_finite() => Ok(number),
		_ => Err(DashboardError::invalid(field, format!("'{}' is not a number", value))),
	}
}

fn parse_hour(field: &'static str, value: &str) -> Result<u32, DashboardError> {
	match value.trim().parse::<u32>() {
		Ok(hour) if hour <= MAX_HOUR => Ok(hour),
		_ => Err(DashboardError::invalid(field, format!("'{}' is not an hour between 0 and 23", value))),
	}
}

fn present(value: &Option<String>) -> Option<&str> {
	value
		.as_deref()
		.map(str::trim)
		.filter(|v| !v.is_empty())
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, DashboardError> {
	present(value).ok_or(DashboardError::MissingParameter(field))
}

fn optional<T>(
	value: &Option<String>,
	parse: impl FnOnce(&str) -> Result<T, DashboardError>
) -> Result<Option<T>, DashboardError> {
	present(value).map(parse).transpose()
}
