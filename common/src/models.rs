use chrono::{ NaiveDate, NaiveTime, Timelike };
use serde::{ Deserialize, Serialize };

pub const DEFAULT_ORDER_STATUS: &str = "completed";
pub const UNKNOWN_RESTAURANT: &str = "Unknown Restaurant";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
	pub id: i64,
	pub name: String,
	pub cuisine: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	pub city: String,
	pub rating: f64,
	pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	pub id: i64,
	pub restaurant_id: i64,
	pub order_date: NaiveDate,
	pub order_time: NaiveTime,
	pub amount: f64,
	pub status: String,
}

impl Order {
	pub fn hour(&self) -> u32 {
		self.order_time.hour()
	}
}

/// One row of the order trends report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
	pub date: NaiveDate,
	pub orders_count: usize,
	pub revenue: f64,
	pub avg_order_value: f64,
	/// Two-digit hour, "00" through "23".
	pub peak_hour: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRanking {
	pub id: i64,
	pub name: String,
	pub rating: f64,
	pub revenue: f64,
}

/// The part of a restaurant embedded in each filtered order.
///
/// Only `name` is present when the owning restaurant could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSummary {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cuisine: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating: Option<f64>,
}

impl RestaurantSummary {
	pub fn unknown() -> Self {
		Self {
			id: None,
			name: UNKNOWN_RESTAURANT.to_string(),
			cuisine: None,
			city: None,
			rating: None,
		}
	}
}

impl From<&Restaurant> for RestaurantSummary {
	fn from(restaurant: &Restaurant) -> Self {
		Self {
			id: Some(restaurant.id),
			name: restaurant.name.clone(),
			cuisine: Some(restaurant.cuisine.clone()),
			city: Some(restaurant.city.clone()),
			rating: Some(restaurant.rating),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
	pub id: i64,
	pub restaurant_id: i64,
	pub order_date: NaiveDate,
	pub order_time: NaiveTime,
	pub amount: f64,
	pub status: String,
	pub restaurant: RestaurantSummary,
}

impl EnrichedOrder {
	pub fn new(order: &Order, restaurant: RestaurantSummary) -> Self {
		Self {
			id: order.id,
			restaurant_id: order.restaurant_id,
			order_date: order.order_date,
			order_time: order.order_time,
			amount: order.amount,
			status: order.status.clone(),
			restaurant,
		}
	}
}

/// Both collections a report is computed from, in store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
	pub restaurants: Vec<Restaurant>,
	pub orders: Vec<Order>,
}
