//! Report computations.
//!
//! Everything here is a pure function of the order and restaurant snapshots
//! passed in. Stores only decide how those snapshots are read.

use std::collections::{ BTreeMap, HashMap };

use chrono::NaiveDate;

use crate::{
	models::{ DailyTrend, EnrichedOrder, Order, Restaurant, RestaurantSummary, RevenueRanking },
	query::{ DateRange, OrderFilter },
};

pub const TOP_RESTAURANTS_LIMIT: usize = 3;

/// Rounds half away from zero to two decimal places.
///
/// Cents are first settled to 1e-6 so amounts whose binary form sits just
/// under a half (2.675 is stored as 2.67499...) round up like their decimal.
pub fn round_currency(value: f64) -> f64 {
	let cents = ((value * 100.0) * 1e6).round() / 1e6;
	cents.round() / 100.0
}

/// Per-day order count, revenue, average ticket and peak hour for one
/// restaurant, ascending by date. Days without orders are omitted.
pub fn daily_trends(orders: &[Order], restaurant_id: i64, range: DateRange) -> Vec<DailyTrend> {
	let mut by_date: BTreeMap<NaiveDate, Vec<&Order>> = BTreeMap::new();

	for order in orders {
		if order.restaurant_id == restaurant_id && range.contains(order.order_date) {
			by_date.entry(order.order_date).or_default().push(order);
		}
	}

	by_date
		.into_iter()
		.map(|(date, day_orders)| {
			let orders_count = day_orders.len();
			let revenue = round_currency(day_orders
				.iter()
				.map(|o| o.amount)
				.sum());
			let avg_order_value = if orders_count > 0 {
				round_currency(revenue / (orders_count as f64))
			} else {
				0.0
			};

			DailyTrend {
				date,
				orders_count,
				revenue,
				avg_order_value,
				peak_hour: format!("{:02}", peak_hour(&day_orders)),
			}
		})
		.collect()
}

/// Hour with the most orders. Hours are kept in the order they are first
/// seen and only a strictly larger count displaces the current leader, so
/// ties go to whichever hour appeared first, not to the lowest hour.
fn peak_hour(orders: &[&Order]) -> u32 {
	let mut buckets: Vec<(u32, usize)> = Vec::new();

	for order in orders {
		let hour = order.hour();
		match buckets.iter_mut().find(|(h, _)| *h == hour) {
			Some((_, count)) => {
				*count += 1;
			}
			None => buckets.push((hour, 1)),
		}
	}

	let mut peak: Option<(u32, usize)> = None;
	for (hour, count) in buckets {
		if peak.map_or(true, |(_, best)| count > best) {
			peak = Some((hour, count));
		}
	}

	peak.map(|(hour, _)| hour).unwrap_or(0)
}

/// Highest-earning restaurants in the range, at most `limit` of them.
///
/// Every restaurant takes part, including those with no orders in range
/// (revenue 0). Equal revenues keep the restaurants' input order.
pub fn top_restaurants(
	restaurants: &[Restaurant],
	orders: &[Order],
	range: DateRange,
	limit: usize
) -> Vec<RevenueRanking> {
	let mut totals: HashMap<i64, f64> = HashMap::new();
	for order in orders.iter().filter(|o| range.contains(o.order_date)) {
		*totals.entry(order.restaurant_id).or_insert(0.0) += order.amount;
	}

	let mut ranking: Vec<RevenueRanking> = restaurants
		.iter()
		.map(|restaurant| RevenueRanking {
			id: restaurant.id,
			name: restaurant.name.clone(),
			rating: restaurant.rating,
			revenue: round_currency(totals.get(&restaurant.id).copied().unwrap_or(0.0)),
		})
		.collect();

	// sort_by is stable
	ranking.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
	ranking.truncate(limit);
	ranking
}

/// Orders matching every present filter, newest first, each joined with
/// its restaurant.
pub fn filter_orders(
	restaurants: &[Restaurant],
	orders: &[Order],
	filter: &OrderFilter
) -> Vec<EnrichedOrder> {
	let by_id: HashMap<i64, &Restaurant> = restaurants
		.iter()
		.map(|r| (r.id, r))
		.collect();

	let mut matched: Vec<&Order> = orders
		.iter()
		.filter(|order| filter.matches(order))
		.collect();

	matched.sort_by(|a, b| {
		b.order_date.cmp(&a.order_date).then_with(|| b.order_time.cmp(&a.order_time))
	});

	matched
		.into_iter()
		.map(|order| {
			let summary = by_id
				.get(&order.restaurant_id)
				.map(|r| RestaurantSummary::from(*r))
				.unwrap_or_else(RestaurantSummary::unknown);
			EnrichedOrder::new(order, summary)
		})
		.collect()
}
