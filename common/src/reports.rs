//! Request-level operations: read the snapshot a report needs from the
//! store, then hand it to the pure computations in `analytics`.

use tracing::{ debug, info };

use crate::{
	analytics::{ daily_trends, filter_orders, top_restaurants, TOP_RESTAURANTS_LIMIT },
	error::DashboardError,
	models::{ DailyTrend, EnrichedOrder, Restaurant, RevenueRanking },
	query::{ OrderFilter, OrderScope, RankingQuery, RestaurantQuery, TrendQuery },
	restaurants::list_restaurants,
	store::DataStore,
};

pub async fn restaurants<S: DataStore + ?Sized>(
	store: &S,
	query: &RestaurantQuery
) -> Result<Vec<Restaurant>, DashboardError> {
	let all = store.list_restaurants().await?;
	let listed = list_restaurants(&all, query);

	debug!(total = all.len(), listed = listed.len(), "Listed restaurants");
	Ok(listed)
}

pub async fn restaurant<S: DataStore + ?Sized>(
	store: &S,
	id: i64
) -> Result<Restaurant, DashboardError> {
	store
		.find_restaurant(id).await?
		.ok_or_else(|| DashboardError::NotFound(format!("Restaurant {}", id)))
}

pub async fn order_trends<S: DataStore + ?Sized>(
	store: &S,
	query: &TrendQuery
) -> Result<Vec<DailyTrend>, DashboardError> {
	restaurant(store, query.restaurant_id).await?;

	let orders = store.list_orders(&OrderScope::for_restaurant(query.restaurant_id, query.range)).await?;
	let trends = daily_trends(&orders, query.restaurant_id, query.range);

	info!(
		restaurant_id = query.restaurant_id,
		start = %query.range.start,
		end = %query.range.end,
		days = trends.len(),
		"Computed order trends"
	);
	Ok(trends)
}

pub async fn top_revenue<S: DataStore + ?Sized>(
	store: &S,
	query: &RankingQuery
) -> Result<Vec<RevenueRanking>, DashboardError> {
	let restaurants = store.list_restaurants().await?;
	let orders = store.list_orders(&OrderScope::between(query.range)).await?;
	let ranking = top_restaurants(&restaurants, &orders, query.range, TOP_RESTAURANTS_LIMIT);

	info!(
		start = %query.range.start,
		end = %query.range.end,
		candidates = restaurants.len(),
		"Computed top restaurants"
	);
	Ok(ranking)
}

pub async fn filtered_orders<S: DataStore + ?Sized>(
	store: &S,
	filter: &OrderFilter
) -> Result<Vec<EnrichedOrder>, DashboardError> {
	let restaurants = store.list_restaurants().await?;
	let orders = store.list_orders(&filter.scope()).await?;
	let listed = filter_orders(&restaurants, &orders, filter);

	info!(?filter, matched = listed.len(), "Filtered orders");
	Ok(listed)
}
