use std::cmp::Ordering;

use crate::{ models::Restaurant, query::{ RestaurantQuery, SortField, SortOrder } };

/// Filters and sorts restaurants for the listing endpoint.
///
/// Text fields sort case-insensitively; equal keys keep store order.
pub fn list_restaurants(restaurants: &[Restaurant], query: &RestaurantQuery) -> Vec<Restaurant> {
	let mut listed: Vec<Restaurant> = restaurants
		.iter()
		.filter(|r| query.matches(r))
		.cloned()
		.collect();

	listed.sort_by(|a, b| {
		let ordering = compare(a, b, query.sort_by);
		match query.sort_order {
			SortOrder::Asc => ordering,
			SortOrder::Desc => ordering.reverse(),
		}
	});

	listed
}

fn compare(a: &Restaurant, b: &Restaurant, field: SortField) -> Ordering {
	match field {
		SortField::Id => a.id.cmp(&b.id),
		SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
		SortField::Cuisine => a.cuisine.to_lowercase().cmp(&b.cuisine.to_lowercase()),
		SortField::City => a.city.to_lowercase().cmp(&b.city.to_lowercase()),
		SortField::Rating => a.rating.total_cmp(&b.rating),
	}
}
