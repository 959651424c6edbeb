use anyhow::Result;
use async_trait::async_trait;

use crate::{ models::{ Dataset, Order, Restaurant }, query::OrderScope };

#[async_trait]
pub trait DataStore: Send + Sync {
	/// Store name, used in the startup log
	fn store_name(&self) -> String;

	/// All restaurants in store order
	async fn list_restaurants(&self) -> Result<Vec<Restaurant>>;

	/// Single restaurant by id
	async fn find_restaurant(&self, id: i64) -> Result<Option<Restaurant>>;

	/// Orders in store order, optionally narrowed by `scope`
	async fn list_orders(&self, scope: &OrderScope) -> Result<Vec<Order>>;

	/// Record counts, logged at startup
	async fn counts(&self) -> Result<(usize, usize)> {
		let restaurants = self.list_restaurants().await?.len();
		let orders = self.list_orders(&OrderScope::all()).await?.len();
		Ok((restaurants, orders))
	}
}

/// Immutable snapshot held in memory, loaded from fixtures or generated.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	dataset: Dataset,
}

impl MemoryStore {
	pub fn new(dataset: Dataset) -> Self {
		Self { dataset }
	}
}

#[async_trait]
impl DataStore for MemoryStore {
	fn store_name(&self) -> String {
		"Memory".to_string()
	}

	async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
		Ok(self.dataset.restaurants.clone())
	}

	async fn find_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
		Ok(
			self.dataset.restaurants
				.iter()
				.find(|r| r.id == id)
				.cloned()
		)
	}

	async fn list_orders(&self, scope: &OrderScope) -> Result<Vec<Order>> {
		Ok(
			self.dataset.orders
				.iter()
				.filter(|o| scope.matches(o))
				.cloned()
				.collect()
		)
	}
}

#[cfg(test)]
mod tests {
	use chrono::{ NaiveDate, NaiveTime };

	use super::*;
	use crate::query::DateRange;

	fn date(s: &str) -> NaiveDate {
		NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
	}

	fn store() -> MemoryStore {
		let order = |id: i64, restaurant_id: i64, day: &str| Order {
			id,
			restaurant_id,
			order_date: date(day),
			order_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
			amount: 10.0,
			status: "completed".to_string(),
		};

		MemoryStore::new(Dataset {
			restaurants: vec![Restaurant {
				id: 7,
				name: "Biryani Blues".to_string(),
				cuisine: "Hyderabadi".to_string(),
				address: Some("12 MG Road".to_string()),
				city: "Hyderabad".to_string(),
				rating: 4.2,
				is_active: true,
			}],
			orders: vec![
				order(1, 7, "2024-01-01"),
				order(2, 8, "2024-01-02"),
				order(3, 7, "2024-01-03"),
				order(4, 7, "2024-02-01")
			],
		})
	}

	#[tokio::test]
	async fn scope_narrows_orders_in_store_order() {
		let store = store();
		let range = DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap();

		let ids = |orders: Vec<Order>| orders.into_iter().map(|o| o.id).collect::<Vec<_>>();

		assert_eq!(ids(store.list_orders(&OrderScope::all()).await.unwrap()), vec![1, 2, 3, 4]);
		assert_eq!(ids(store.list_orders(&OrderScope::between(range)).await.unwrap()), vec![1, 2, 3]);
		assert_eq!(
			ids(store.list_orders(&OrderScope::for_restaurant(7, range)).await.unwrap()),
			vec![1, 3]
		);
	}

	#[tokio::test]
	async fn finds_restaurants_by_id() {
		let store = store();
		assert_eq!(store.find_restaurant(7).await.unwrap().map(|r| r.city), Some("Hyderabad".into()));
		assert!(store.find_restaurant(8).await.unwrap().is_none());
		assert_eq!(store.counts().await.unwrap(), (1, 4));
	}
}
