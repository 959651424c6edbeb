use std::{ path::Path, time::Duration };

use anyhow::Result;
use async_trait::async_trait;
use dashboard_common::{
	datetime::DATE_FORMAT,
	models::{ Dataset, Order, Restaurant },
	query::OrderScope,
	store::DataStore,
};
use rusqlite::{ params, params_from_iter, types::Value, OptionalExtension, Row };
use tokio_rusqlite::Connection as AsyncConnection;
use tracing::{ debug, info };

const RESTAURANT_COLUMNS: &str = "id, name, cuisine, address, city, rating, is_active";
const ORDER_COLUMNS: &str = "id, restaurant_id, order_date, order_time, amount, status";

pub struct SqliteStore {
	conn: AsyncConnection,
}

impl SqliteStore {
	pub async fn open(path: &Path) -> Result<Self> {
		// Create data directory if it doesn't exist
		if let Some(dir) = path.parent() {
			if !dir.as_os_str().is_empty() && !dir.exists() {
				std::fs::create_dir_all(dir)?;
			}
		}

		let conn = AsyncConnection::open(path).await?;
		conn.call(|conn| {
			let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
			debug!("SQLite journal_mode = {}", mode);
			conn.execute("PRAGMA synchronous = NORMAL", [])?;
			conn.busy_timeout(Duration::from_secs(5))?;
			Ok(())
		}).await?;

		let store = Self { conn };
		store.init().await?;
		Ok(store)
	}

	pub async fn open_in_memory() -> Result<Self> {
		let store = Self { conn: AsyncConnection::open_in_memory().await? };
		store.init().await?;
		Ok(store)
	}

	async fn init(&self) -> Result<()> {
		self.conn.call(|conn| {
			conn.execute(
				"CREATE TABLE IF NOT EXISTS restaurants (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    cuisine TEXT NOT NULL,
                    address TEXT,
                    city TEXT NOT NULL,
                    rating REAL NOT NULL,
                    is_active INTEGER NOT NULL DEFAULT 1
                )",
				[]
			)?;

			// Foreign keys stay unenforced: orders of unknown restaurants are
			// still listed, with a placeholder restaurant.
			conn.execute(
				"CREATE TABLE IF NOT EXISTS orders (
                    id INTEGER PRIMARY KEY,
                    restaurant_id INTEGER NOT NULL,
                    order_date TEXT NOT NULL,
                    order_time TEXT NOT NULL,
                    amount REAL NOT NULL,
                    status TEXT NOT NULL,
                    FOREIGN KEY (restaurant_id) REFERENCES restaurants (id)
                )",
				[]
			)?;

			conn.execute(
				"CREATE INDEX IF NOT EXISTS idx_orders_restaurant_id ON orders (restaurant_id)",
				[]
			)?;
			conn.execute("CREATE INDEX IF NOT EXISTS idx_orders_order_date ON orders (order_date)", [])?;

			Ok(())
		}).await?;

		Ok(())
	}

	pub async fn is_empty(&self) -> Result<bool> {
		let count = self.conn.call(|conn| {
			let count: i64 = conn.query_row("SELECT COUNT(*) FROM restaurants", [], |row| row.get(0))?;
			Ok(count)
		}).await?;

		Ok(count == 0)
	}

	/// Inserts the whole dataset in one transaction.
	pub async fn seed(&self, dataset: Dataset) -> Result<()> {
		let (restaurants, orders) = (dataset.restaurants.len(), dataset.orders.len());

		self.conn.call(move |conn| {
			let tx = conn.transaction()?;

			for restaurant in &dataset.restaurants {
				tx.execute(
					"INSERT INTO restaurants (id, name, cuisine, address, city, rating, is_active) VALUES (?, ?, ?, ?, ?, ?, ?)",
					params![
						restaurant.id,
						restaurant.name,
						restaurant.cuisine,
						restaurant.address,
						restaurant.city,
						restaurant.rating,
						restaurant.is_active
					]
				)?;
			}

			for order in &dataset.orders {
				tx.execute(
					"INSERT INTO orders (id, restaurant_id, order_date, order_time, amount, status) VALUES (?, ?, ?, ?, ?, ?)",
					params![
						order.id,
						order.restaurant_id,
						order.order_date,
						order.order_time,
						order.amount,
						order.status
					]
				)?;
			}

			tx.commit()?;
			Ok(())
		}).await?;

		info!(restaurants, orders, "Seeded SQLite store");
		Ok(())
	}
}

fn restaurant_from_row(row: &Row<'_>) -> rusqlite::Result<Restaurant> {
	Ok(Restaurant {
		id: row.get(0)?,
		name: row.get(1)?,
		cuisine: row.get(2)?,
		address: row.get(3)?,
		city: row.get(4)?,
		rating: row.get(5)?,
		is_active: row.get(6)?,
	})
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
	Ok(Order {
		id: row.get(0)?,
		restaurant_id: row.get(1)?,
		order_date: row.get(2)?,
		order_time: row.get(3)?,
		amount: row.get(4)?,
		status: row.get(5)?,
	})
}

/// WHERE clause and its parameters for an order scope.
fn scope_clause(scope: &OrderScope) -> (String, Vec<Value>) {
	let mut conditions = Vec::new();
	let mut values = Vec::new();

	if let Some(id) = scope.restaurant_id {
		conditions.push("restaurant_id = ?");
		values.push(Value::Integer(id));
	}
	if let Some(start) = scope.start_date {
		conditions.push("order_date >= ?");
		values.push(Value::Text(start.format(DATE_FORMAT).to_string()));
	}
	if let Some(end) = scope.end_date {
		conditions.push("order_date <= ?");
		values.push(Value::Text(end.format(DATE_FORMAT).to_string()));
	}

	if conditions.is_empty() {
		(String::new(), values)
	} else {
		(format!(" WHERE {}", conditions.join(" AND ")), values)
	}
}

#[async_trait]
impl DataStore for SqliteStore {
	fn store_name(&self) -> String {
		"SQLite".to_string()
	}

	async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
		let restaurants = self.conn.call(|conn| {
			let mut stmt = conn.prepare(
				&format!("SELECT {} FROM restaurants ORDER BY id", RESTAURANT_COLUMNS)
			)?;
			let restaurants = stmt
				.query_map([], restaurant_from_row)?
				.collect::<Result<Vec<_>, _>>()?;
			Ok(restaurants)
		}).await?;

		Ok(restaurants)
	}

	async fn find_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
		let restaurant = self.conn.call(move |conn| {
			let restaurant = conn
				.query_row(
					&format!("SELECT {} FROM restaurants WHERE id = ?", RESTAURANT_COLUMNS),
					[id],
					restaurant_from_row
				)
				.optional()?;
			Ok(restaurant)
		}).await?;

		Ok(restaurant)
	}

	async fn list_orders(&self, scope: &OrderScope) -> Result<Vec<Order>> {
		let (clause, values) = scope_clause(scope);
		let query = format!("SELECT {} FROM orders{} ORDER BY id", ORDER_COLUMNS, clause);

		let orders = self.conn.call(move |conn| {
			let mut stmt = conn.prepare(&query)?;
			let orders = stmt
				.query_map(params_from_iter(values.iter()), order_from_row)?
				.collect::<Result<Vec<_>, _>>()?;
			Ok(orders)
		}).await?;

		Ok(orders)
	}

	async fn counts(&self) -> Result<(usize, usize)> {
		let (restaurants, orders) = self.conn.call(|conn| {
			let restaurants: i64 = conn.query_row("SELECT COUNT(*) FROM restaurants", [], |row| row.get(0))?;
			let orders: i64 = conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
			Ok((restaurants, orders))
		}).await?;

		Ok((restaurants as usize, orders as usize))
	}
}
