//! Loading the JSON fixture files and generating demo data.
//!
//! Fixture files predate the canonical schema, so records accept the older
//! field names (`order_amount`, `location`) and ISO timestamps in
//! `order_time`. Everything past this module sees only canonical models.

use std::{ collections::HashSet, fs, path::Path };

use anyhow::{ anyhow, bail, Context, Result };
use chrono::{ Duration, NaiveTime };
use rand::{ rngs::StdRng, Rng, SeedableRng };
use serde::Deserialize;
use tracing::info;

use crate::{
	config::DemoSettings,
	datetime::normalize_order_moment,
	models::{ Dataset, Order, Restaurant, DEFAULT_ORDER_STATUS },
};

pub const RESTAURANTS_FILE: &str = "restaurants.json";
pub const ORDERS_FILE: &str = "orders.json";

const MAX_RATING: f64 = 5.0;

#[derive(Debug, Deserialize)]
struct RestaurantRecord {
	id: i64,
	name: String,
	cuisine: String,
	#[serde(default)]
	address: Option<String>,
	#[serde(alias = "location")]
	city: String,
	rating: f64,
	#[serde(default = "active_by_default")]
	is_active: bool,
}

fn active_by_default() -> bool {
	true
}

#[derive(Debug, Deserialize)]
struct OrderRecord {
	#[serde(default)]
	id: Option<i64>,
	restaurant_id: i64,
	#[serde(default)]
	order_date: Option<String>,
	order_time: String,
	#[serde(alias = "order_amount")]
	amount: f64,
	#[serde(default)]
	status: Option<String>,
}

fn to_restaurant(record: RestaurantRecord) -> Result<Restaurant> {
	if !(0.0..=MAX_RATING).contains(&record.rating) {
		bail!("restaurant {}: rating {} is outside 0-5", record.id, record.rating);
	}

	Ok(Restaurant {
		id: record.id,
		name: record.name,
		cuisine: record.cuisine,
		address: record.address,
		city: record.city,
		rating: record.rating,
		is_active: record.is_active,
	})
}

fn to_order(position: usize, record: OrderRecord) -> Result<Order> {
	let id = record.id.unwrap_or((position as i64) + 1);

	if !record.amount.is_finite() || record.amount < 0.0 {
		bail!("order {}: amount {} must be a non-negative number", id, record.amount);
	}

	let (order_date, order_time) = normalize_order_moment(
		record.order_date.as_deref(),
		&record.order_time
	).map_err(|e| anyhow!("order {}: {}", id, e))?;

	Ok(Order {
		id,
		restaurant_id: record.restaurant_id,
		order_date,
		order_time,
		amount: record.amount,
		status: record.status.unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string()),
	})
}

/// Parses the contents of the two fixture files.
pub fn parse_fixtures(restaurants_json: &str, orders_json: &str) -> Result<Dataset> {
	let restaurant_records: Vec<RestaurantRecord> = serde_json
		::from_str(restaurants_json)
		.context("Failed to parse restaurant fixtures")?;
	let order_records: Vec<OrderRecord> = serde_json
		::from_str(orders_json)
		.context("Failed to parse order fixtures")?;

	let restaurants = restaurant_records
		.into_iter()
		.map(to_restaurant)
		.collect::<Result<Vec<_>>>()?;

	let orders = order_records
		.into_iter()
		.enumerate()
		.map(|(position, record)| to_order(position, record))
		.collect::<Result<Vec<_>>>()?;

	ensure_unique_ids("restaurant", restaurants.iter().map(|r| r.id))?;
	ensure_unique_ids("order", orders.iter().map(|o| o.id))?;

	Ok(Dataset { restaurants, orders })
}

/// Ids key every lookup and the SQLite primary keys, so a repeat is fatal.
fn ensure_unique_ids(kind: &str, ids: impl Iterator<Item = i64>) -> Result<()> {
	let mut seen = HashSet::new();
	for id in ids {
		if !seen.insert(id) {
			bail!("{} {}: duplicate id", kind, id);
		}
	}
	Ok(())
}

pub fn load_fixtures(dir: &Path) -> Result<Dataset> {
	let restaurants_path = dir.join(RESTAURANTS_FILE);
	let orders_path = dir.join(ORDERS_FILE);

	let restaurants_json = fs
		::read_to_string(&restaurants_path)
		.with_context(|| format!("Failed to read {}", restaurants_path.display()))?;
	let orders_json = fs
		::read_to_string(&orders_path)
		.with_context(|| format!("Failed to read {}", orders_path.display()))?;

	parse_fixtures(&restaurants_json, &orders_json)
}

/// Fixtures from `dir` when it holds them, otherwise generated demo data.
pub fn load_or_generate(dir: &Path, demo: &DemoSettings) -> Result<Dataset> {
	if dir.join(RESTAURANTS_FILE).exists() {
		info!("Loading fixtures from {}", dir.display());
		return load_fixtures(dir);
	}

	info!(
		restaurants = demo.restaurants,
		orders = demo.orders,
		seed = demo.seed,
		"No fixtures in {}, generating demo data",
		dir.display()
	);
	generate_demo_dataset(demo)
}

const NAMES: [&str; 10] = [
	"Spice Route",
	"Sushi Haven",
	"Italian Bistro",
	"Taco Fiesta",
	"Dragon Wok",
	"Le Petit Cafe",
	"Burger Barn",
	"Olive Grove",
	"Curry House",
	"Seoul Kitchen",
];
const CUISINES: [&str; 10] = [
	"Indian",
	"Japanese",
	"Italian",
	"Mexican",
	"Chinese",
	"French",
	"American",
	"Mediterranean",
	"Indian",
	"Korean",
];
const CITIES: [&str; 5] = ["Bengaluru", "Mumbai", "Delhi", "Hyderabad", "Chennai"];

const FIRST_HOUR: u32 = 8;
const LAST_HOUR: u32 = 22;

/// Reproducible dataset for running without fixture files.
pub fn generate_demo_dataset(settings: &DemoSettings) -> Result<Dataset> {
	let mut rng = StdRng::seed_from_u64(settings.seed);

	let restaurants: Vec<Restaurant> = (0..settings.restaurants)
		.map(|i| generate_random_restaurant(&mut rng, i))
		.collect();

	let mut orders: Vec<Order> = Vec::with_capacity(settings.orders);
	if !restaurants.is_empty() {
		for i in 0..settings.orders {
			let restaurant_id = restaurants[rng.gen_range(0..restaurants.len())].id;
			orders.push(generate_random_order(&mut rng, (i as i64) + 1, restaurant_id, settings)?);
		}
	}

	Ok(Dataset { restaurants, orders })
}

fn generate_random_restaurant(rng: &mut impl Rng, index: usize) -> Restaurant {
	let slot = index % NAMES.len();
	let name = if index < NAMES.len() {
		NAMES[slot].to_string()
	} else {
		format!("{} {}", NAMES[slot], index / NAMES.len() + 1)
	};

	Restaurant {
		id: (index as i64) + 1,
		name,
		cuisine: CUISINES[slot].to_string(),
		address: Some(format!("{} Main Street", rng.gen_range(1..300))),
		city: CITIES[rng.gen_range(0..CITIES.len())].to_string(),
		rating: (rng.gen_range(30..=50) as f64) / 10.0,
		is_active: rng.gen_bool(0.9),
	}
}

fn generate_random_order(
	rng: &mut impl Rng,
	id: i64,
	restaurant_id: i64,
	settings: &DemoSettings
) -> Result<Order> {
	let day_offset = rng.gen_range(0..settings.days.max(1));
	let order_date = settings.start
		.checked_add_signed(Duration::days(day_offset as i64))
		.ok_or_else(|| {
			anyhow!(
				"DASHBOARD_DEMO_START {} plus {} days is past the last representable date",
				settings.start,
				settings.days
			)
		})?;
	let order_time = NaiveTime::from_hms_opt(
		rng.gen_range(FIRST_HOUR..=LAST_HOUR),
		rng.gen_range(0..60),
		rng.gen_range(0..60)
	).unwrap_or_default();

	Ok(Order {
		id,
		restaurant_id,
		order_date,
		order_time,
		amount: (rng.gen_range(500..=12_000) as f64) / 100.0,
		status: DEFAULT_ORDER_STATUS.to_string(),
	})
}
