use std::{ sync::Arc, time::Duration };

use anyhow::Result;
use axum::{
	extract::{ Path, Query, State },
	http::{ header::CONTENT_TYPE, Method },
	routing::get,
	Json,
	Router,
};
use tokio::{ net::TcpListener, signal };
use tower_http::cors::{ Any, CorsLayer };
use tracing::info;
use tracing_subscriber::{ fmt, EnvFilter };

use crate::{
	config::Config,
	error::DashboardError,
	models::{ DailyTrend, EnrichedOrder, Restaurant, RevenueRanking },
	query::{
		OrderFilter,
		OrderFilterParams,
		RankingParams,
		RankingQuery,
		RestaurantParams,
		RestaurantQuery,
		TrendParams,
		TrendQuery,
	},
	reports,
	store::DataStore,
};

// Shared state for the API
pub struct AppState<T: DataStore + 'static> {
	pub store: Arc<T>,
}

/// Installs the global subscriber. `RUST_LOG`, from the environment or
/// `.env`, overrides the `info` default.
pub fn init_tracing() {
	// .env has to be in the environment before the filter reads RUST_LOG
	let dotenv = dotenvy::dotenv();
	fmt().with_env_filter(log_filter()).init();

	match dotenv {
		Ok(path) => info!("Loaded {}", path.display()),
		Err(e) => info!("No .env file loaded: {e}"),
	}
}

fn log_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn router<T: DataStore + 'static>(store: T) -> Router {
	let state = Arc::new(AppState { store: Arc::new(store) });

	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::GET, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE])
		.max_age(Duration::from_secs(60 * 60));

	let api = Router::new()
		.route("/restaurants", get(list_restaurants_handler::<T>))
		.route("/restaurants/:id", get(show_restaurant_handler::<T>))
		.route("/analytics/order-trends", get(order_trends_handler::<T>))
		.route("/analytics/top-restaurants", get(top_restaurants_handler::<T>))
		.route("/analytics/filtered-orders", get(filtered_orders_handler::<T>));

	Router::new()
		.route("/", get(root_handler))
		.nest("/api", api)
		.layer(cors)
		.with_state(state)
}

// Run the API server with the provided store
pub async fn run_server<T: DataStore + 'static>(store: T, config: &Config) -> Result<()> {
	let (restaurants, orders) = store.counts().await?;
	info!(store = %store.store_name(), restaurants, orders, "Store ready");

	let app = router(store);

	let address = config.address();
	let listener = TcpListener::bind(&address).await?;
	info!("Server listening on {}", address);

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

	info!("Server stopped");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if signal::ctrl_c().await.is_ok() {
			info!("Received Ctrl+C, shutting down");
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
				info!("Received terminate signal, shutting down");
			}
			Err(_) => std::future::pending::<()>().await,
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}

// Root handler
async fn root_handler() -> &'static str {
	"Restaurant analytics API. See /api/restaurants and /api/analytics/*."
}

async fn list_restaurants_handler<T: DataStore + 'static>(
	State(state): State<Arc<AppState<T>>>,
	Query(params): Query<RestaurantParams>
) -> Result<Json<Vec<Restaurant>>, DashboardError> {
	let query = RestaurantQuery::try_from(params)?;
	Ok(Json(reports::restaurants(state.store.as_ref(), &query).await?))
}

async fn show_restaurant_handler<T: DataStore + 'static>(
	State(state): State<Arc<AppState<T>>>,
	Path(id): Path<String>
) -> Result<Json<Restaurant>, DashboardError> {
	// A non-numeric id cannot name any restaurant.
	let id = id
		.parse::<i64>()
		.map_err(|_| DashboardError::NotFound(format!("Restaurant {}", id)))?;
	Ok(Json(reports::restaurant(state.store.as_ref(), id).await?))
}

async fn order_trends_handler<T: DataStore + 'static>(
	State(state): State<Arc<AppState<T>>>,
	Query(params): Query<TrendParams>
) -> Result<Json<Vec<DailyTrend>>, DashboardError> {
	let query = TrendQuery::try_from(params)?;
	Ok(Json(reports::order_trends(state.store.as_ref(), &query).await?))
}

async fn top_restaurants_handler<T: DataStore + 'static>(
	State(state): State<Arc<AppState<T>>>,
	Query(params): Query<RankingParams>
) -> Result<Json<Vec<RevenueRanking>>, DashboardError> {
	let query = RankingQuery::try_from(params)?;
	Ok(Json(reports::top_revenue(state.store.as_ref(), &query).await?))
}

async fn filtered_orders_handler<T: DataStore + 'static>(
	State(state): State<Arc<AppState<T>>>,
	Query(params): Query<OrderFilterParams>
) -> Result<Json<Vec<EnrichedOrder>>, DashboardError> {
	let filter = OrderFilter::try_from(params)?;
	Ok(Json(reports::filtered_orders(state.store.as_ref(), &filter).await?))
}
