use axum::{
	body::{ to_bytes, Body },
	http::{ Request, StatusCode },
	Router,
};
use dashboard_common::{ fixtures::parse_fixtures, server::router, store::MemoryStore };
use serde_json::{ json, Value };
use tower::ServiceExt;

const RESTAURANTS: &str = r#"[
	{ "id": 1, "name": "Italian Bistro", "cuisine": "Italian", "city": "Bengaluru", "rating": 4.5 },
	{ "id": 2, "name": "Sushi Haven", "cuisine": "Japanese", "location": "Mumbai", "rating": 4.8 },
	{ "id": 3, "name": "Taco Fiesta", "cuisine": "Mexican", "city": "Bengaluru", "rating": 3.9 },
	{ "id": 4, "name": "Dragon Wok", "cuisine": "Chinese", "city": "Delhi", "rating": 4.1 }
]"#;

const ORDERS: &str = r#"[
	{ "id": 1, "restaurant_id": 1, "order_date": "2024-01-01", "order_time": "12:10:00", "amount": 20 },
	{ "id": 2, "restaurant_id": 1, "order_date": "2024-01-01", "order_time": "12:50:00", "amount": 10 },
	{ "id": 3, "restaurant_id": 1, "order_date": "2024-01-01", "order_time": "19:00:00", "amount": 5 },
	{ "id": 4, "restaurant_id": 2, "order_time": "2024-01-02T23:15:00.000Z", "order_amount": 300 },
	{ "id": 5, "restaurant_id": 4, "order_date": "2024-01-03", "order_time": "23:45:00", "amount": 300 },
	{ "id": 6, "restaurant_id": 3, "order_date": "2024-01-03", "order_time": "08:00:00", "amount": 50 },
	{ "id": 7, "restaurant_id": 1, "order_date": "2024-01-04", "order_time": "13:00:00", "amount": 65 },
	{ "id": 8, "restaurant_id": 42, "order_date": "2024-01-05", "order_time": "22:00:00", "amount": 9.99 }
]"#;

fn app() -> Router {
	router(MemoryStore::new(parse_fixtures(RESTAURANTS, ORDERS).unwrap()))
}

async fn get(uri: &str) -> (StatusCode, Value) {
	let response = app()
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();

	let status = response.status();
	let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
	(status, serde_json::from_slice(&bytes).unwrap())
}

fn ids(body: &Value) -> Vec<i64> {
	body.as_array()
		.unwrap()
		.iter()
		.map(|item| item["id"].as_i64().unwrap())
		.collect()
}

#[tokio::test]
async fn order_trends_report_daily_rows() {
	let (status, body) = get(
		"/api/analytics/order-trends?restaurant_id=1&start_date=2024-01-01&end_date=2024-01-31"
	).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		json!([
			{ "date": "2024-01-01", "orders_count": 3, "revenue": 35.0, "avg_order_value": 11.67, "peak_hour": "12" },
			{ "date": "2024-01-04", "orders_count": 1, "revenue": 65.0, "avg_order_value": 65.0, "peak_hour": "13" }
		])
	);
}

#[tokio::test]
async fn order_trends_validate_parameters() {
	let (status, body) = get("/api/analytics/order-trends?restaurant_id=1&start_date=2024-01-01").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "MISSING_PARAMETER");

	let (status, body) = get(
		"/api/analytics/order-trends?restaurant_id=1&start_date=2024-01-31&end_date=2024-01-01"
	).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "INVALID_RANGE");

	let (status, body) = get(
		"/api/analytics/order-trends?restaurant_id=1&start_date=yesterday&end_date=2024-01-01"
	).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "INVALID_INPUT");

	let (status, body) = get(
		"/api/analytics/order-trends?restaurant_id=99&start_date=2024-01-01&end_date=2024-01-31"
	).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn top_restaurants_rank_by_revenue_with_stable_ties() {
	let (status, body) = get("/api/analytics/top-restaurants?start_date=2024-01-01&end_date=2024-01-31").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), vec![2, 4, 1]);
	assert_eq!(body[0]["revenue"], 300.0);
	assert_eq!(body[0]["rating"], 4.8);
	assert_eq!(body[2]["revenue"], 100.0);
}

#[tokio::test]
async fn top_restaurants_require_both_dates() {
	let (status, body) = get("/api/analytics/top-restaurants?end_date=2024-01-31").await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "Missing required parameter: start_date");
}

#[tokio::test]
async fn filtered_orders_without_filters_list_everything() {
	let (status, body) = get("/api/analytics/filtered-orders").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), vec![8, 7, 5, 6, 4, 3, 2, 1]);
	assert_eq!(body[0]["restaurant"], json!({ "name": "Unknown Restaurant" }));
	assert_eq!(body[1]["restaurant"]["name"], "Italian Bistro");
	assert_eq!(body[4]["order_date"], "2024-01-02");
	assert_eq!(body[4]["order_time"], "23:15:00");
}

#[tokio::test]
async fn filtered_orders_apply_every_present_filter() {
	let (_, body) = get("/api/analytics/filtered-orders?start_hour=23&end_hour=23").await;
	assert_eq!(ids(&body), vec![5, 4]);

	let (_, body) = get(
		"/api/analytics/filtered-orders?restaurant_id=1&min_amount=10&max_amount=20&start_date=&end_hour="
	).await;
	assert_eq!(ids(&body), vec![2, 1]);

	let (status, body) = get("/api/analytics/filtered-orders?start_hour=25").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn restaurants_support_search_filters_and_sorting() {
	let (status, body) = get("/api/restaurants").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), vec![4, 1, 2, 3]);

	let (_, body) = get("/api/restaurants?search=i&city=Bengaluru&sort_by=rating&sort_order=desc").await;
	assert_eq!(ids(&body), vec![1, 3]);

	let (_, body) = get("/api/restaurants?location=Mumbai&min_rating=4.5").await;
	assert_eq!(ids(&body), vec![2]);

	let (status, _) = get("/api/restaurants?sort_by=revenue").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_restaurant_or_not_found() {
	let (status, body) = get("/api/restaurants/2").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["city"], "Mumbai");

	let (status, _) = get("/api/restaurants/77").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = get("/api/restaurants/abc").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}
