use chrono::NaiveDate;
use criterion::{ black_box, criterion_group, criterion_main, Criterion };
use dashboard_common::{
	analytics::{ daily_trends, filter_orders, top_restaurants, TOP_RESTAURANTS_LIMIT },
	config::DemoSettings,
	fixtures::generate_demo_dataset,
	query::{ DateRange, OrderFilter },
};

fn bench_reports(c: &mut Criterion) {
	let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
	let dataset = generate_demo_dataset(
		&(DemoSettings {
			restaurants: 50,
			orders: 100_000,
			start,
			days: 90,
			seed: 1,
		})
	).unwrap();
	let range = DateRange::new(start, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()).unwrap();

	c.bench_function("daily_trends", |b| {
		b.iter(|| daily_trends(black_box(&dataset.orders), 7, range))
	});

	c.bench_function("top_restaurants", |b| {
		b.iter(||
			top_restaurants(
				black_box(&dataset.restaurants),
				black_box(&dataset.orders),
				range,
				TOP_RESTAURANTS_LIMIT
			)
		)
	});

	let filter = OrderFilter {
		min_amount: Some(20.0),
		start_hour: Some(11),
		end_hour: Some(14),
		..Default::default()
	};
	c.bench_function("filter_orders", |b| {
		b.iter(|| filter_orders(black_box(&dataset.restaurants), black_box(&dataset.orders), &filter))
	});
}

criterion_group!(benches, bench_reports);
criterion_main!(benches);
