use axum::http::StatusCode;
use proptest::prelude::*;
use serde_json::json;

mod common;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Whatever name goes in comes back, under an id that does not drift.
    #[test]
    fn created_category_round_trips_through_listing(
        names in proptest::collection::vec("[A-Za-z0-9ñáéíóú ]{1,40}", 1..5)
    ) {
        runtime().block_on(async {
            let app = common::create_test_app().await;

            let mut created = Vec::new();
            for name in &names {
                let (status, body) = app.post("/categories", json!({"name": name})).await;
                prop_assert_eq!(status, StatusCode::OK);
                prop_assert_eq!(&body["name"], &json!(name));
                created.push(body);
            }

            for _ in 0..2 {
                let (status, list) = app.get("/categories").await;
                prop_assert_eq!(status, StatusCode::OK);
                prop_assert_eq!(&list, &json!(created));
            }
            Ok(())
        })?;
    }

    #[test]
    fn progress_is_sum_of_points(points in proptest::collection::vec(-1000i64..1000, 0..6)) {
        runtime().block_on(async {
            let app = common::create_test_app().await;
            app.post("/words", json!({"english": "run", "spanish": "correr"})).await;

            for p in &points {
                let (status, _) = app.put(&format!("/words/1/progress?points={p}"), None).await;
                prop_assert_eq!(status, StatusCode::OK);
            }

            let (_, words) = app.get("/words").await;
            prop_assert_eq!(&words[0]["progress"], &json!(points.iter().sum::<i64>()));
            Ok(())
        })?;
    }
}
