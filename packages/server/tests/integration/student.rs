use serde_json::json;

use crate::common::{TestApp, routes};

mod student_crud {
    use super::*;

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let app = TestApp::spawn().await;
        let faculty_id = app.create_faculty("Gryffindor", "red").await;

        let res = app
            .post(
                routes::STUDENT,
                &json!({ "name": "Harry", "age": 17, "faculty_id": faculty_id }),
            )
            .await;
        assert_eq!(res.status, 200);
        let id = res.id();

        let fetched = app.get(&routes::student(id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["name"], "Harry");
        assert_eq!(fetched.body["age"], 17);
        assert_eq!(fetched.body["faculty_id"], faculty_id);
    }

    #[tokio::test]
    async fn faculty_is_optional() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::STUDENT, &json!({ "name": "Luna", "age": 16 }))
            .await;
        assert_eq!(res.status, 200);
        assert!(res.body["faculty_id"].is_null());
    }

    #[tokio::test]
    async fn name_is_trimmed() {
        let app = TestApp::spawn().await;
        let id = app.create_student("  Neville  ", 17, None).await;

        let res = app.get(&routes::student(id)).await;
        assert_eq!(res.body["name"], "Neville");
    }

    #[tokio::test]
    async fn create_with_unknown_faculty_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::STUDENT,
                &json!({ "name": "Cedric", "age": 17, "faculty_id": 999 }),
            )
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn invalid_payloads_are_rejected() {
        let app = TestApp::spawn().await;

        let empty_name = app
            .post(routes::STUDENT, &json!({ "name": "   ", "age": 17 }))
            .await;
        assert_eq!(empty_name.status, 400);
        assert_eq!(empty_name.body["code"], "VALIDATION_ERROR");

        let negative_age = app
            .post(routes::STUDENT, &json!({ "name": "Draco", "age": -1 }))
            .await;
        assert_eq!(negative_age.status, 400);

        let long_name = app
            .post(routes::STUDENT, &json!({ "name": "x".repeat(257), "age": 1 }))
            .await;
        assert_eq!(long_name.status, 400);

        let malformed = app.post_raw(routes::STUDENT, "{\"name\": ").await;
        assert_eq!(malformed.status, 400);
        assert_eq!(malformed.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn update_replaces_name_and_age_only() {
        let app = TestApp::spawn().await;
        let faculty_id = app.create_faculty("Hufflepuff", "yellow").await;
        let id = app.create_student("Ced", 16, Some(faculty_id)).await;

        let res = app
            .put(&routes::student(id), &json!({ "name": "Cedric", "age": 17 }))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["name"], "Cedric");
        assert_eq!(res.body["age"], 17);
        assert_eq!(res.body["faculty_id"], faculty_id);
    }

    #[tokio::test]
    async fn update_missing_student_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .put(&routes::student(42), &json!({ "name": "Nobody", "age": 1 }))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn delete_returns_deleted_student() {
        let app = TestApp::spawn().await;
        let id = app.create_student("Ron", 17, None).await;

        let res = app.delete(&routes::student(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Ron");

        assert_eq!(app.get(&routes::student(id)).await.status, 404);
        assert_eq!(app.delete(&routes::student(id)).await.status, 404);
    }

    #[tokio::test]
    async fn get_missing_student_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::student(1)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "Student not found");
    }

    #[tokio::test]
    async fn list_and_statistics_for_two_students() {
        let app = TestApp::spawn().await;
        app.create_student("Ivan", 20, None).await;
        app.create_student("Sergey", 25, None).await;

        let list = app.get(routes::STUDENT).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.pluck("name"), vec![json!("Ivan"), json!("Sergey")]);

        let avg = app.get(routes::STUDENT_AVERAGE_AGE).await;
        assert_eq!(avg.status, 200);
        assert_eq!(avg.body.as_f64().unwrap(), 22.5);

        let count = app.get(routes::STUDENT_COUNT).await;
        assert_eq!(count.status, 200);
        assert_eq!(count.body, json!(2));
    }
}

mod student_filters {
    use super::*;

    #[tokio::test]
    async fn filtered_by_exact_age_in_id_order() {
        let app = TestApp::spawn().await;
        let a = app.create_student("A", 20, None).await;
        app.create_student("B", 21, None).await;
        let c = app.create_student("C", 20, None).await;

        let res = app.get(&routes::student_filtered(20)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.pluck("id"), vec![json!(a), json!(c)]);
    }

    #[tokio::test]
    async fn filtered_requires_age() {
        let app = TestApp::spawn().await;

        let res = app.get("/student/filtered").await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app.get("/student/filtered?age=old").await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn age_between_is_inclusive() {
        let app = TestApp::spawn().await;
        for (name, age) in [("A", 17), ("B", 18), ("C", 19), ("D", 20), ("E", 21)] {
            app.create_student(name, age, None).await;
        }

        let res = app.get(&routes::student_age_between(18, 20)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.pluck("name"), vec![json!("B"), json!("C"), json!("D")]);
    }

    #[tokio::test]
    async fn age_between_with_inverted_bounds_is_empty() {
        let app = TestApp::spawn().await;
        app.create_student("A", 19, None).await;

        let res = app.get(&routes::student_age_between(20, 18)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn by_faculty_lists_its_students() {
        let app = TestApp::spawn().await;
        let gryffindor = app.create_faculty("Gryffindor", "red").await;
        let slytherin = app.create_faculty("Slytherin", "green").await;
        app.create_student("Harry", 17, Some(gryffindor)).await;
        app.create_student("Draco", 17, Some(slytherin)).await;
        app.create_student("Hermione", 17, Some(gryffindor)).await;

        let res = app.get(&routes::student_by_faculty(gryffindor)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.pluck("name"), vec![json!("Harry"), json!("Hermione")]);
    }

    #[tokio::test]
    async fn by_faculty_unknown_faculty_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::student_by_faculty(77)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn names_starting_with_ignores_ascii_case() {
        let app = TestApp::spawn().await;
        app.create_student("Harry", 17, None).await;
        app.create_student("ron", 17, None).await;
        app.create_student("hannah", 16, None).await;

        let res = app.get(&routes::student_names_starting_with("h")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!(["Harry", "hannah"]));
    }

    #[tokio::test]
    async fn names_starting_with_requires_single_letter() {
        let app = TestApp::spawn().await;

        assert_eq!(app.get(&routes::student_names_starting_with("ab")).await.status, 400);
        assert_eq!(app.get(&routes::student_names_starting_with("")).await.status, 400);
    }
}

mod student_statistics {
    use super::*;

    #[tokio::test]
    async fn count_of_empty_table_is_zero() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::STUDENT_COUNT).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!(0));
    }

    #[tokio::test]
    async fn average_variants_agree() {
        let app = TestApp::spawn().await;
        for (name, age) in [("A", 20), ("B", 24), ("C", 20)] {
            app.create_student(name, age, None).await;
        }

        let db = app.get(routes::STUDENT_AVERAGE_AGE).await;
        let computed = app.get(routes::STUDENT_AVERAGE_AGE_COMPUTED).await;
        assert_eq!(db.status, 200);
        assert_eq!(computed.status, 200);

        let db = db.body.as_f64().unwrap();
        let computed = computed.body.as_f64().unwrap();
        assert!((db - 64.0 / 3.0).abs() < 1e-9, "got {db}");
        assert!((computed - 64.0 / 3.0).abs() < 1e-9, "got {computed}");
    }

    #[tokio::test]
    async fn averages_of_empty_table_are_404() {
        let app = TestApp::spawn().await;

        for route in [routes::STUDENT_AVERAGE_AGE, routes::STUDENT_AVERAGE_AGE_COMPUTED] {
            let res = app.get(route).await;
            assert_eq!(res.status, 404, "{route}");
            assert_eq!(res.body["message"], "No students to average");
        }
    }

    #[tokio::test]
    async fn last_five_newest_first() {
        let app = TestApp::spawn().await;
        let mut ids = Vec::new();
        for i in 0..7 {
            ids.push(app.create_student(&format!("S{i}"), 18, None).await);
        }

        let res = app.get(routes::STUDENT_LAST_FIVE).await;
        assert_eq!(res.status, 200);
        let expected: Vec<_> = ids.iter().rev().take(5).map(|id| json!(id)).collect();
        assert_eq!(res.pluck("id"), expected);
    }

    #[tokio::test]
    async fn last_five_with_fewer_students() {
        let app = TestApp::spawn().await;
        let a = app.create_student("A", 18, None).await;
        let b = app.create_student("B", 18, None).await;

        let res = app.get(routes::STUDENT_LAST_FIVE).await;
        assert_eq!(res.pluck("id"), vec![json!(b), json!(a)]);
    }
}
