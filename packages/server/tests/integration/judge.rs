use serde_json::json;
use uuid::Uuid;

use crate::common::{
    TestApp, admin_token, evaluation_body, judge_token, routes, token_for,
};

mod authentication {
    use super::*;

    #[tokio::test]
    async fn request_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::TEAMS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::TEAMS, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn admin_token_cannot_use_judge_routes() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::TEAMS, &admin_token()).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn token_without_email_has_no_role() {
        let app = TestApp::spawn().await;
        let token = token_for(Uuid::new_v4(), None);

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 403);
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn judge_is_registered_with_roster_name() {
        let app = TestApp::spawn().await;
        let token = judge_token("jordan");

        let first = app.get_with_token(routes::ME, &token).await;
        let second = app.get_with_token(routes::ME, &token).await;

        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["name"], "Jordan Avery");
        assert_eq!(first.body["email"], "jordan@judge.example.com");
        assert_eq!(first.body["id"], second.body["id"]);
    }

    #[tokio::test]
    async fn judge_missing_from_roster_is_unknown() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(routes::ME, &judge_token("stranger"))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Unknown Judge");
    }
}

mod scoring {
    use super::*;

    #[tokio::test]
    async fn teams_are_listed_in_number_order() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::TEAMS, &judge_token("jordan")).await;

        assert_eq!(res.status, 200);
        let numbers: Vec<i64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["team_number"].as_i64().unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(res.body.as_array().unwrap().iter().all(|t| t["evaluated"] == false));
    }

    #[tokio::test]
    async fn first_submission_creates_and_second_overwrites() {
        let app = TestApp::spawn().await;
        let token = judge_token("jordan");
        let team_id = app.team_id(&token, 2).await;

        let created = app
            .put_with_token(
                &routes::evaluation(&team_id),
                &evaluation_body((10, 10, 10), false),
                &token,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        assert_eq!(created.body["total_score"], 30);

        let updated = app
            .put_with_token(
                &routes::evaluation(&team_id),
                &evaluation_body((20, 15, 14), false),
                &token,
            )
            .await;
        assert_eq!(updated.status, 200, "{}", updated.text);
        assert_eq!(updated.body["total_score"], 49);
        assert_eq!(updated.body["id"], created.body["id"]);
        assert_eq!(updated.body["created_at"], created.body["created_at"]);

        let mine = app.get_with_token(routes::MY_EVALUATIONS, &token).await;
        let mine = mine.body.as_array().unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["skit_execution"], 20);
        assert_eq!(mine[0]["team_number"], 2);
    }

    #[tokio::test]
    async fn concurrent_first_submissions_create_exactly_once() {
        let app = TestApp::spawn().await;
        let token = judge_token("jordan");
        let team_id = app.team_id(&token, 1).await;
        let path = routes::evaluation(&team_id);

        let first_body = evaluation_body((10, 10, 10), false);
        let second_body = evaluation_body((12, 12, 12), false);
        let (first, second) = tokio::join!(
            app.put_with_token(&path, &first_body, &token),
            app.put_with_token(&path, &second_body, &token),
        );

        let mut statuses = vec![first.status, second.status];
        statuses.sort();
        assert_eq!(statuses, vec![200, 201], "{} / {}", first.text, second.text);
        assert_eq!(first.body["id"], second.body["id"]);

        let mine = app.get_with_token(routes::MY_EVALUATIONS, &token).await;
        assert_eq!(mine.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn evaluated_team_is_marked_in_listing() {
        let app = TestApp::spawn().await;
        let token = judge_token("jordan");
        let team_id = app.team_id(&token, 1).await;
        app.score(&token, &team_id, (5, 5, 5), false).await;

        let res = app.get_with_token(routes::TEAMS, &token).await;

        let teams = res.body.as_array().unwrap();
        assert_eq!(teams[0]["evaluated"], true);
        assert_eq!(teams[1]["evaluated"], false);
    }

    #[tokio::test]
    async fn saved_evaluation_can_be_fetched_for_prefill() {
        let app = TestApp::spawn().await;
        let token = judge_token("jordan");
        let team_id = app.team_id(&token, 3).await;

        let before = app.get_with_token(&routes::evaluation(&team_id), &token).await;
        assert_eq!(before.status, 404);

        app.score(&token, &team_id, (12, 9, 8), true).await;
        let after = app.get_with_token(&routes::evaluation(&team_id), &token).await;

        assert_eq!(after.status, 200);
        assert_eq!(after.body["total_score"], 29);
        assert_eq!(after.body["offensive_content"], true);
        assert_eq!(after.body["flags"], json!(["offensive_content"]));
    }

    #[tokio::test]
    async fn judges_only_see_their_own_evaluations() {
        let app = TestApp::spawn().await;
        let jordan = judge_token("jordan");
        let sam = judge_token("sam");
        let team_id = app.team_id(&jordan, 1).await;
        app.score(&jordan, &team_id, (10, 10, 10), false).await;

        let res = app.get_with_token(routes::MY_EVALUATIONS, &sam).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));

        let prefill = app.get_with_token(&routes::evaluation(&team_id), &sam).await;
        assert_eq!(prefill.status, 404);
    }

    #[tokio::test]
    async fn out_of_range_scores_are_rejected() {
        let app = TestApp::spawn().await;
        let token = judge_token("jordan");
        let team_id = app.team_id(&token, 1).await;

        for scores in [(21, 0, 0), (0, 16, 0), (0, 0, 16), (-1, 0, 0)] {
            let res = app
                .put_with_token(
                    &routes::evaluation(&team_id),
                    &evaluation_body(scores, false),
                    &token,
                )
                .await;
            assert_eq!(res.status, 400, "{scores:?} accepted");
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn incomplete_body_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = judge_token("jordan");
        let team_id = app.team_id(&token, 1).await;

        let res = app
            .put_with_token(
                &routes::evaluation(&team_id),
                &json!({"skit_execution": 10}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_team_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put_with_token(
                &routes::evaluation(&Uuid::new_v4().to_string()),
                &evaluation_body((1, 1, 1), false),
                &judge_token("jordan"),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
