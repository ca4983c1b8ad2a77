mod support;

use energy_journal::dates::{add_days, date_key, today};
use energy_journal::storage::{FileStore, KeyValueStore};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::atomic::Ordering;
use support::{client, location, sign_in, spawn_backend, spawn_server, unique_data_path};

#[derive(Debug, Deserialize)]
struct ChartPoint {
    date: String,
    physical: Option<i64>,
    mental: Option<i64>,
    emotional: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    status: String,
    source: String,
    points: Vec<ChartPoint>,
}

async fn save_today(client: &reqwest::Client, base_url: &str, physical: i64) -> reqwest::Response {
    let physical = physical.to_string();
    client
        .post(format!("{base_url}/energy/levels/edit"))
        .form(&[
            ("date", date_key(today()).as_str()),
            ("physical", physical.as_str()),
            ("mental", "6"),
            ("emotional", "7"),
            ("sleep_quality", "4"),
            ("stress_level", "2"),
            ("nutrition", "good"),
            ("notes", ""),
            ("action", "save"),
        ])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_anonymous_user_is_sent_to_login() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("anon")).await;
    let client = client();

    for path in ["/timespending", "/energy/levels", "/energy/levels/edit"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/auth", "{path}");
    }

    let page = client
        .get(format!("{}/auth", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("Create account"));
}

#[tokio::test]
async fn http_login_persists_tokens_and_opens_spending() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("login")).await;
    let client = client();

    sign_in(&client, &server).await;

    let stored = std::fs::read_to_string(&server.data_path).unwrap();
    assert!(stored.contains("idToken"));
    assert!(stored.contains(support::ID_TOKEN));

    let page = client
        .get(format!("{}/timespending", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.text().await.unwrap();
    assert!(html.contains("hours tracked"));
    assert!(html.contains("Sleep"));

    let login_page = client
        .get(format!("{}/auth", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&login_page), "/timespending");
}

#[tokio::test]
async fn http_bad_credentials_show_generic_message() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("badlogin")).await;

    let response = client()
        .post(format!("{}/auth/login", server.base_url))
        .form(&[("email", support::EMAIL), ("password", "wrong")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Invalid email or password."));
}

#[tokio::test]
async fn http_invalid_spending_range_never_calls_backend() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("spending")).await;
    let client = client();
    sign_in(&client, &server).await;

    let html = client
        .get(format!(
            "{}/timespending?start=2026-02-10&end=2026-02-01",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Start date cannot be after end date."));
    assert_eq!(backend.state.spending_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn http_same_range_is_fetched_once_until_a_save() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("cache")).await;
    let client = client();
    sign_in(&client, &server).await;

    let range_url = format!("{}/energy/levels?preset=7d", server.base_url);
    for _ in 0..2 {
        let response = client.get(&range_url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(backend.state.range_calls.load(Ordering::SeqCst), 1);

    let saved = save_today(&client, &server.base_url, 8).await;
    assert_eq!(saved.status(), StatusCode::SEE_OTHER);
    assert!(location(&saved).ends_with("&step=2"));

    let html = client.get(&range_url).send().await.unwrap().text().await.unwrap();
    assert_eq!(backend.state.range_calls.load(Ordering::SeqCst), 2);
    assert!(html.contains("polyline") || html.contains("circle"));

    client
        .get(format!("{}/energy/levels?refresh=1", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(backend.state.range_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn http_saved_day_shows_confirmation() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("toast")).await;
    let client = client();
    sign_in(&client, &server).await;

    let saved = save_today(&client, &server.base_url, 3).await;
    let html = client
        .get(format!("{}{}", server.base_url, location(&saved)))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Energy levels saved for"));
    assert!(html.contains("Step 2 of 2"));
}

#[tokio::test]
async fn http_chart_fills_missing_days() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("chart")).await;
    let client = client();
    sign_in(&client, &server).await;

    save_today(&client, &server.base_url, 9).await;

    let day = today();
    let chart: ChartResponse = client
        .get(format!(
            "{}/api/energy/chart?from={}&to={}",
            server.base_url,
            date_key(add_days(day, -2)),
            date_key(add_days(day, 1)),
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(chart.status, "success");
    assert_eq!(chart.source, "network");
    let dates: Vec<&str> = chart.points.iter().map(|point| point.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            date_key(add_days(day, -2)),
            date_key(add_days(day, -1)),
            date_key(day),
            date_key(add_days(day, 1)),
        ]
    );
    assert_eq!(chart.points[2].physical, Some(9));
    assert_eq!(chart.points[2].mental, Some(6));
    assert_eq!(chart.points[2].emotional, Some(7));
    for index in [0, 1, 3] {
        assert!(chart.points[index].physical.is_none());
        assert!(chart.points[index].mental.is_none());
        assert!(chart.points[index].emotional.is_none());
    }
}

#[tokio::test]
async fn http_rejected_token_signs_out() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("revoked")).await;
    let client = client();
    sign_in(&client, &server).await;

    backend.state.revoked.store(true, Ordering::SeqCst);
    let response = client
        .get(format!("{}/energy/levels?preset=30d", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth");

    let stored = std::fs::read_to_string(&server.data_path).unwrap();
    assert!(!stored.contains(support::ID_TOKEN));

    let login_page = client
        .get(format!("{}/auth", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(login_page.status(), StatusCode::OK);
}

#[tokio::test]
async fn http_activation_outcomes() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("activate")).await;
    let client = client();

    let page = |query: &'static str| {
        let client = client.clone();
        let url = format!("{}/activate{query}", server.base_url);
        async move { client.get(url).send().await.unwrap().text().await.unwrap() }
    };

    assert!(page("").await.contains("This activation link is invalid or has expired."));
    assert!(page("?token=good").await.contains("activated successfully"));
    assert!(page("?token=bad").await.contains("Unable to activate your account."));
}

#[tokio::test]
async fn http_refresh_rotates_both_tokens() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("refresh")).await;
    let client = client();
    sign_in(&client, &server).await;

    let response = client
        .post(format!("{}/auth/refresh", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/timespending");

    let stored = FileStore::open(server.data_path.clone()).await;
    assert_eq!(stored.get("idToken").as_deref(), Some(support::ROTATED_ID_TOKEN));
    assert_eq!(
        stored.get("refreshToken").as_deref(),
        Some(support::ROTATED_REFRESH_TOKEN)
    );

    let page = client
        .get(format!("{}/timespending", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn http_signup_reports_success_and_failure() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("signup")).await;
    let client = client();

    let signup = |email: &'static str| {
        let client = client.clone();
        let url = format!("{}/auth/signup", server.base_url);
        async move {
            client
                .post(url)
                .form(&[
                    ("email", email),
                    ("password", "secret"),
                    ("confirm_password", "secret"),
                ])
                .send()
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        }
    };

    assert!(signup("new@example.com")
        .await
        .contains("Check your email to activate your account."));
    assert!(signup("taken@example.com")
        .await
        .contains("Unable to create account. Please try again."));
}

#[tokio::test]
async fn http_logout_clears_tokens_and_range_cache() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("logout")).await;
    let client = client();
    sign_in(&client, &server).await;

    let range_url = format!("{}/energy/levels?preset=14d", server.base_url);
    client.get(&range_url).send().await.unwrap();
    assert_eq!(backend.state.range_calls.load(Ordering::SeqCst), 1);

    let response = client
        .post(format!("{}/auth/logout", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth");

    let stored = FileStore::open(server.data_path.clone()).await;
    assert_eq!(stored.get("idToken"), None);
    assert_eq!(stored.get("refreshToken"), None);

    let blocked = client.get(&range_url).send().await.unwrap();
    assert_eq!(location(&blocked), "/auth");

    sign_in(&client, &server).await;
    client.get(&range_url).send().await.unwrap();
    assert_eq!(backend.state.range_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn http_chart_rejects_spans_over_thirty_days() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("chartspan")).await;
    let client = client();
    sign_in(&client, &server).await;

    let response = client
        .get(format!(
            "{}/api/energy/chart?from=0001-01-01&to=9999-12-31",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!(
            "{}/api/energy/chart?from=2026-01-01&to=2026-02-01",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.state.range_calls.load(Ordering::SeqCst), 0);

    let response = client
        .get(format!(
            "{}/api/energy/chart?from=2026-01-01&to=2026-01-31",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.state.range_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn http_step_change_on_another_day_loads_that_day() {
    let backend = spawn_backend().await;
    let server = spawn_server(&backend.base_url, unique_data_path("stepdate")).await;
    let client = client();
    sign_in(&client, &server).await;

    client
        .get(format!("{}/energy/levels/edit", server.base_url))
        .send()
        .await
        .unwrap();

    let yesterday = date_key(add_days(today(), -1));
    let response = client
        .post(format!("{}/energy/levels/edit", server.base_url))
        .form(&[
            ("date", yesterday.as_str()),
            ("physical", "2"),
            ("mental", "2"),
            ("emotional", "2"),
            ("action", "next"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        format!("/energy/levels/edit?date={yesterday}")
    );

    let today_key = date_key(today());
    let response = client
        .post(format!("{}/energy/levels/edit", server.base_url))
        .form(&[
            ("date", today_key.as_str()),
            ("physical", "2"),
            ("mental", "2"),
            ("emotional", "2"),
            ("action", "next"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(
        location(&response),
        format!("/energy/levels/edit?date={today_key}")
    );
}
