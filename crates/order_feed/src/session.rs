use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;

use base::entities::{AuthToken, RestaurantId};
use base::requests::api::SyncHttpRequest;
use base::requests::entities::{
    HttpRequestData, HttpRequestMethod, HttpRequestWithRetriesParams, NumberOfRetries,
    SecondsToSleep,
};
use base::requests::http_request_with_retries;

pub const DEFAULT_NUMBER_OF_LOGIN_RETRIES: NumberOfRetries = 3;
pub const DEFAULT_SECONDS_TO_SLEEP_BEFORE_LOGIN_RETRY: SecondsToSleep = 1;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RetrySettings {
    pub number_of_request_retries: NumberOfRetries,
    pub seconds_to_sleep_before_request_retry: SecondsToSleep,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            number_of_request_retries: DEFAULT_NUMBER_OF_LOGIN_RETRIES,
            seconds_to_sleep_before_request_retry: DEFAULT_SECONDS_TO_SLEEP_BEFORE_LOGIN_RETRY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AuthToken,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RestaurantJson {
    #[serde(rename = "_id")]
    id: RestaurantId,
    name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct LoginPayloadJson {
    token: Option<AuthToken>,
    restaurant: Option<RestaurantJson>,
}

#[derive(Deserialize, Debug)]
struct LoginResponseJson {
    #[serde(flatten)]
    top: LoginPayloadJson,
    data: Option<LoginPayloadJson>,
}

/// The backend answers either `{token, restaurant}` or `{data: {token, restaurant}}`.
fn parse_session(body: &str) -> Result<Session> {
    let response: LoginResponseJson =
        serde_json::from_str(body).context("login response is not a JSON object")?;

    let data = response.data.unwrap_or_default();

    let token = match response.top.token.or(data.token) {
        Some(token) if !token.is_empty() => token,
        _ => bail!("no token returned"),
    };

    let restaurant = response
        .top
        .restaurant
        .or(data.restaurant)
        .context("no restaurant returned")?;

    Ok(Session {
        token,
        restaurant_id: restaurant.id,
        restaurant_name: restaurant.name,
    })
}

pub fn login(
    base_url: &str,
    credentials: &Credentials,
    retry_settings: RetrySettings,
    target_logger: &str,
    request_api: &impl SyncHttpRequest,
) -> Result<Session> {
    if credentials.email.is_empty() || credentials.password.is_empty() {
        bail!("both the email and the password are required");
    }

    let url = format!("{}/api/admin/login", base_url.trim_end_matches('/'));

    let req_data = HttpRequestData::new(HttpRequestMethod::Post, &url).with_json_body(json!({
        "email": credentials.email,
        "password": credentials.password,
    }));

    let req_params = HttpRequestWithRetriesParams {
        req_entity_name: "the admin session",
        target_logger,
        number_of_retries: retry_settings.number_of_request_retries,
        seconds_to_sleep: retry_settings.seconds_to_sleep_before_request_retry,
    };

    let body = http_request_with_retries(req_data, req_params, request_api)
        .context("login failed")?;

    let session = parse_session(&body)?;

    log::info!(
        target: target_logger,
        "logged in to the restaurant {}",
        session
            .restaurant_name
            .as_deref()
            .unwrap_or(&session.restaurant_id)
    );

    Ok(session)
}
