use chrono::Utc;
use reqwest::{Client, Url};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    Error, Res, config,
    credentials::Credentials,
    info,
    types::{Token, TokenResponse},
    utils, warning,
};

use super::check_response;

/// Runs the Authorization Code flow interactively.
///
/// Opens the authorization page in the default browser and asks the user to
/// paste the URL Spotify redirected to. The `state` of that URL must match
/// the one sent, then the contained code is exchanged for a token.
///
/// # Errors
///
/// Returns [`Error::Auth`] if the user denies access, the pasted URL is not
/// a valid redirect or the state does not match.
pub async fn authorize(http: &Client, credentials: &Credentials) -> Res<Token> {
    let state = utils::generate_state();
    let auth_url = authorize_url(credentials, &state)?;

    info!("Authorize this application with Spotify in your browser.");
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    info!("Paste the URL you were redirected to:");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let pasted = lines
        .next_line()
        .await?
        .ok_or_else(|| Error::auth("no redirect URL entered"))?;

    let code = parse_redirect(&pasted, &state)?;
    exchange_code(http, credentials, &code).await
}

/// Builds the authorization page URL.
pub fn authorize_url(credentials: &Credentials, state: &str) -> Res<Url> {
    let url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("scope", config::spotify_scope().as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::config(format!("invalid authorization URL: {}", e)))?;
    Ok(url)
}

/// Extracts the authorization code from the URL Spotify redirected to.
pub fn parse_redirect(redirect: &str, expected_state: &str) -> Res<String> {
    let url = Url::parse(redirect.trim())
        .map_err(|e| Error::auth(format!("'{}' is not a valid URL: {}", redirect.trim(), e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(Error::auth(format!("authorization denied: {}", value)));
            }
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(Error::auth("state mismatch in redirect URL"));
    }

    code.ok_or_else(|| Error::auth("redirect URL carries no authorization code"))
}

/// Exchanges an authorization code for an access token.
pub async fn exchange_code(http: &Client, credentials: &Credentials, code: &str) -> Res<Token> {
    let response = http
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let body: TokenResponse = check_response(response).await?.json().await?;
    Ok(into_token(body, &credentials.client_id))
}

/// Exchanges a refresh token for a new access token. The returned token has
/// an empty refresh token if Spotify did not rotate it.
pub async fn refresh_token(
    http: &Client,
    credentials: &Credentials,
    refresh_token: &str,
) -> Res<Token> {
    let response = http
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let body: TokenResponse = check_response(response).await?.json().await?;
    Ok(into_token(body, &credentials.client_id))
}

fn into_token(body: TokenResponse, client_id: &str) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token: body.refresh_token.unwrap_or_default(),
        scope: body.scope,
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
        client_id: client_id.to_string(),
    }
}
