//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use gh_apple_oauth::{
	Config, ReqwestGhAppleOAuth,
	flows::GhAppleOAuth,
	http::ReqwestHttpClient,
	provider::GithubEndpoints,
	reqwest::Client,
};

pub const CLIENT_ID: &str = "Iv1.it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const REDIRECT_URI: &str = "https://app.example.com/auth/apple/callback";

pub const USER_JSON: &str = "{\"id\":583231,\"login\":\"octocat\",\"name\":\"The Octocat\",\"avatar_url\":\"https://avatars.githubusercontent.com/u/583231\",\"html_url\":\"https://github.com/octocat\",\"email\":null,\"type\":\"User\"}";
pub const EMAILS_JSON: &str = "[{\"email\":\"octocat@privaterelay.appleid.com\",\"primary\":true,\"verified\":true,\"visibility\":\"private\"}]";

/// Configuration whose every endpoint points at `server`.
pub fn test_config(server: &MockServer) -> Config {
	let base = server.base_url();
	let endpoints = GithubEndpoints::from_bases(&base, &base)
		.expect("Mock server endpoints should parse successfully.");

	Config::builder(CLIENT_ID, CLIENT_SECRET, REDIRECT_URI)
		.endpoints(endpoints)
		.build()
		.expect("Test configuration should build successfully.")
}

/// Reqwest transport that trusts the self-signed certificates `httpmock` serves.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Reqwest-backed client talking to `server`.
pub fn build_test_client(server: &MockServer) -> ReqwestGhAppleOAuth {
	GhAppleOAuth::with_http_client(test_config(server), test_reqwest_http_client())
		.expect("Test client should build successfully.")
}
