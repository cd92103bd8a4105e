//! Walks through starting an Apple-via-GitHub sign-in and validating the redirect that comes
//! back, without touching the network.

// crates.io
use color_eyre::Result;
// self
use gh_apple_oauth::{
	CallbackQuery, Config, GhAppleOAuth, callback,
	store::{MemoryStateStore, STATE_KEY, StateStore},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config =
		Config::builder("Iv1.demo", "demo-secret", "https://app.example.com/auth/apple/callback")
			.build()?;
	let client = GhAppleOAuth::new(config)?;
	let store = MemoryStateStore::default();
	let started = client.begin(&store).await?;

	println!("Send your user to {}.", started.url);

	// Simulate GitHub redirecting back after the user signs in with Apple.
	let callback_url = Url::parse(&format!(
		"https://app.example.com/auth/apple/callback?code=demo-code&state={}",
		started.state
	))?;
	let query = CallbackQuery::from_url(&callback_url);
	let saved = store.get(STATE_KEY).await?;
	let code = callback::validate(&query, saved.as_deref())?;

	println!("Validated state; exchange code `{code}` with GhAppleOAuth::complete in production.");

	let forged = CallbackQuery { state: Some("forged".into()), ..query };

	if let Err(e) = callback::validate(&forged, saved.as_deref()) {
		eprintln!("Forged callback rejected with `{}`: {e}.", e.code());
	}

	Ok(())
}
