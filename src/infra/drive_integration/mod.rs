// Drive integration infra layer.
// - `reqwest_transport.rs` sends requests over HTTP.
// - `token_provider.rs` supplies bearer tokens from the environment or a file.

#[path = "reqwest_transport.rs"]
pub mod reqwest_transport;

#[path = "token_provider.rs"]
pub mod token_provider;
