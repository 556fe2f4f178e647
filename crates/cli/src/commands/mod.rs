//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;

/// Read a database URL, falling back to the shared `DATABASE_URL`.
fn database_url(primary: &'static str) -> Option<secrecy::SecretString> {
    std::env::var(primary)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(secrecy::SecretString::from)
}
