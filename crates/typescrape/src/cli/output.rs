//! Output helpers shared by the subcommands.
//!
//! Global flags are published as environment variables by `main` so every
//! handler can check them without threading them through.

pub const JSON_ENV: &str = "TYPESCRAPE_JSON";
pub const QUIET_ENV: &str = "TYPESCRAPE_QUIET";

pub fn is_json() -> bool {
    flag(JSON_ENV)
}

pub fn is_quiet() -> bool {
    flag(QUIET_ENV)
}

fn flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1")
}

/// Print a JSON value to stdout, pretty-printed.
pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
