use std::env::{self, VarError};

/// Non-secret variables, in the order they are printed. The Stripe API key is never shown.
const SHOWN_VARIABLES: [&str; 11] = [
    "RUST_LOG",
    "SHOP_HOST",
    "SHOP_PORT",
    "SHOP_DATABASE_URL",
    "SHOP_RUN_MIGRATIONS",
    "SHOP_CURRENCY",
    "SHOP_FRONTEND_STORE_URL",
    "SHOP_ABANDONED_ORDER_TIMEOUT",
    "SHOP_SWEEP_INTERVAL",
    "SHOP_STRIPE_API_URL",
    "SHOP_STRIPE_TIMEOUT",
];

/// The server takes no arguments. If any are given, print the help text and the current configuration, and return
/// `true` so that the caller exits instead of starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{}\n", include_str!("./cli-help.txt"));
    println!("Current environment (secrets are not shown):");
    for name in SHOWN_VARIABLES {
        println!("  {name:<35} {}", describe_value(env::var(name)));
    }
    true
}

fn describe_value(value: Result<String, VarError>) -> String {
    match value {
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}
