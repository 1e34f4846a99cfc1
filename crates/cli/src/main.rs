//! Campus Eats CLI - browse, order and track from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! ce-cli restaurants --cuisine indian
//! ce-cli menu rest-6 --category Bread
//!
//! # Cart
//! ce-cli cart add item-27
//! ce-cli cart set item-27 3
//! ce-cli cart show
//!
//! # Order and follow it until the courier is on the way
//! ce-cli checkout --payment cash
//! ce-cli track order-1 --dwell-secs 1 --confirm
//!
//! # Account
//! ce-cli login meera --password secret
//! ce-cli logout
//! ```
//!
//! # Commands
//!
//! - `restaurants` / `menu` - Browse the catalog
//! - `cart` - Inspect and edit the persisted cart
//! - `checkout` - Place an order for the cart
//! - `orders` - Active and past orders
//! - `track` - Follow an order's status
//! - `login` / `logout` / `register` / `whoami` - Account
//!
//! Configuration comes from the same `CAMPUS_EATS_*` environment variables
//! as the storefront server; cart and session snapshots share its data
//! directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use campus_eats_core::{CardDetails, PaymentMethod};
use campus_eats_storefront::api::types::SignupRequest;
use clap::{Parser, Subcommand};

mod commands;

use commands::Context;
use commands::orders::CheckoutArgs;

#[derive(Parser)]
#[command(name = "ce-cli")]
#[command(author, version, about = "Campus Eats command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List restaurants
    Restaurants {
        /// Only restaurants serving this cuisine
        #[arg(short, long)]
        cuisine: Option<String>,

        /// Keyword matched against name, description and cuisine
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a restaurant's menu
    Menu {
        /// Restaurant id (e.g. `rest-6`)
        restaurant_id: String,

        /// Only items in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout {
        /// `credit_card`, `paypal` or `cash`
        #[arg(short, long, default_value = "credit_card")]
        payment: PaymentMethod,

        /// Delivery address id (defaults to the default address)
        #[arg(short, long)]
        address: Option<String>,

        /// Card number
        #[arg(long, default_value = "")]
        card_number: String,

        /// Name on card
        #[arg(long, default_value = "")]
        card_name: String,

        /// Card expiry (MM/YY)
        #[arg(long, default_value = "")]
        expiry: String,

        /// Card security code
        #[arg(long, default_value = "")]
        cvc: String,

        /// Notes for the courier
        #[arg(short, long)]
        instructions: Option<String>,
    },
    /// List active and past orders
    Orders,
    /// Follow an order's status until it is out for delivery
    Track {
        /// Order id
        order_id: String,

        /// Seconds between status changes (overrides `CAMPUS_EATS_STATUS_DWELL_SECS`)
        #[arg(long)]
        dwell_secs: Option<u64>,

        /// Confirm delivery once the order is out for delivery
        #[arg(long)]
        confirm: bool,
    },
    /// Sign in
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(long, env = "CAMPUS_EATS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Create an account
    Register {
        /// Username
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Password
        #[arg(long, env = "CAMPUS_EATS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the signed-in user and saved addresses
    Whoami,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show items, restaurant groups and totals
    Show,
    /// Add one unit of a menu item
    Add {
        /// Menu item id (e.g. `item-27`)
        menu_item_id: String,

        /// Restaurant the item belongs to (searched when omitted)
        #[arg(short, long)]
        restaurant: Option<String>,
    },
    /// Set the quantity of an item (values below one become one)
    Set {
        /// Menu item id
        menu_item_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove an item
    Remove {
        /// Menu item id
        menu_item_id: String,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Defaults to info level so command output is visible
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Restaurants { cuisine, search } => {
            commands::catalog::restaurants(&ctx, cuisine.as_deref(), search.as_deref()).await?;
        }
        Commands::Menu {
            restaurant_id,
            category,
        } => commands::catalog::menu(&ctx, &restaurant_id, category.as_deref()).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx)?,
            CartAction::Add {
                menu_item_id,
                restaurant,
            } => commands::cart::add(&ctx, &menu_item_id, restaurant.as_deref()).await?,
            CartAction::Set {
                menu_item_id,
                quantity,
            } => commands::cart::set(&ctx, &menu_item_id, quantity)?,
            CartAction::Remove { menu_item_id } => commands::cart::remove(&ctx, &menu_item_id)?,
            CartAction::Clear => commands::cart::clear(&ctx)?,
        },
        Commands::Checkout {
            payment,
            address,
            card_number,
            card_name,
            expiry,
            cvc,
            instructions,
        } => {
            let args = CheckoutArgs {
                payment,
                address,
                card: CardDetails {
                    card_number,
                    card_name,
                    expiry,
                    cvc,
                },
                instructions,
            };
            commands::orders::checkout(&ctx, args).await?;
        }
        Commands::Orders => commands::orders::history(&ctx).await?,
        Commands::Track {
            order_id,
            dwell_secs,
            confirm,
        } => {
            let dwell = dwell_secs.map(Duration::from_secs);
            commands::orders::track(&ctx, &order_id, dwell, confirm).await?;
        }
        Commands::Login { username, password } => {
            commands::account::login(&ctx, &username, password).await?;
        }
        Commands::Logout => commands::account::logout(&ctx)?,
        Commands::Register {
            username,
            email,
            name,
            password,
        } => {
            let request = SignupRequest {
                username,
                email,
                password,
                name,
            };
            commands::account::register(&ctx, request).await?;
        }
        Commands::Whoami => commands::account::whoami(&ctx).await?,
    }
    Ok(())
}
