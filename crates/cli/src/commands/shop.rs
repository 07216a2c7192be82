//! Storefront client.
//!
//! Talks to a running FootFlex API. The two pieces of client state live in
//! local JSON files under the client directory, never on the server:
//!
//! - `session.json` - the last successful auth response (token + profile).
//!   Logging out only deletes the file; the token stays valid until expiry.
//! - `cart.json` - cart lines keyed by (product, size, color), denormalized
//!   with name/image/price at add time. Nothing reaches the server until
//!   checkout posts the whole cart as one order.
//!
//! The "not logged in" checks here are UI gates for a friendlier error; the
//! API's own guards are the real enforcement boundary.

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const DEFAULT_API_URL: &str = "http://localhost:5000";

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Shop subcommands.
#[derive(Debug, Subcommand)]
pub enum ShopCommand {
    /// Create an account and store the session locally
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session locally
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the local session
    Logout,
    /// Show the profile for the current session
    Profile,
    /// List products, optionally filtered by category and/or keyword
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show one product with its reviews
    Product { id: i32 },
    /// Add a product to the local cart
    CartAdd {
        product: i32,
        #[arg(long)]
        size: String,
        #[arg(long)]
        color: String,
        #[arg(long, default_value_t = 1)]
        qty: i32,
    },
    /// Show the local cart
    Cart,
    /// Remove a (product, size, color) line from the local cart
    CartRemove {
        product: i32,
        #[arg(long)]
        size: String,
        #[arg(long)]
        color: String,
    },
    /// Place an order from the local cart, then clear it
    Checkout {
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        country: String,
        #[arg(long, default_value = "cash")]
        payment_method: String,
    },
    /// List my orders
    Orders,
    /// Show one order
    Order { id: i32 },
    /// Send a simulated payment confirmation for an order
    Pay { id: i32 },
    /// Review a product
    Review {
        product: i32,
        #[arg(long)]
        rating: i32,
        #[arg(long)]
        comment: String,
    },
}

/// The locally stored auth response.
#[derive(Debug, Serialize, Deserialize)]
struct Session {
    id: i32,
    name: String,
    email: String,
    token: String,
}

/// A cart line, denormalized at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CartItem {
    id: i32,
    name: String,
    image: String,
    price: Decimal,
    size: String,
    color: String,
    qty: i32,
}

// =============================================================================
// Local state store
// =============================================================================

/// Session and cart files under the client directory.
struct ClientStore {
    dir: PathBuf,
}

impl ClientStore {
    fn new() -> Self {
        let dir = std::env::var("FOOTFLEX_CLIENT_DIR").unwrap_or_else(|_| ".footflex".to_owned());
        Self {
            dir: PathBuf::from(dir),
        }
    }

    fn session(&self) -> Option<Session> {
        let content = std::fs::read_to_string(self.dir.join("session.json")).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn save_session(&self, session: &Session) -> CommandResult {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(self.dir.join("session.json"), content)?;
        Ok(())
    }

    fn clear_session(&self) {
        let _ = std::fs::remove_file(self.dir.join("session.json"));
    }

    fn cart(&self) -> Vec<CartItem> {
        std::fs::read_to_string(self.dir.join("cart.json"))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn save_cart(&self, cart: &[CartItem]) -> CommandResult {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(cart)?;
        std::fs::write(self.dir.join("cart.json"), content)?;
        Ok(())
    }

    fn clear_cart(&self) {
        let _ = std::fs::remove_file(self.dir.join("cart.json"));
    }
}

// =============================================================================
// Cart logic
// =============================================================================

/// Merge an item into the cart: same (product, size, color) bumps the
/// quantity, anything else appends a new line.
fn add_to_cart(cart: &mut Vec<CartItem>, item: CartItem) {
    if let Some(existing) = cart
        .iter_mut()
        .find(|x| x.id == item.id && x.size == item.size && x.color == item.color)
    {
        existing.qty += item.qty;
    } else {
        cart.push(item);
    }
}

fn remove_from_cart(cart: &mut Vec<CartItem>, product: i32, size: &str, color: &str) {
    cart.retain(|x| !(x.id == product && x.size == size && x.color == color));
}

/// Checkout arithmetic: subtotal, flat 10 shipping on non-empty carts, 10%
/// tax rounded to cents.
fn order_totals(cart: &[CartItem]) -> (Decimal, Decimal, Decimal, Decimal) {
    let subtotal: Decimal = cart.iter().map(|x| x.price * Decimal::from(x.qty)).sum();
    let shipping = if subtotal > Decimal::ZERO {
        Decimal::TEN
    } else {
        Decimal::ZERO
    };
    let tax = (subtotal * Decimal::new(1, 1)).round_dp(2);
    let total = subtotal + shipping + tax;
    (subtotal, shipping, tax, total)
}

// =============================================================================
// HTTP plumbing
// =============================================================================

fn api_url(path: &str) -> String {
    let base = std::env::var("FOOTFLEX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
    format!("{}{path}", base.trim_end_matches('/'))
}

/// Send a request; on a non-2xx response surface the server's `message`.
async fn send(builder: RequestBuilder) -> Result<Value, Box<dyn std::error::Error>> {
    let response = builder.send().await?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        Ok(body)
    } else {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        Err(format!("{status}: {message}").into())
    }
}

fn decimal_from(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn require_session(store: &ClientStore) -> Result<Session, Box<dyn std::error::Error>> {
    store
        .session()
        .ok_or_else(|| "Not logged in - run `ff-cli shop login` first".into())
}

// =============================================================================
// Command dispatch
// =============================================================================

/// Run a shop subcommand.
///
/// # Errors
///
/// Returns an error on HTTP failures, API error responses, or local state
/// I/O problems.
#[allow(clippy::too_many_lines)]
pub async fn run(command: ShopCommand) -> CommandResult {
    let store = ClientStore::new();
    let client = Client::new();

    match command {
        ShopCommand::Register {
            name,
            email,
            password,
        } => {
            let body = send(client.post(api_url("/api/users")).json(&json!({
                "name": name,
                "email": email,
                "password": password,
            })))
            .await?;
            let session: Session = serde_json::from_value(body)?;
            store.save_session(&session)?;
            println!("Registered and logged in as {} <{}>", session.name, session.email);
        }

        ShopCommand::Login { email, password } => {
            let body = send(client.post(api_url("/api/users/login")).json(&json!({
                "email": email,
                "password": password,
            })))
            .await?;
            let session: Session = serde_json::from_value(body)?;
            store.save_session(&session)?;
            println!("Logged in as {} <{}>", session.name, session.email);
        }

        ShopCommand::Logout => {
            store.clear_session();
            // Stateless tokens have no server-side revocation
            println!("Session dropped. The issued token remains valid until it expires.");
        }

        ShopCommand::Profile => {
            let session = require_session(&store)?;
            let body = send(
                client
                    .get(api_url("/api/users/profile"))
                    .bearer_auth(&session.token),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        ShopCommand::Products { category, keyword } => {
            let mut request = client.get(api_url("/api/products"));
            if let Some(category) = category {
                request = request.query(&[("category", category)]);
            }
            if let Some(keyword) = keyword {
                request = request.query(&[("keyword", keyword)]);
            }
            let body = send(request).await?;

            for product in body.as_array().into_iter().flatten() {
                println!(
                    "#{} {} ({}) - {} [{}] rating {}",
                    product["id"],
                    product["name"].as_str().unwrap_or("?"),
                    product["brand"].as_str().unwrap_or("?"),
                    product["price"].as_str().unwrap_or("?"),
                    product["category"].as_str().unwrap_or("?"),
                    product["rating"],
                );
            }
        }

        ShopCommand::Product { id } => {
            let body = send(client.get(api_url(&format!("/api/products/{id}")))).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        ShopCommand::CartAdd {
            product,
            size,
            color,
            qty,
        } => {
            // Denormalize name/image/price into the cart line, like the
            // storefront does at add-to-cart time
            let body = send(client.get(api_url(&format!("/api/products/{product}")))).await?;
            let price = decimal_from(&body["price"]).ok_or("product has no price")?;
            let item = CartItem {
                id: product,
                name: body["name"].as_str().unwrap_or_default().to_owned(),
                image: body["images"][0].as_str().unwrap_or_default().to_owned(),
                price,
                size,
                color,
                qty,
            };

            let mut cart = store.cart();
            add_to_cart(&mut cart, item);
            store.save_cart(&cart)?;

            let count: i32 = cart.iter().map(|x| x.qty).sum();
            println!("Cart now holds {count} item(s)");
        }

        ShopCommand::Cart => {
            let cart = store.cart();
            if cart.is_empty() {
                println!("Cart is empty");
            } else {
                for item in &cart {
                    println!(
                        "#{} {} size {} color {} x{} @ {}",
                        item.id, item.name, item.size, item.color, item.qty, item.price
                    );
                }
                let (subtotal, shipping, tax, total) = order_totals(&cart);
                println!("subtotal {subtotal}  shipping {shipping}  tax {tax}  total {total}");
            }
        }

        ShopCommand::CartRemove {
            product,
            size,
            color,
        } => {
            let mut cart = store.cart();
            remove_from_cart(&mut cart, product, &size, &color);
            store.save_cart(&cart)?;
            println!("Removed");
        }

        ShopCommand::Checkout {
            address,
            city,
            postal_code,
            country,
            payment_method,
        } => {
            let session = require_session(&store)?;
            let cart = store.cart();
            let (_, _, _, total) = order_totals(&cart);

            let order_items: Vec<Value> = cart
                .iter()
                .map(|item| {
                    json!({
                        "product": item.id,
                        "name": item.name,
                        "qty": item.qty,
                        "image": item.image,
                        "price": item.price,
                        "size": item.size,
                        "color": item.color,
                    })
                })
                .collect();

            let body = send(
                client
                    .post(api_url("/api/orders"))
                    .bearer_auth(&session.token)
                    .json(&json!({
                        "orderItems": order_items,
                        "shippingAddress": {
                            "address": address,
                            "city": city,
                            "postalCode": postal_code,
                            "country": country,
                        },
                        "paymentMethod": payment_method,
                        "totalPrice": total,
                    })),
            )
            .await?;

            store.clear_cart();
            println!(
                "Order #{} placed, total {}",
                body["id"],
                body["totalPrice"].as_str().unwrap_or("?")
            );
        }

        ShopCommand::Orders => {
            let session = require_session(&store)?;
            let body = send(
                client
                    .get(api_url("/api/orders/user/myorders"))
                    .bearer_auth(&session.token),
            )
            .await?;

            for order in body.as_array().into_iter().flatten() {
                println!(
                    "#{} {} - total {} paid {} delivered {}",
                    order["id"],
                    order["status"].as_str().unwrap_or("?"),
                    order["totalPrice"].as_str().unwrap_or("?"),
                    order["isPaid"],
                    order["isDelivered"],
                );
            }
        }

        ShopCommand::Order { id } => {
            let session = require_session(&store)?;
            let body = send(
                client
                    .get(api_url(&format!("/api/orders/{id}")))
                    .bearer_auth(&session.token),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        ShopCommand::Pay { id } => {
            let session = require_session(&store)?;
            let body = send(
                client
                    .put(api_url(&format!("/api/orders/{id}/pay")))
                    .bearer_auth(&session.token)
                    .json(&json!({
                        "id": format!("SIM-{id}"),
                        "status": "COMPLETED",
                        "update_time": Utc::now().to_rfc3339(),
                        "payer": { "email_address": session.email },
                    })),
            )
            .await?;
            println!(
                "Order #{} paid at {}",
                body["id"],
                body["paidAt"].as_str().unwrap_or("?")
            );
        }

        ShopCommand::Review {
            product,
            rating,
            comment,
        } => {
            let session = require_session(&store)?;
            let body = send(
                client
                    .post(api_url(&format!("/api/products/{product}/reviews")))
                    .bearer_auth(&session.token)
                    .json(&json!({ "rating": rating, "comment": comment })),
            )
            .await?;
            println!("{}", body["message"].as_str().unwrap_or("Review added"));
        }
    }

    Ok(())
}
