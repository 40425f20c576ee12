#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use reqwest::StatusCode;
use serde_json::{json, Value};

use products_api::auth::{Credential, MemoryCredentialStore, PasswordHasher, Role, TokenService};
use products_api::config::AppConfig;
use products_api::database::models::{Customer, Product, ProductBase, SaleLine};
use products_api::database::MemoryStore;
use products_api::AppState;

pub const ADMIN: (&str, &str) = ("admin", "secret");
pub const USER: (&str, &str) = ("alice", "wonderland");
pub const DISABLED: (&str, &str) = ("bob", "builder");

/// Lowest bcrypt cost keeps logins fast in tests.
const TEST_HASH_COST: u32 = 4;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenService>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in through POST /token and return the access token.
    pub async fn login(&self, (username, password): (&str, &str)) -> Result<String> {
        let res = reqwest::Client::new()
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login for {} failed: {}", username, res.status());

        let body = res.json::<Value>().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("token response missing access_token")
    }
}

/// Start the real router on a free port inside the current test runtime.
///
/// Every test gets its own server and its own seeded in-memory store.
pub async fn spawn_server() -> Result<TestServer> {
    let mut config = AppConfig::development();
    config.security.password_hash_cost = TEST_HASH_COST;
    config.api.enable_request_logging = false;

    let hasher = PasswordHasher::new(TEST_HASH_COST);
    let credentials = Arc::new(MemoryCredentialStore::new(vec![
        credential(&hasher, ADMIN, Role::Admin, false)?,
        credential(&hasher, USER, Role::User, false)?,
        credential(&hasher, DISABLED, Role::User, true)?,
    ])?);

    let tokens = TokenService::new(&config.security.jwt_secret, Duration::minutes(config.security.token_ttl_minutes))?;
    let store = Arc::new(MemoryStore::new(config.reports.clone()));
    seed(&store).await;

    let state = AppState::new(config, tokens, credentials, store.clone(), store.clone());
    let tokens = state.tokens.clone();
    let app = products_api::app(state);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        tokens,
    })
}

fn credential(hasher: &PasswordHasher, (username, password): (&str, &str), role: Role, disabled: bool) -> Result<Credential> {
    Ok(Credential {
        username: username.to_string(),
        role,
        disabled,
        password_hash: hasher.hash(password)?,
    })
}

pub fn product_base(name: &str, subcategory: i32, color: &str, price: f64) -> ProductBase {
    ProductBase {
        product_subcategory_key: subcategory,
        product_sku: format!("SKU-{}", name.len()),
        product_name: name.to_string(),
        model_name: name.split_whitespace().next().unwrap_or(name).to_string(),
        product_description: format!("{} for testing", name),
        product_color: color.to_string(),
        product_size: "M".to_string(),
        product_style: "U".to_string(),
        product_cost: (price * 0.6 * 100.0).round() / 100.0,
        product_price: price,
    }
}

/// A valid POST/PUT body.
pub fn product_json(name: &str) -> Value {
    json!({
        "ProductSubcategoryKey": 2,
        "ProductSKU": "HL-U509-R",
        "ProductName": name,
        "ModelName": "Sport-100",
        "ProductDescription": "Universal fit, well-vented, lightweight.",
        "ProductColor": "Red",
        "ProductSize": "0",
        "ProductStyle": "U",
        "ProductCost": 13.09,
        "ProductPrice": 34.99
    })
}

/// Seed data:
///
/// | key | name                   | subcategory (category) | color | price   |
/// |-----|------------------------|------------------------|-------|---------|
/// | 1   | Road-150 Red           | 1 (1)                  | Red   | 3578.27 |
/// | 2   | Mountain-100 Black     | 1 (1)                  | Black | 3374.99 |
/// | 3   | Sport-100 Helmet Black | 2 (4)                  | Black | 34.99   |
///
/// Sales: 2016 has two March lines (keys 1, 2 by customer 11000 in territory 1);
/// 2017 has three July lines (key 3 by 11001 in territory 2, key 1 by 11000 in
/// territory 1, key 3 by 11001 in territory 3).
async fn seed(store: &MemoryStore) {
    store.seed_product(Product::new(1, product_base("Road-150 Red", 1, "Red", 3578.27))).await;
    store.seed_product(Product::new(2, product_base("Mountain-100 Black", 1, "Black", 3374.99))).await;
    store.seed_product(Product::new(3, product_base("Sport-100 Helmet Black", 2, "Black", 34.99))).await;

    store.seed_subcategory(1, 1).await;
    store.seed_subcategory(2, 4).await;

    store
        .seed_customer(Customer { customer_key: 11000, first_name: "Jon".into(), last_name: "Yang".into() })
        .await;
    store
        .seed_customer(Customer { customer_key: 11001, first_name: "Eugene".into(), last_name: "Huang".into() })
        .await;

    let sales: [(u16, (i32, u32, u32), i64, i64, i64); 5] = [
        (2016, (2016, 3, 10), 1, 11000, 1),
        (2016, (2016, 3, 12), 2, 11000, 1),
        (2017, (2017, 7, 1), 3, 11001, 2),
        (2017, (2017, 7, 2), 1, 11000, 1),
        (2017, (2017, 7, 3), 3, 11001, 3),
    ];
    for (year, (y, m, d), product_key, customer_key, territory_key) in sales {
        let order_date = NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date");
        store
            .seed_sale(year, SaleLine { order_date, product_key, customer_key, territory_key })
            .await;
    }
}
