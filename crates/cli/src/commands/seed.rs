//! Seed the database with demo marketplace data.
//!
//! Creates a demo shop-owner profile, two shops with a couple of products
//! each, and one open community task. Skips seeding entirely if any shops
//! already exist, so the command is safe to re-run.

use rust_decimal::Decimal;
use tracing::info;

use kasilink_core::{Email, Price, ShopCategory, UserId};
use kasilink_server::db::{self, PgStorage, Storage};
use kasilink_server::models::{NewProduct, NewShop, NewTask, NewUser};

/// Insert demo data if the database is empty.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a write fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let storage = PgStorage::new(pool);

    if !storage.list_shops(None).await?.is_empty() {
        info!("Shops already exist, skipping seed");
        return Ok(());
    }

    let owner = storage
        .upsert_user(NewUser {
            id: UserId::from("seed-demo-owner"),
            email: Email::parse("demo@kasilink.example")?,
            first_name: "Demo".to_owned(),
            last_name: "Owner".to_owned(),
            profile_image_url: None,
        })
        .await?;
    info!(user = %owner.id, "Seeded demo owner");

    let tailor = storage
        .create_shop(NewShop {
            owner_id: owner.id.clone(),
            name: "Gogo's Sewing & Tailoring".to_owned(),
            description: "Custom tailoring, alterations, and school uniforms.".to_owned(),
            category: ShopCategory::Tailor,
            image_url: "https://images.kasilink.example/shops/gogos-tailoring.jpg".to_owned(),
            location: "Soweto".to_owned(),
        })
        .await?;

    let laundry = storage
        .create_shop(NewShop {
            owner_id: owner.id.clone(),
            name: "Sparkle Clean Laundry".to_owned(),
            description: "Same-day wash, dry, and iron service.".to_owned(),
            category: ShopCategory::Laundry,
            image_url: "https://images.kasilink.example/shops/sparkle-clean.jpg".to_owned(),
            location: "Khayelitsha".to_owned(),
        })
        .await?;
    info!(shops = 2, "Seeded demo shops");

    storage
        .create_product(NewProduct {
            shop_id: tailor.id,
            name: "School uniform (full set)".to_owned(),
            description: "Made to measure, two-week turnaround.".to_owned(),
            price: price("450")?,
            image_url: "https://images.kasilink.example/products/uniform.jpg".to_owned(),
            in_stock: true,
        })
        .await?;

    storage
        .create_product(NewProduct {
            shop_id: laundry.id,
            name: "Wash & fold (per bag)".to_owned(),
            description: "Up to 8kg per bag, ready next morning.".to_owned(),
            price: price("80")?,
            image_url: "https://images.kasilink.example/products/wash-fold.jpg".to_owned(),
            in_stock: true,
        })
        .await?;
    info!(products = 2, "Seeded demo products");

    storage
        .create_task(NewTask {
            creator_id: owner.id,
            title: "Deliver parcel to Orlando East".to_owned(),
            description: "Pick up a small parcel from the shop and drop it at Orlando East."
                .to_owned(),
            budget: price("150")?,
            location: "Soweto".to_owned(),
        })
        .await?;
    info!(tasks = 1, "Seeded demo task");

    info!("Seed complete");
    Ok(())
}

fn price(amount: &str) -> Result<Price, Box<dyn std::error::Error>> {
    let decimal: Decimal = amount.parse()?;
    Ok(Price::new(decimal)?)
}
