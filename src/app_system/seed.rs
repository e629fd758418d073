use anyhow::Context;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::SeedConfig;
use crate::domain::{ProductCreate, User, UserCreate};
use crate::app_system::StoreSystem;

/// (name, description, brand, price, stock, featured)
const DEMO_CATALOG: &[(&str, &str, &str, i64, u32, bool)] = &[
    ("Organic Brown Rice 5kg", "Premium quality organic brown rice, grown without pesticides.", "Organic India", 450, 150, true),
    ("Fresh Organic Tomatoes 1kg", "Farm-fresh organic tomatoes, handpicked daily.", "FreshFarm", 80, 200, true),
    ("Organic Whole Wheat Flour 10kg", "Stone-ground whole wheat flour from organic wheat.", "Aashirvaad Organic", 650, 120, true),
    ("Organic Toor Dal 1kg", "Premium quality organic toor dal, rich in protein.", "Organic Tattva", 180, 180, false),
    ("Organic Milk 1 Liter", "Fresh organic full cream milk from grass-fed cows.", "Amul Organic", 85, 300, true),
    ("Organic Green Spinach 500g", "Fresh organic spinach leaves, packed with iron and vitamins.", "FreshFarm", 40, 150, false),
    ("Organic Honey 500g", "Raw organic honey, unprocessed and unheated.", "Dabur Organic", 350, 90, true),
    ("Organic Chicken Eggs (12 pcs)", "Free-range organic eggs from healthy hens.", "Keggfarms Organic", 120, 250, false),
    ("Organic Bananas 1 Dozen", "Naturally ripened organic bananas.", "FreshFarm", 60, 180, false),
    ("Organic Basmati Rice 5kg", "Aged long-grain organic basmati rice.", "India Gate Organic", 850, 100, true),
    ("Organic Green Tea 100g", "Whole-leaf organic green tea, rich in antioxidants.", "Organic India", 250, 200, false),
    ("Organic Carrots 1kg", "Crunchy organic carrots, freshly harvested.", "FreshFarm", 70, 160, false),
];

/// Creates the admin account and the demo grocery catalog.
///
/// Meant for an empty store; a second run fails on the admin's email.
pub async fn seed_demo_data(system: &StoreSystem, config: &SeedConfig) -> anyhow::Result<User> {
    let admin = system
        .user_client
        .create_user(UserCreate::admin(config.admin_name.clone(), config.admin_email.clone()))
        .await
        .context("creating admin user")?;
    info!(user_id = %admin.id, email = %admin.email, "Admin user created");

    for &(name, description, brand, price, stock, featured) in DEMO_CATALOG {
        let params = ProductCreate {
            description: description.to_string(),
            category: "Grocery".to_string(),
            brand: Some(brand.to_string()),
            is_featured: featured,
            ..ProductCreate::new(name, Decimal::new(price, 0), stock)
        };
        system
            .product_client
            .create_product(params)
            .await
            .with_context(|| format!("creating product {name}"))?;
    }
    info!(products = DEMO_CATALOG.len(), "Demo catalog created");

    Ok(admin)
}
