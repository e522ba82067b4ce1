use std::io::{self, Write};

use clap::Args;
use decimal_percentage::Percentage;
use milkrun::{
    catalog::Catalog,
    fixtures::Fixture,
    pricing::percent_points,
    products::{Category, Product},
};
use rusty_money::iso::INR;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use tracing::info;

use crate::cli::config::PricingConfig;

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Only list products whose name contains this text
    #[arg(long, default_value = "")]
    search: String,

    /// Only list products in this category (milk, dairy, fresh)
    #[arg(long)]
    category: Option<Category>,

    /// Load products from `<fixtures>/products/<NAME>.yml` instead of the built-in list
    #[arg(long)]
    catalog: Option<String>,
}

pub(crate) fn run(args: ProductsArgs, pricing: &PricingConfig) -> Result<(), String> {
    let mut fixture = Fixture::with_base_path(&pricing.fixtures);

    let builtin;

    let catalog = if let Some(name) = &args.catalog {
        fixture
            .load_products(name)
            .and_then(|fixture| fixture.catalog())
            .map_err(|error| format!("failed to load products: {error}"))?
    } else {
        builtin = Catalog::dairy(INR).map_err(|error| error.to_string())?;
        &builtin
    };

    let products = catalog.filter(&args.search, args.category);

    info!(
        search = %args.search,
        category = ?args.category,
        matches = products.len(),
        "listed products"
    );

    let mut out = io::stdout().lock();

    if products.is_empty() {
        return writeln!(out, "no products match").map_err(|error| error.to_string());
    }

    let mut builder = Builder::default();

    builder.push_record(["Key", "Product", "Category", "Price", "Fat", "Protein", "Stock"]);

    for (key, product) in products {
        builder.push_record([
            catalog.slug(key).unwrap_or_default().to_string(),
            product.name.clone(),
            product.category.to_string(),
            format!("{}/{}", product.price, product.unit),
            nutrient(product.fat.as_ref()),
            nutrient(product.protein.as_ref()),
            stock(product).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "\n{table}\n").map_err(|error| error.to_string())
}

fn nutrient(percent: Option<&Percentage>) -> String {
    percent.map_or_else(|| "-".to_string(), |percent| format!("{}%", percent_points(percent)))
}

fn stock(product: &Product<'_>) -> &'static str {
    if product.in_stock { "in stock" } else { "sold out" }
}
