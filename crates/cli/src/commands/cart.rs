//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! cs-cli cart add hd-01
//! cs-cli cart remove hd-01
//! cs-cli cart show
//! cs-cli cart show --json
//! ```

use std::fmt::Write as _;

use corner_shop_core::ProductId;
use corner_shop_storefront::services::{CartProjections, CartUpdate, CartView};

use super::{CommandError, connect};

/// Add a catalog product to the cart.
pub async fn add(database_url: Option<&str>, id: &str) -> Result<(), CommandError> {
    let id: ProductId = id.parse()?;
    let state = connect(database_url).await?;

    let product = state
        .catalog()
        .find_product_by_id(&id)
        .cloned()
        .ok_or_else(|| CommandError::UnknownProduct(id.to_string()))?;

    let update = state.cart().add_product(&product).await?;
    state.shutdown().await;

    print_out(&render_update(&update));
    Ok(())
}

/// Remove a product from the cart.
pub async fn remove(database_url: Option<&str>, id: &str) -> Result<(), CommandError> {
    let id: ProductId = id.parse()?;
    let state = connect(database_url).await?;

    let update = state.cart().remove_product(&id).await?;
    state.shutdown().await;

    print_out(&render_update(&update));
    Ok(())
}

/// Show cart rows and projections.
pub async fn show(database_url: Option<&str>, json: bool) -> Result<(), CommandError> {
    let state = connect(database_url).await?;
    let view = state.cart().load_cart().await?;
    state.shutdown().await;

    if json {
        print_out(&format!("{}\n", serde_json::to_string_pretty(&view)?));
    } else {
        print_out(&render_view(&view));
    }
    Ok(())
}

fn print_out(text: &str) {
    #[allow(clippy::print_stdout)]
    {
        print!("{text}");
    }
}

fn render_update(update: &CartUpdate) -> String {
    let mut out = format!("{} {}\n", update.feedback.title(), update.feedback.body());
    if let Some(projections) = &update.projections {
        render_projections(&mut out, projections);
    }
    out
}

fn render_view(view: &CartView) -> String {
    let mut out = String::new();
    for item in &view.items {
        let _ = writeln!(out, "{:<8} {:<20} {:>8}", item.id, item.name, item.price);
    }
    render_projections(&mut out, &view.projections);
    out
}

/// Append projection lines; a projection with nothing to display is skipped.
fn render_projections(out: &mut String, projections: &CartProjections) {
    if projections.empty_state_visible == Some(true) {
        let _ = writeln!(out, "Your cart is empty.");
    }
    if let Some(count) = projections.item_count {
        let _ = writeln!(out, "Items: {count}");
    }
    if let Some(total) = &projections.total_price {
        let _ = writeln!(out, "Total: {total}");
    }
}
