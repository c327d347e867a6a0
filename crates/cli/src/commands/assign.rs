//! Print candidate restaurants for unfinished orders.

use std::fmt::Write as _;

use tracing::info;

use star_burger_restaurateur::build_resolver;
use star_burger_restaurateur::config::RestaurateurConfig;
use star_burger_restaurateur::db::{self, OrderRepository};
use star_burger_restaurateur::models::Order;
use star_burger_restaurateur::services::{CandidateAssigner, DispatchContext, OrderCandidates};

/// Rank candidates for every unfinished order and print them.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or a database query
/// fails. Geocoding failures only mark distances as unknown.
pub async fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = RestaurateurConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let assigner = CandidateAssigner::new(build_resolver(pool.clone(), &config.geocoder)?);

    let orders = OrderRepository::new(&pool).list_unfinished().await?;
    let ctx = DispatchContext::load(&pool).await?;
    info!(orders = orders.len(), "Ranking candidates");

    let results = assigner.assign_all(&orders, &ctx).await;

    let output = if json {
        serde_json::to_string_pretty(&results)?
    } else {
        render_text(&orders, &results)
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// One block per order: header line, then one indented line per candidate.
fn render_text(orders: &[Order], results: &[OrderCandidates]) -> String {
    let mut out = String::new();
    for (order, result) in orders.iter().zip(results) {
        let _ = writeln!(
            out,
            "#{} [{}] {} {} ₽, {}: {}",
            order.id,
            order.status,
            order.customer_name(),
            order.total_cost,
            order.payment_type.label(),
            order.address,
        );
        if result.candidates.is_empty() {
            let _ = writeln!(out, "    no restaurant can cook this order");
        }
        for candidate in &result.candidates {
            let _ = writeln!(out, "    {}", candidate.label());
        }
    }
    out
}
