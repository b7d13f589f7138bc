//! Options Dashboard CLI
//!
//! Smoke tool: prices an example contract, projects a thesis and then
//! tries the live Yahoo feed.

use chrono::{Duration, Local};

use optiondash::prelude::*;

fn main() {
    println!("Options Dashboard Analytics");
    println!("===========================\n");

    // Example: Black-Scholes pricing
    let spot = 100.0;
    let strike = 100.0; // ATM
    let time = 7.0 / 365.0; // 1 week
    let vol = 0.25;

    println!("Black-Scholes Pricing Example:");
    println!("  Spot: ${:.2}", spot);
    println!("  Strike: ${:.2}", strike);
    println!("  Time: {:.0} days", time * 365.0);
    println!("  Vol: {:.1}%\n", vol * 100.0);

    let call_price = bs_price(OptionKind::Call, spot, strike, time, vol, RISK_FREE_RATE);
    let put_price = bs_price(OptionKind::Put, spot, strike, time, vol, RISK_FREE_RATE);

    println!("Option Prices:");
    println!("  Call: ${:.2}", call_price);
    println!("  Put: ${:.2}", put_price);

    let g = bs_greeks(OptionKind::Call, spot, strike, time, vol);
    println!("\nCall Greeks:");
    println!("  Delta: {:.3}", g.delta);
    println!("  Gamma: {:.4}", g.gamma);
    println!("  Theta: {:.3}", g.theta);
    println!("  Vega: {:.3}", g.vega);

    println!("\nScalp score for a tight, busy contract:");
    let score = scalp_score(g.gamma, 2.0, 4.0, g.delta);
    println!("  Score: {:.1}", score);

    // Project a thesis: stock to 105 in two days on the ATM call
    println!("\nRisk/Reward Projection (target $105, stop $98):");
    let proj = project(
        OptionKind::Call,
        call_price,
        strike,
        vol,
        105.0,
        Some(98.0),
        5.0 / 365.0,
    );
    println!("  Reward price: ${:.2}", proj.reward_price);
    println!("  Profit: ${:.2} ({:.1}%)", proj.profit, proj.profit_pct);
    if let (Some(loss), Some(ratio)) = (proj.loss, proj.ratio) {
        println!("  Loss at stop: ${:.2}", loss);
        println!("  Risk/reward: {:.2}", ratio);
    }

    // Try fetching real data
    println!("\n--- Live Data ---");
    println!("Attempting to fetch SPY options from Yahoo Finance...\n");

    let yahoo = YahooClient::new();

    match yahoo.stock_quote("SPY") {
        Ok(quote) => {
            println!("SPY Quote:");
            println!("  Price: ${:.2}", quote.price);
            println!("  Change: {:+.2} ({:+.2}%)", quote.change, quote.change_percent);
            println!("  Day range: ${:.2} - ${:.2}", quote.day_low, quote.day_high);

            match top_volume_options(
                &yahoo,
                &TradingCalendar::default(),
                "SPY",
                3,
                Local::now().naive_local(),
            ) {
                Ok(report) => {
                    println!("\nTop-volume calls for {}:", report.expiry);
                    for c in &report.calls {
                        println!(
                            "  {} strike ${:.2}  vol {}  score {:.1}",
                            c.contract_symbol, c.strike, c.volume, c.scalp_score
                        );
                    }
                }
                Err(e) => println!("Top-volume scan failed: {e}"),
            }

            // Thesis: +1% by the day after tomorrow
            let query = ThesisQuery {
                ticker: "SPY".to_string(),
                target_price: quote.price * 1.01,
                target_date: (Local::now() + Duration::days(2)).date_naive(),
                stop_loss: None,
            };
            match find_best_options(&yahoo, &query, Local::now().naive_local()) {
                Ok(result) => {
                    println!("\nBest contracts for +1% by {}:", query.target_date);
                    for c in result.contracts.iter().take(3) {
                        println!(
                            "  {} ${:.2} strike, entry ${:.2}, projected {:+.1}%",
                            c.contract_symbol, c.strike, c.ask, c.profit_pct
                        );
                    }
                }
                Err(e) => println!("Thesis search failed: {e}"),
            }
        }
        Err(e) => {
            println!("Yahoo fetch failed (offline?): {e}");
        }
    }
}
