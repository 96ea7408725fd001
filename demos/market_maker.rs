//! Always-on two-sided quoter. Registers a broker, then polls the public
//! book for a symbol and refreshes a bid/ask pair straddling the midpoint
//! whenever it moves. Illustrates the engine end to end; not part of the
//! tested core.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SPREAD: u64 = 2;
const PACE_MS: u64 = 500;

#[derive(Parser)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    api_base: String,
    #[arg(long, default_value = "PETR4")]
    symbol: String,
    #[arg(long, default_value = "change-me")]
    admin_token: String,
}

#[derive(Deserialize)]
struct RegisterAck {
    api_key: String,
}

#[derive(Deserialize)]
struct BookView {
    asks: Vec<(u64, u64, usize)>,
    bids: Vec<(u64, u64, usize)>,
}

#[derive(Deserialize)]
struct OrderAck {
    order_id: String,
}

async fn register_broker(client: &Client, api_base: &str, admin_token: &str) -> anyhow::Result<String> {
    let resp = client
        .post(format!("{api_base}/brokers"))
        .header("x-admin-token", admin_token)
        .json(&json!({ "name": "market-maker-bot" }))
        .send()
        .await?
        .error_for_status()?;
    let ack: RegisterAck = resp.json().await?;
    Ok(ack.api_key)
}

fn valid_until_ms() -> u64 {
    (SystemTime::now() + Duration::from_secs(3600))
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = Client::new();
    let api_key = register_broker(&client, &args.api_base, &args.admin_token).await?;
    info!("registered market-maker-bot broker");

    let cancel_token = CancellationToken::new();
    let shutdown = cancel_token.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown.cancel();
    });

    let mut outstanding: Vec<String> = Vec::new();
    let mut last_mid: Option<u64> = None;
    let mut interval = tokio::time::interval(Duration::from_millis(PACE_MS));
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("market maker: shutdown requested, tearing down");
                break;
            }
            _ = interval.tick() => {
                let book: BookView = match client
                    .get(format!("{}/book/{}", args.api_base, args.symbol))
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                {
                    Ok(resp) => match resp.json().await {
                        Ok(book) => book,
                        Err(e) => { warn!(error = %e, "failed to parse book"); continue; }
                    },
                    Err(_) => continue,
                };

                let (Some(&(best_bid, _, _)), Some(&(best_ask, _, _))) =
                    (book.bids.first(), book.asks.first())
                else {
                    continue;
                };
                let mid = (best_bid + best_ask) / 2;

                if Some(mid) != last_mid {
                    for id in outstanding.drain(..) {
                        let _ = client
                            .delete(format!("{}/orders/{}", args.api_base, id))
                            .header("authorization", format!("Bearer {api_key}"))
                            .send()
                            .await;
                    }

                    for (side, price) in [
                        ("Bid", mid.saturating_sub(SPREAD)),
                        ("Ask", mid.saturating_add(SPREAD)),
                    ] {
                        seq += 1;
                        match client
                            .post(format!("{}/orders", args.api_base))
                            .header("authorization", format!("Bearer {api_key}"))
                            .json(&json!({
                                "document_number": format!("mm-{seq}"),
                                "side": side,
                                "order_type": "Limit",
                                "price": price,
                                "quantity": 1,
                                "symbol": args.symbol,
                                "valid_until": valid_until_ms(),
                            }))
                            .send()
                            .await
                        {
                            Ok(resp) => match resp.json::<OrderAck>().await {
                                Ok(ack) => outstanding.push(ack.order_id),
                                Err(e) => warn!(error = %e, "failed to parse order ack"),
                            },
                            Err(e) => warn!(error = %e, side, "quote post failed"),
                        }
                    }
                    last_mid = Some(mid);
                    info!(mid, "refreshed quotes");
                }
            }
        }
    }

    Ok(())
}
