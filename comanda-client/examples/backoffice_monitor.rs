//! Backoffice Monitor Example
//!
//! Loads the order board, prints the dashboard figures, then follows the
//! realtime channel and keeps the board current until Ctrl+C.
//!
//! Configuration comes from `COMANDA_*` variables (or `.env`).
//!
//! Run: cargo run --example backoffice_monitor

use comanda_client::logger::init_logger;
use comanda_client::state::{Dashboard, OrderBoard};
use comanda_client::{ApiClient, ClientConfig, EventListener, RealtimeClient, RealtimeConfig};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    init_logger(&config.log_level, false)?;

    println!("\n🍽  Comanda backoffice monitor");
    println!("API: {}\n", config.api_base_url);

    let api = Arc::new(ApiClient::from_config(&config)?);
    let mut board = OrderBoard::new(api.clone());
    let mut dashboard = Dashboard::new(api);

    board.load().await?;
    let summary = dashboard.refresh().await?;
    println!(
        "Pedidos: {} | Ativos: {} | Faturamento: {} | Mesas ocupadas: {}",
        summary.order_count,
        summary.active_orders,
        summary.revenue_label(),
        summary.occupancy_label()
    );
    for order in board.visible_orders() {
        println!(
            "  #{:<5} {:<22} {:>10}  {}",
            order.id,
            order.status.label(),
            order.total_label(),
            order.customer_name().unwrap_or("-")
        );
    }

    if !config.real_time_updates {
        println!("\nRealtime updates disabled (COMANDA_REAL_TIME_UPDATES=false)");
        return Ok(());
    }

    // Callbacks run on the socket task; hand events over to this one
    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = EventListener::new();
    listener.on_any_event(move |event| {
        let _ = tx.send(event);
    });
    let socket = RealtimeClient::connect(RealtimeConfig::from_client(&config)?, listener);

    println!("\nListening for events (Ctrl+C to quit)...");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(event) = rx.recv() => {
                board.apply_event(&event);
                dashboard.apply_event(&event);
                if let Some(notification) = board.notification() {
                    println!("[{:?}] {}", notification.level, notification.message);
                }
                board.dismiss_notification();
                println!(
                    "  faturamento {} | pedidos ativos {}",
                    dashboard.summary().revenue_label(),
                    dashboard.summary().active_orders
                );
            }
        }
    }

    socket.shutdown().await;
    println!("Bye");
    Ok(())
}
