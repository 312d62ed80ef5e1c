//! Connect to a receiver, initialize it and print every state update.
//!
//! Usage: `cargo run --example monitor -- 192.168.1.100 [port]`

use ynca::{Receiver, SubunitId, Value, YNCA_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().expect("usage: monitor <host> [port]");
    let port = match args.next() {
        Some(port) => port.parse()?,
        None => YNCA_PORT,
    };

    let mut receiver = Receiver::connect(&host, port).await?;
    receiver.initialize().await?;

    println!("Available subunits: {:?}", receiver.available_subunits());
    println!("Inputs: {:?}", receiver.inputs().keys().collect::<Vec<_>>());

    let print_update = |subunit: SubunitId, function: &str, value: &Value| {
        println!("{subunit} {function} = {value:?}");
    };

    if let Some(system) = receiver.system() {
        system.register_update_callback(print_update);
    }
    for zone in receiver.zones() {
        zone.register_update_callback(print_update);
    }
    for player in receiver.players() {
        player.register_update_callback(print_update);
    }
    if let Some(tuner) = receiver.tuner() {
        tuner.register_update_callback(print_update);
    }

    println!("Watching for updates, press Ctrl-C to exit");
    tokio::signal::ctrl_c().await?;

    receiver.close();
    Ok(())
}
