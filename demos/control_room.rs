//! Control Room
//!
//! Drives the hub the way the transport does: inbound events executed
//! as effects against a latch driver environment, with the reply line
//! each endpoint would serve back.
//!
//! Key concepts:
//! - Two-phase execution: step computes, commit stores
//! - The latch fires through the environment on the mission-complete edge
//! - Remote keyfob codes mapped onto the panel operations
//!
//! Run with: cargo run --example control_room

use chrono::Utc;
use lost_signal::core::{GameSession, REFERENCE_PATTERN};
use lost_signal::dispatch::InboundEvent;
use lost_signal::effects::{MissionHub, RecordingLatch};
use stillwater::effect::Effect;
use tracing_subscriber::EnvFilter;

async fn send(hub: &mut MissionHub, latch: &RecordingLatch, event: InboundEvent) {
    let result = hub.step(event, Utc::now()).run(latch).await;
    match result {
        Ok((next, reply)) => {
            hub.commit(next);
            println!("  [Reply] {reply}");
        }
        Err(fault) => println!("  [Fault] {fault}"),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Lost Signal: Control Room ===\n");

    let mut hub = MissionHub::new(GameSession::default());
    let latch = RecordingLatch::new();

    println!("GM remote, key A (advance to Puzzle 2):");
    send(&mut hub, &latch, InboundEvent::Remote { code: 'A' }).await;

    println!("\nReceiver noise (unknown code 'x'):");
    send(&mut hub, &latch, InboundEvent::Remote { code: 'x' }).await;

    println!("\nGM confirms the conduits:");
    send(&mut hub, &latch, InboundEvent::ConfirmConduits).await;
    send(&mut hub, &latch, InboundEvent::ConfirmConduits).await;

    println!("\nGM remote, key B (advance to Puzzle 3):");
    send(&mut hub, &latch, InboundEvent::Remote { code: 'B' }).await;

    println!("\nPlayers slip on the console:");
    send(&mut hub, &latch, InboundEvent::PressButton { id: 4 }).await;
    send(&mut hub, &latch, InboundEvent::PressButton { id: 2 }).await;

    println!("\nThen enter the full pattern:");
    for &button in REFERENCE_PATTERN.iter() {
        send(&mut hub, &latch, InboundEvent::PressButton { id: button }).await;
    }

    println!("\nStage: {}", hub.session().stage());
    println!("Latch releases so far: {}", latch.releases());

    println!("\nReset and override straight to the finale:");
    send(&mut hub, &latch, InboundEvent::Reset).await;
    send(&mut hub, &latch, InboundEvent::Remote { code: 'd' }).await;
    println!("Latch releases after the override: {}", latch.releases());

    println!("\nKey Takeaways:");
    println!("- One event, one operation, one reply line");
    println!("- A faulted driver leaves the committed session untouched");
    println!("- The latch edge fires exactly once per reset cycle");

    println!("\n=== Example Complete ===");
}
