//! Full Playthrough
//!
//! Walks one group through the whole mission using the pure core:
//! stage advances, conduit confirmation, the button sequence with a
//! wrong press, and the final latch edge.
//!
//! Key concepts:
//! - Session operations as pure functions of (state, now)
//! - Display projection polled like the room's screen
//! - The timed error flash driven by an explicit clock
//!
//! Run with: cargo run --example full_playthrough

use chrono::Utc;
use lost_signal::core::{GameSession, GameStage, REFERENCE_PATTERN};
use lost_signal::projector::project;
use lost_signal::HubConfig;
use stillwater::validation::Validation;
use tracing_subscriber::EnvFilter;

fn print_display(session: &GameSession) {
    let payload = project(session, Utc::now());
    println!("  [Display] == {} ==", payload.stage_label);
    for line in &payload.narrative {
        println!("  [Display] {line}");
    }
    if let Some(banner) = &payload.banner {
        println!("  [Display] *** {banner} ***");
    }
    if let Some(code) = &payload.access_code {
        println!("  [Display] Access code: {code}");
    }
    if let Some(board) = &payload.sequence {
        let strip: Vec<String> = board
            .slots
            .iter()
            .map(|slot| format!("{}{:?}", slot.button, slot.status))
            .collect();
        println!("  [Display] Strip: {}", strip.join(" "));
    }
    if let Some(alert) = &payload.alert {
        println!("  [Display] ALERT: {alert}");
    }
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Lost Signal: Full Playthrough ===\n");

    let config = HubConfig::default();
    match config.validate() {
        Validation::Success(_) => println!("Config OK: room defaults loaded\n"),
        Validation::Failure(errors) => {
            for error in errors.iter() {
                println!("Config error: {error}");
            }
            return;
        }
    }

    let mut session = GameSession::new(config.game.clone());
    let now = Utc::now();

    println!("Step 1: Players decode the transmission");
    print_display(&session);

    session
        .advance(GameStage::Puzzle2, now)
        .expect("Puzzle 1 advances to Puzzle 2");

    println!("Step 2: Players route the power conduits");
    print_display(&session);

    println!("Step 3: GM confirms the conduits visually");
    session.confirm_conduits();
    print_display(&session);

    session
        .advance(GameStage::Puzzle3, now)
        .expect("Puzzle 2 advances to Puzzle 3");

    println!("Step 4: The button sequence, with one slip");
    print_display(&session);

    let wrong_at = Utc::now();
    session.submit(4, wrong_at).expect("valid button id");
    session.submit(2, wrong_at).expect("valid button id");

    println!("Right after the wrong press the alert is showing:");
    let flashing = project(&session, wrong_at);
    println!("  alert = {:?}\n", flashing.alert);

    // No sleeping needed: the flash expires by clock, so just ask
    // what the display would show three seconds later.
    let later = wrong_at + chrono::Duration::seconds(3);
    let calm = project(&session, later);
    println!("Three seconds later (by clock) it is gone:");
    println!("  alert = {:?}\n", calm.alert);

    println!("Step 5: The full pattern, start to finish");
    for &button in REFERENCE_PATTERN.iter() {
        session.submit(button, Utc::now()).expect("valid button id");
    }
    print_display(&session);

    println!("Latch triggered: {}", session.latch_triggered());
    println!("\nJournal:");
    for transition in session.history().transitions() {
        println!(
            "  {} -> {} ({:?})",
            transition.from.name(),
            transition.to.name(),
            transition.cause
        );
    }
    if let Some(mission_time) = session.history().duration() {
        println!("Mission time: {mission_time:?}");
    }

    println!("\nStep 6: Reset for the next group");
    session.reset(Utc::now());
    println!(
        "Back at {}, latch re-armed: {}",
        session.stage().name(),
        !session.latch_triggered()
    );

    println!("\nKey Takeaways:");
    println!("- Every rule is a pure function of the session and an explicit now");
    println!("- The projector reads; it never clears the error flash");
    println!("- The latch fires once per playthrough and re-arms on reset");

    println!("\n=== Example Complete ===");
}
