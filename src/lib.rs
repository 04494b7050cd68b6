//! blackjack-rs: four-seat Blackjack against a dealer that plays from a
//! basic-strategy table.
//!
//! Goals:
//! - Rules engine independent of any frontend
//! - Deterministic play from a stacked or seeded shoe
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: play a round from a stacked shoe
//! ```
//! use blackjack_rs::cards::parse_cards;
//! use blackjack_rs::clock::ManualClock;
//! use blackjack_rs::config::Rules;
//! use blackjack_rs::game::{Game, Winner};
//! use blackjack_rs::shoe::StackedSupplier;
//!
//! // Seats 1-4 then the dealer, twice; the dealer's second card is face up.
//! let shoe = StackedSupplier::new(parse_cards("Th 9s 8c 7d Tc 9h 9c 9d Kd 8s").unwrap());
//! let mut game = Game::new(Rules::default(), Box::new(shoe), Box::new(ManualClock::new())).unwrap();
//! game.deal_initial_cards().unwrap();
//! for _ in 0..4 {
//!     game.stand().unwrap();
//! }
//! assert!(game.game_over());
//! assert_eq!(game.winners().members(), &[Winner::Seat(0)]);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin blackjack-rs -- --bots 3
//! ```

pub mod agents;
pub mod cards;
pub mod clock;
pub mod config;
pub mod engine;
pub mod game;
pub mod hand;
pub mod shoe;
pub mod strategy;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
