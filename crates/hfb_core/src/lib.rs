//! # hfb_core - Play-State Referee for 2D American Football
//!
//! This library adjudicates a 2D American-football variant played on top of a
//! physics host it does not own. The host reports ticks, ball touches, chat
//! and roster changes; the referee answers with typed rulings and moves the
//! discs the rules need moved.
//!
//! ## Features
//! - Deterministic (seeded fumble rolls and formation jitter)
//! - Every decision announced as a serializable [`Ruling`]
//! - Typed statistic credits delivered to a pluggable [`StatsSink`]
//! - Scripted scenarios replayable without a physics host
//!
//! ## Usage
//!
//! ```rust
//! use hfb_core::{Referee, RefereeConfig, ScriptedRoom};
//!
//! let mut room = ScriptedRoom::lineup(&[1, 2, 3], &[4, 5, 6]);
//! let mut referee = Referee::new(RefereeConfig::default());
//!
//! let rulings = referee.on_game_start(&mut room);
//! assert_eq!(rulings.len(), 1);
//!
//! for _ in 0..60 {
//!     referee.on_tick(&mut room);
//! }
//! assert_eq!(referee.elapsed_ms(), 1_000);
//! ```

// Rule handlers take the room plus the players and ball they already looked up
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod field;
pub mod referee;
pub mod room;
pub mod rules;
pub mod ruling;
pub mod sim;
pub mod stats;
pub mod timer;

pub use config::RefereeConfig;
pub use error::{AdminError, ConfigError, ScenarioError};
pub use field::{FieldPosition, Team, Vec2};
pub use referee::{HikeClockCommand, MatchState, Mode, Referee, Score};
pub use room::{BallDisc, Marker, PlayerDisc, PlayerId, Room, RoomExt};
pub use ruling::Ruling;
pub use sim::{Scenario, ScenarioReport, ScriptedRoom, Step};
pub use stats::{NullStats, StatDelta, StatKind, StatsError, StatsLedger, StatsSink};
