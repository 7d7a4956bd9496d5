//! auto-2048: a 2048 move engine + snake-order heuristic agent
//!
//! This crate provides:
//! - A compact `Board` type with pure move application (`apply`, `shift`, ...)
//! - A deterministic heuristic agent (`agent` module) that picks the next move
//! - A turn driver (`game` module) with random tile spawns and score events
//! - TOML configuration for the agent's weights (`config` module)
//!
//! Quick start:
//! ```
//! use auto_2048::engine::{Board, Move};
//!
//! let b0 = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
//! let res = b0.apply(Move::Left);
//! assert!(res.changed);
//! assert_eq!(res.board.cell(0, 0), 4);
//! ```
//!
//! Agent quick start
//! ```
//! use auto_2048::agent::HeuristicAgent;
//! use auto_2048::spawn::{RandomSpawner, TileSpawner};
//! use auto_2048::engine::Board;
//!
//! let mut spawner = RandomSpawner::seeded(42);
//! let b = spawner.spawn(Board::EMPTY).and_then(|b| spawner.spawn(b)).unwrap();
//! let mut agent = HeuristicAgent::new();
//! let dir = agent.select_move(b).unwrap();
//! assert!(b.apply(dir).changed);
//! ```
//!
pub mod agent;
pub mod config;
pub mod engine;
pub mod game;
pub mod spawn;
