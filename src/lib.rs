//! # circview - Circular Feature Viewer
//!
//! Shows annotations ("features") over a circular sequence, such as a
//! mitochondrial genome or a protein, as stacked concentric arcs, and lets
//! the user spin the ring.
//!
//! ## Architecture
//!
//! The core is independent of the terminal:
//! - `mapping`: sequence position <-> angle conversion
//! - `overlap`: intersection of intervals that may wrap through the origin
//! - `tracks`: first-fit packing of annotations into tracks
//! - `store`: live annotation set with add/remove and repacking
//! - `rotation`: tick-driven rotation and the position at 12 o'clock
//! - `notify`: notification channels toward the UI
//! - `layout`: arc geometry for renderers
//! - `viewer`: the facade tying these together
//!
//! Inputs and the terminal front end:
//! - `config`, `fasta`, `demo`: viewer options, sequence and feature files
//! - `model`, `event`, `ui`, `controller`: application state, key handling,
//!   ratatui rendering and the main loop

pub mod config;
pub mod controller;
pub mod demo;
pub mod error;
pub mod event;
pub mod fasta;
pub mod layout;
pub mod mapping;
pub mod model;
pub mod notify;
pub mod overlap;
pub mod rotation;
pub mod store;
pub mod tracks;
pub mod ui;
pub mod viewer;
