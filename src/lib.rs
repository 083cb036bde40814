//! Plans the reorganisation of a TV library into `Season N/SxxEyy.ext`.
//!
//! Nothing here touches the media files. A run produces a [`plan::Plan`],
//! which is rendered for review and turned into an apply script that the
//! user runs separately.

pub mod classifier;
pub mod config;
pub mod ignore;
pub mod listing;
pub mod organizer;
pub mod plan;
pub mod render;
pub mod script;
pub mod sequencer;
pub mod tui;
