//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{
    engine::{BreathPattern, IntervalPlan},
    state::SessionDefaults,
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "breathe-timer")]
#[command(about = "Breathing, interval, rest and countdown timers behind a small HTTP API")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Scheduling pulse interval in milliseconds
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u64).range(10..=100))]
    pub tick_ms: u64,

    /// Rest time between workout sets in seconds
    #[arg(long, default_value = "3")]
    pub rest_secs: u64,

    /// Number of sets per exercise
    #[arg(long, default_value = "3")]
    pub sets: u32,

    /// Exercises on the workout board
    #[arg(long, value_delimiter = ',', default_value = "Pull,Push,Leg")]
    pub exercises: Vec<String>,

    /// Interval training rounds
    #[arg(long, default_value = "8")]
    pub rounds: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Initial settings of every hosted session
    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            interval: IntervalPlan {
                rounds: self.rounds,
                ..IntervalPlan::default()
            },
            breath: BreathPattern::default(),
            timer_secs: 0,
            rest_secs: self.rest_secs,
            exercises: self.exercises.clone(),
            sets: self.sets,
        }
    }
}
