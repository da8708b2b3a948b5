//! Integration tests: whole runs through the public simulation API and the full app plugin.

mod simulation_scenarios;
mod state_transitions;
