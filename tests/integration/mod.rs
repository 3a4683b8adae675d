//! Integration tests for the frame relay

mod config_integration;
mod origin_gate;
mod test_utils;
