//! HTTP API: the replenishment trigger endpoint and its wiring.

pub mod app;
