//! ScreenLab Core — the screener's request pipeline.
//!
//! This crate contains everything between the market-data provider and the
//! presentation layer:
//! - Domain types (price points, timeframes, earnings, render requests)
//! - Provider boundary (Yahoo Finance client, normalization, response cache)
//! - Series derivation (SMA, TTM EPS, backward as-of PE, median PE)
//! - Axis gap policy (weekend/holiday/overnight rangebreaks, tick density)
//! - Chart assembly (trace list + dual-axis layout from request toggles)

pub mod axis;
pub mod chart;
pub mod config;
pub mod data;
pub mod derive;
pub mod domain;
pub mod pipeline;
