// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Core of a small travel-agency CRM: Brazilian identifier checks, input masks,
//! backup and CSV codecs, and the agenda and dashboard views built on them.

pub mod app;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;
pub mod utils;
