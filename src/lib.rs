//! kernup - Ubuntu mainline kernel installer library
//!
//! This library provides the pieces behind the `kernup` CLI:
//! - Parsing the mainline catalog and per-version package pages
//! - Detecting the running kernel
//! - Downloading packages into a staging area
//! - Installing them with the system package manager

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod download;
pub mod error;
pub mod host;
pub mod index;
pub mod installer;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod selector;
pub mod staging;
