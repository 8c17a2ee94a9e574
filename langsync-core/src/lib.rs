#![doc = "langsync-core: core pipeline library for langsync."]

//! This crate contains the whole translation sync pipeline: loading the list of
//! candidate language keys, fetching and converting each remote translation, and
//! generating the manifest of translated languages.
//!
//! # Usage
//! Build a [`config::SyncConfig`], pick a [`contract::Fetcher`] (normally
//! [`download::HttpFetcher`]) and call [`synchronise::synchronise`].

pub mod config;
pub mod contract;
pub mod convert;
pub mod download;
pub mod keys;
pub mod manifest;
pub mod synchronise;
