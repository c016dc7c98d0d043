//! HTTP probe client for crmscan

pub mod client;
pub use client::{
    joined_header, HttpClient, Probe, ProbeFailure, ProbeOutcome, ProbeResponse, RequestOptions,
};
