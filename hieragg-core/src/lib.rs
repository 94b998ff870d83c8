//! Hieragg Core
//!
//! Core types shared by the hieragg discovery service.
//!
//! This crate contains:
//! - Domain types: event logs, process trees and Petri nets
//! - DTOs: request and response shapes of the HTTP API

pub mod domain;
pub mod dto;
